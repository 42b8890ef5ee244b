use kinetree::*;
use nalgebra::Vector3;

fn rot_z(name: &str) -> Joint<f64> {
    Joint::new(
        name,
        JointKind::Rotational {
            axis: Vector3::z_axis(),
        },
    )
}

#[test]
fn test_children_keep_attach_order() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(rot_z("a"));
    let b = tree.insert(rot_z("b"));
    let c = tree.insert(rot_z("c"));
    // attach in an order different from insertion
    tree.add_child_joint(tree.root(), b).unwrap();
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.add_child_joint(tree.root(), c).unwrap();

    assert_eq!(tree.num_children(tree.root()).unwrap(), 3);
    assert_eq!(tree.children(tree.root()).unwrap(), &[b, a, c]);
    assert_eq!(tree.child_joint(tree.root(), 0).unwrap(), b);
    assert_eq!(tree.child_joint(tree.root(), 1).unwrap(), a);
    assert_eq!(tree.child_joint(tree.root(), 2).unwrap(), c);
    assert_eq!(
        tree.child_joint(tree.root(), 3).unwrap_err(),
        Error::ChildOutOfRange {
            joint_name: "root".to_owned(),
            rank: 3,
            num_children: 3,
        }
    );

    assert_eq!(tree.parent(a).unwrap(), Some(tree.root()));
    assert_eq!(tree.parent(tree.root()).unwrap(), None);
}

#[test]
fn test_failed_attach_changes_nothing() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(rot_z("a"));
    let b = tree.insert(rot_z("b"));
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.add_child_joint(a, b).unwrap();

    // b already has a parent
    assert_eq!(
        tree.add_child_joint(tree.root(), b).unwrap_err(),
        Error::AlreadyParented {
            joint_name: "b".to_owned(),
        }
    );
    assert_eq!(tree.num_children(tree.root()).unwrap(), 1);
    assert_eq!(tree.parent(b).unwrap(), Some(a));

    // the root always counts as attached
    assert_eq!(
        tree.add_child_joint(a, tree.root()).unwrap_err(),
        Error::AlreadyParented {
            joint_name: "root".to_owned(),
        }
    );

    // a cycle in a free subtree is caught and leaves the subtree intact
    let c = tree.insert(rot_z("c"));
    let d = tree.insert(rot_z("d"));
    tree.add_child_joint(c, d).unwrap();
    assert_eq!(
        tree.add_child_joint(d, c).unwrap_err(),
        Error::CycleDetected {
            parent_name: "d".to_owned(),
            child_name: "c".to_owned(),
        }
    );
    assert_eq!(tree.parent(c).unwrap(), None);
    assert_eq!(tree.parent(d).unwrap(), Some(c));
    assert_eq!(tree.num_children(d).unwrap(), 0);
}

#[test]
fn test_ranks_follow_insertion_order() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    assert_eq!(tree.config_size(), 0);
    assert_eq!(tree.dof(), 0);

    let ball = tree.insert(Joint::new("ball", JointKind::Spherical));
    let pitch = tree.insert(Joint::new(
        "pitch",
        JointKind::Rotational {
            axis: Vector3::y_axis(),
        },
    ));
    let slide = tree.insert(Joint::new(
        "slide",
        JointKind::Linear {
            axis: Vector3::x_axis(),
        },
    ));

    // ranks are handed out at insertion, before any attachment
    assert_eq!(tree.joint(ball).unwrap().rank_in_configuration(), 0);
    assert_eq!(tree.joint(ball).unwrap().rank_in_velocity(), 0);
    assert_eq!(tree.joint(pitch).unwrap().rank_in_configuration(), 4);
    assert_eq!(tree.joint(pitch).unwrap().rank_in_velocity(), 3);
    assert_eq!(tree.joint(slide).unwrap().rank_in_configuration(), 5);
    assert_eq!(tree.joint(slide).unwrap().rank_in_velocity(), 4);
    assert_eq!(tree.config_size(), 6);
    assert_eq!(tree.dof(), 5);

    // attaching in any order does not disturb them
    tree.add_child_joint(tree.root(), slide).unwrap();
    tree.add_child_joint(slide, ball).unwrap();
    tree.add_child_joint(ball, pitch).unwrap();
    assert_eq!(tree.joint(slide).unwrap().rank_in_configuration(), 5);
    assert_eq!(tree.joint(ball).unwrap().rank_in_velocity(), 0);
    assert_eq!(tree.joint(pitch).unwrap().rank_in_configuration(), 4);
}

#[test]
fn test_detach_destroys_subtree_and_retires_ranks() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(rot_z("a"));
    let b = tree.insert(rot_z("b"));
    let c = tree.insert(Joint::new(
        "c",
        JointKind::Linear {
            axis: Vector3::x_axis(),
        },
    ));
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.add_child_joint(a, b).unwrap();
    tree.add_child_joint(a, c).unwrap();
    assert_eq!(tree.num_joints(), 4);
    assert_eq!(tree.config_size(), 3);

    tree.detach_joint(a).unwrap();
    assert_eq!(tree.num_joints(), 1);
    assert!(tree.joint(a).is_err());
    assert!(tree.joint(b).is_err());
    assert!(tree.joint(c).is_err());
    assert_eq!(tree.num_children(tree.root()).unwrap(), 0);

    // the removed joints keep their slice of the configuration reserved
    assert_eq!(tree.config_size(), 3);
    assert_eq!(tree.dof(), 3);
    let d = tree.insert(rot_z("d"));
    assert_eq!(tree.joint(d).unwrap().rank_in_configuration(), 3);
    assert_eq!(tree.config_size(), 4);

    // the configuration stays sized for every rank ever handed out
    tree.add_child_joint(tree.root(), d).unwrap();
    assert!(tree.update_transforms(&[0.0; 3]).is_err());
    let transforms = tree.update_transforms(&[0.0, 0.0, 0.0, 0.5]).unwrap();
    assert_eq!(transforms.len(), 2);

    assert_eq!(tree.detach_joint(tree.root()).unwrap_err(), Error::DetachRoot);

    // a free joint can be detached as well, taking its subtree with it
    let e = tree.insert(rot_z("e"));
    let f = tree.insert(rot_z("f"));
    tree.add_child_joint(e, f).unwrap();
    tree.detach_joint(e).unwrap();
    assert!(tree.joint(e).is_err());
    assert!(tree.joint(f).is_err());
}

#[test]
fn test_dead_handles_are_rejected_everywhere() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(rot_z("a"));
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.detach_joint(a).unwrap();

    assert_eq!(tree.joint(a).unwrap_err(), Error::InvalidJointId { id: 1 });
    assert!(tree.joint_mut(a).is_err());
    assert!(tree.parent(a).is_err());
    assert!(tree.children(a).is_err());
    assert!(tree.num_children(a).is_err());
    assert!(tree.child_joint(a, 0).is_err());
    assert!(tree.add_child_joint(tree.root(), a).is_err());
    assert!(tree.add_child_joint(a, tree.root()).is_err());
    assert!(tree.detach_joint(a).is_err());

    // a dead handle yields an empty traversal rather than a panic
    assert_eq!(tree.iter_descendants(a).count(), 0);
    assert_eq!(tree.iter_ancestors(a).count(), 0);
}

#[test]
fn test_bounds_roundtrip_through_the_tree() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Spherical));
    let root = tree.root();
    {
        let joint = tree.joint_mut(root).unwrap();
        assert_eq!(joint.is_bounded(1), Ok(false));
        joint.set_lower_bound(1, -0.5).unwrap();
        joint.set_upper_bound(1, 0.5).unwrap();
        joint.set_bounded(1, true).unwrap();
    }
    let joint = tree.joint(root).unwrap();
    assert_eq!(joint.is_bounded(1), Ok(true));
    assert_eq!(joint.lower_bound(1), Ok(-0.5));
    assert_eq!(joint.upper_bound(1), Ok(0.5));

    // neighbouring DOFs keep their own flags
    assert_eq!(joint.is_bounded(0), Ok(false));
    assert_eq!(
        joint.lower_bound(0).unwrap_err(),
        Error::UnboundedDof {
            joint_name: "root".to_owned(),
            rank: 0,
        }
    );

    // local ranks stop at dof(), 3 for a spherical joint
    assert_eq!(
        joint.is_bounded(3).unwrap_err(),
        Error::DofOutOfRange {
            joint_name: "root".to_owned(),
            rank: 3,
            dof: 3,
        }
    );

    // an anchor has no rank to bound at all
    let anchor = tree.insert(Joint::new("anchor", JointKind::Anchor));
    assert!(tree.joint(anchor).unwrap().is_bounded(0).is_err());

    // the range shorthand sets flag and values in one call
    let slide = tree.insert(Joint::new(
        "slide",
        JointKind::Linear {
            axis: Vector3::z_axis(),
        },
    ));
    let joint = tree.joint_mut(slide).unwrap();
    joint.set_bound(0, (0.0..=0.3).into()).unwrap();
    assert_eq!(joint.is_bounded(0), Ok(true));
    assert_eq!(joint.upper_bound(0), Ok(0.3));
    assert_eq!(joint.bound(0).unwrap().clamp(0.9), 0.3);
    assert!(joint.bound(0).unwrap().is_valid(0.2));
    assert!(!joint.bound(0).unwrap().is_valid(-0.1));
}

#[test]
fn test_find_and_iteration_skip_removed_joints() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(rot_z("a"));
    let b = tree.insert(rot_z("b"));
    let c = tree.insert(rot_z("c"));
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.add_child_joint(tree.root(), b).unwrap();
    tree.add_child_joint(tree.root(), c).unwrap();

    tree.detach_joint(b).unwrap();
    assert_eq!(tree.find("b"), None);
    assert_eq!(tree.find("a"), Some(a));
    let names: Vec<&str> = tree.iter_joints().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["root", "a", "c"]);
    assert_eq!(tree.num_joints(), 3);
}

#[test]
fn test_structural_changes_drop_cached_results() {
    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("root")
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    let a = tree.insert(Joint::new(
        "a",
        JointKind::Linear {
            axis: Vector3::x_axis(),
        },
    ));
    tree.add_child_joint(tree.root(), a).unwrap();

    tree.update_transforms(&[0.0, 0.0]).unwrap();
    tree.update_jacobians().unwrap();
    tree.update_masses().unwrap();
    assert!(tree.joint(a).unwrap().world_transform().is_some());
    assert!(tree.joint(a).unwrap().jacobian().is_some());
    assert!(tree.joint(a).unwrap().subtree_mass().is_some());

    // inserting drops every cache, even on joints it does not touch
    let b = tree.insert(rot_z("b"));
    assert!(tree.joint(a).unwrap().world_transform().is_none());
    assert!(tree.joint(a).unwrap().jacobian().is_none());
    assert!(tree.joint(a).unwrap().subtree_mass().is_none());
    assert!(tree.joint(a).unwrap().subtree_mass_times_com().is_none());

    // the later passes refuse to run on the stale state
    assert_eq!(
        tree.update_jacobians().unwrap_err(),
        Error::TransformsNotComputed
    );
    assert_eq!(
        tree.update_masses().unwrap_err(),
        Error::TransformsNotComputed
    );

    // attaching clears as well
    tree.update_transforms(&[0.1, 0.2, 0.3]).unwrap();
    tree.add_child_joint(a, b).unwrap();
    assert!(tree.joint(a).unwrap().world_transform().is_none());

    // so does detaching a sibling branch
    tree.update_transforms(&[0.1, 0.2, 0.3]).unwrap();
    tree.detach_joint(b).unwrap();
    assert!(tree.joint(a).unwrap().world_transform().is_none());

    // an origin change clears the joint's own caches at once
    tree.update_transforms(&[0.1, 0.2, 0.3]).unwrap();
    tree.joint_mut(a)
        .unwrap()
        .set_origin(Isometry3::translation(0.0, 0.0, 0.5));
    assert!(tree.joint(a).unwrap().world_transform().is_none());
}
