use approx::assert_relative_eq;
use kinetree::*;
use nalgebra as na;

const EPS: f64 = 1.0e-6;

#[test]
fn test_total_mass_is_the_sum_of_the_bodies() {
    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("root")
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    let a = tree.insert(
        JointBuilder::new()
            .name("a")
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .body(Body::from_mass(4.0))
            .finalize(),
    );
    let b = tree.insert(
        JointBuilder::new()
            .name("b")
            .kind(JointKind::Linear {
                axis: Vector3::x_axis(),
            })
            .finalize(),
    );
    let c = tree.insert(
        JointBuilder::new()
            .name("c")
            .body(Body::from_mass(2.5))
            .finalize(),
    );
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.add_child_joint(a, b).unwrap();
    tree.add_child_joint(tree.root(), c).unwrap();

    tree.update_transforms(&[0.0, 0.0]).unwrap();
    assert_eq!(tree.update_masses().unwrap(), 7.5);
    assert_eq!(tree.joint(tree.root()).unwrap().subtree_mass(), Some(7.5));
    assert_eq!(tree.joint(a).unwrap().subtree_mass(), Some(4.0));
    assert_eq!(tree.joint(b).unwrap().subtree_mass(), Some(0.0));
    assert_eq!(tree.joint(c).unwrap().subtree_mass(), Some(2.5));
}

#[test]
fn test_center_of_mass_is_the_weighted_average() {
    let mut tree = KinematicTree::<f64>::from_root(
        JointBuilder::new()
            .name("j0")
            .translation(Translation3::new(0.0, 1.0, 0.0))
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    let j1 = tree.insert(
        JointBuilder::new()
            .name("j1")
            .translation(Translation3::new(0.0, 0.0, 1.0))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .body(Body::new(Isometry3::translation(0.0, 0.0, 1.0), 4.0))
            .finalize(),
    );
    tree.add_child_joint(tree.root(), j1).unwrap();

    tree.update_transforms(&[0.0, 0.0]).unwrap();
    let com = tree.center_of_mass().unwrap();
    assert_relative_eq!(com, Vector3::new(0.0, 1.0, 1.6), epsilon = 1.0e-12);

    // pitch the elbow: the heavy body swings its share of the mass forward
    tree.update_transforms(&[0.0, 0.5]).unwrap();
    let com = tree.center_of_mass().unwrap();
    assert!((com.x - 0.38354).abs() < 1.0e-4);
    assert!((com.y - 1.0).abs() < 1.0e-12);
    assert!((com.z - 1.50207).abs() < 1.0e-4);
}

#[test]
fn test_subtree_aggregates_mid_tree() {
    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("base")
            .body(Body::from_mass(2.0))
            .finalize(),
    );
    let arm = tree.insert(
        JointBuilder::new()
            .name("arm")
            .translation(Translation3::new(1.0, 0.0, 0.0))
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    let tip = tree.insert(
        JointBuilder::new()
            .name("tip")
            .translation(Translation3::new(1.0, 0.0, 0.0))
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    tree.add_child_joint(tree.root(), arm).unwrap();
    tree.add_child_joint(arm, tip).unwrap();

    tree.update_transforms(&[0.0]).unwrap();
    assert_eq!(tree.update_masses().unwrap(), 4.0);

    // the arm's subtree holds 1 kg at x=1 and 1 kg at x=2
    assert_eq!(tree.joint(arm).unwrap().subtree_mass(), Some(2.0));
    assert_relative_eq!(
        tree.joint(arm).unwrap().subtree_mass_times_com().unwrap(),
        Vector3::new(3.0, 0.0, 0.0),
        epsilon = 1.0e-12
    );

    assert_relative_eq!(
        tree.center_of_mass().unwrap(),
        Vector3::new(0.75, 0.0, 0.0),
        epsilon = 1.0e-12
    );
}

#[test]
fn test_zero_total_mass_is_an_error() {
    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(Joint::new(
        "a",
        JointKind::Rotational {
            axis: Vector3::z_axis(),
        },
    ));
    tree.add_child_joint(tree.root(), a).unwrap();
    tree.update_transforms(&[0.0]).unwrap();

    // aggregation itself is fine with an empty mechanism
    assert_eq!(tree.update_masses().unwrap(), 0.0);
    // an average over no mass is not
    assert_eq!(tree.center_of_mass().unwrap_err(), Error::ZeroMass);
    assert_eq!(tree.com_jacobian().unwrap_err(), Error::ZeroMass);

    // explicit zero-mass bodies change nothing
    tree.joint_mut(a).unwrap().body = Some(Body::from_mass(0.0));
    tree.update_transforms(&[0.0]).unwrap();
    assert_eq!(tree.center_of_mass().unwrap_err(), Error::ZeroMass);
}

#[test]
fn test_zero_mass_subtree_contributes_nothing() {
    let mut tree = KinematicTree::<f64>::from_root(
        JointBuilder::new()
            .name("base")
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    let wrist = tree.insert(
        JointBuilder::new()
            .name("wrist")
            .translation(Translation3::new(0.5, 0.0, 0.0))
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .finalize(),
    );
    tree.add_child_joint(tree.root(), wrist).unwrap();

    tree.update_transforms(&[0.4]).unwrap();
    let jacobian = tree.com_jacobian().unwrap();

    // the wrist moves no mass: its column is zero, never NaN
    let wrist_col = tree.joint(wrist).unwrap().rank_in_velocity();
    assert_eq!(jacobian.column(wrist_col).into_owned(), Vector3::zeros());
    assert!(jacobian.iter().all(|v| v.is_finite()));
}

#[test]
fn test_com_jacobian_matches_finite_differences() {
    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("yaw")
            .translation(Translation3::new(0.0, 0.0, 0.2))
            .kind(JointKind::Rotational {
                axis: Vector3::z_axis(),
            })
            .body(Body::new(Isometry3::translation(0.1, 0.0, 0.0), 1.5))
            .finalize(),
    );
    let pitch = tree.insert(
        JointBuilder::new()
            .name("pitch")
            .translation(Translation3::new(0.3, 0.0, 0.0))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .body(Body::new(Isometry3::translation(0.2, 0.0, 0.1), 0.5))
            .finalize(),
    );
    tree.add_child_joint(tree.root(), pitch).unwrap();

    let configuration = [0.6, -0.3];
    tree.update_transforms(&configuration).unwrap();
    let jacobian = tree.com_jacobian().unwrap();

    for scalar in 0..2 {
        let mut plus = configuration.to_vec();
        plus[scalar] += EPS;
        let mut minus = configuration.to_vec();
        minus[scalar] -= EPS;
        tree.update_transforms(&plus).unwrap();
        let com_plus = tree.center_of_mass().unwrap();
        tree.update_transforms(&minus).unwrap();
        let com_minus = tree.center_of_mass().unwrap();
        let expected = (com_plus - com_minus) / (2.0 * EPS);
        assert_relative_eq!(
            jacobian.column(scalar).into_owned(),
            expected,
            epsilon = 1.0e-6
        );
    }
}

#[test]
fn test_spherical_com_columns_match_finite_differences() {
    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("ball")
            .translation(Translation3::new(0.0, 0.0, 0.3))
            .kind(JointKind::Spherical)
            .body(Body::new(Isometry3::translation(0.0, 0.1, 0.2), 2.0))
            .finalize(),
    );
    let counterweight = tree.insert(
        JointBuilder::new()
            .name("counterweight")
            .translation(Translation3::new(0.0, -0.2, 0.0))
            .body(Body::from_mass(1.0))
            .finalize(),
    );
    tree.add_child_joint(tree.root(), counterweight).unwrap();

    let rotation = UnitQuaternion::from_axis_angle(
        &na::Unit::new_normalize(Vector3::new(-1.0, 0.5, 2.0)),
        0.9,
    );
    let configuration = [
        rotation.coords.w,
        rotation.coords.x,
        rotation.coords.y,
        rotation.coords.z,
    ];
    tree.update_transforms(&configuration).unwrap();
    let jacobian = tree.com_jacobian().unwrap();

    for i in 0..3 {
        let axis = Vector3::ith_axis(i);
        let plus = rotation * UnitQuaternion::from_axis_angle(&axis, EPS);
        let minus = rotation * UnitQuaternion::from_axis_angle(&axis, -EPS);
        tree.update_transforms(&[
            plus.coords.w,
            plus.coords.x,
            plus.coords.y,
            plus.coords.z,
        ])
        .unwrap();
        let com_plus = tree.center_of_mass().unwrap();
        tree.update_transforms(&[
            minus.coords.w,
            minus.coords.x,
            minus.coords.y,
            minus.coords.z,
        ])
        .unwrap();
        let com_minus = tree.center_of_mass().unwrap();
        let expected = (com_plus - com_minus) / (2.0 * EPS);
        assert_relative_eq!(jacobian.column(i).into_owned(), expected, epsilon = 1.0e-6);
    }
}
