/*
  Copyright 2025 the kinetree developers

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
use crate::errors::Error;
use crate::iterator::{Ancestors, Descendants};
use crate::joint::Joint;
use na::{Isometry3, Matrix3xX, Matrix6xX, RealField, Vector3};
use nalgebra as na;
use simba::scalar::SubsetOf;
use std::fmt::{self, Display};

/// Stable handle to a joint owned by a [`KinematicTree`]
///
/// Handles stay valid across later insertions and detachments. A handle to
/// a joint removed by `detach_joint` is dead: every operation receiving it
/// reports `Error::InvalidJointId` instead of resolving to some other joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct JointId(pub(crate) usize);

#[derive(Debug, Clone)]
struct JointSlot<T: RealField + Copy> {
    joint: Joint<T>,
    parent: Option<JointId>,
    children: Vec<JointId>,
}

/// Tree of joints owning the whole mechanism and running the propagation
/// passes over it.
///
/// The tree is an arena: joints are inserted by value, addressed by
/// [`JointId`] handles, and linked with `add_child_joint`. Insertion
/// assigns each joint its slice of the global configuration and velocity
/// vectors; those ranks never change and are never reused, even after the
/// joint is detached.
///
/// Three passes derive data from a configuration, each ordering its own
/// traversal:
///
/// 1. `update_transforms` composes world transforms top-down,
/// 2. `update_jacobians` fills every joint's 6 x `dof()` Jacobian,
/// 3. `update_masses` aggregates mass and mass-weighted center of mass
///    bottom-up.
///
/// The later passes consume the cached results of `update_transforms` and
/// report `Error::TransformsNotComputed` when those are missing. Any
/// structural change (insert, attach, detach) drops all cached results.
///
/// # Examples
///
/// ```
/// use kinetree::*;
/// use nalgebra::{Translation3, Vector3};
///
/// let mut tree = KinematicTree::from_root(
///     JointBuilder::new()
///         .name("base_yaw")
///         .kind(JointKind::Rotational { axis: Vector3::z_axis() })
///         .finalize(),
/// );
/// let lift = tree.insert(
///     JointBuilder::new()
///         .name("lift")
///         .translation(Translation3::new(0.1, 0.0, 0.0))
///         .kind(JointKind::Linear { axis: Vector3::z_axis() })
///         .body(Body::from_mass(1.0))
///         .finalize(),
/// );
/// tree.add_child_joint(tree.root(), lift).unwrap();
/// assert_eq!(tree.dof(), 2);
///
/// // one scalar per joint here: [yaw angle, lift length]
/// tree.update_transforms(&[std::f64::consts::FRAC_PI_2, 0.2]).unwrap();
/// let pose = tree.joint(lift).unwrap().world_transform().unwrap();
/// assert!((pose.translation.vector.y - 0.1).abs() < 1.0e-12);
/// assert!((pose.translation.vector.z - 0.2).abs() < 1.0e-12);
///
/// // per-joint Jacobians, columns located by rank_in_velocity
/// tree.update_jacobians().unwrap();
/// let jacobian = tree.joint(lift).unwrap().jacobian().unwrap();
/// assert_eq!(jacobian.ncols(), tree.dof());
///
/// // the lift joint carries the only body, so the center of mass rides on it
/// let com = tree.center_of_mass().unwrap();
/// assert!((com.y - 0.1).abs() < 1.0e-12);
/// ```
#[derive(Debug, Clone)]
pub struct KinematicTree<T: RealField + Copy> {
    slots: Vec<Option<JointSlot<T>>>,
    root: JointId,
    config_size: usize,
    dof: usize,
}

impl<T> KinematicTree<T>
where
    T: RealField + Copy,
{
    fn slot(&self, id: JointId) -> Result<&JointSlot<T>, Error> {
        self.slots
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(Error::InvalidJointId { id: id.0 })
    }

    fn slot_mut(&mut self, id: JointId) -> Result<&mut JointSlot<T>, Error> {
        self.slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(Error::InvalidJointId { id: id.0 })
    }

    pub(crate) fn parent_of(&self, id: JointId) -> Option<JointId> {
        self.slots
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .and_then(|slot| slot.parent)
    }

    pub(crate) fn children_of(&self, id: JointId) -> &[JointId] {
        self.slots
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .map_or(&[], |slot| slot.children.as_slice())
    }
}

impl<T> KinematicTree<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Create a tree from its root joint
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    ///
    /// let tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    /// assert_eq!(tree.num_joints(), 1);
    /// assert_eq!(tree.dof(), 0);
    /// ```
    pub fn from_root(mut root_joint: Joint<T>) -> Self {
        root_joint.set_ranks(0, 0);
        let config_size = root_joint.config_size();
        let dof = root_joint.dof();
        KinematicTree {
            slots: vec![Some(JointSlot {
                joint: root_joint,
                parent: None,
                children: Vec::new(),
            })],
            root: JointId(0),
            config_size,
            dof,
        }
    }

    /// Handle of the root joint
    #[inline]
    pub fn root(&self) -> JointId {
        self.root
    }

    /// Move a joint into the tree and assign its configuration and velocity
    /// ranks; the joint is not part of the kinematic structure until it is
    /// attached with `add_child_joint`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    /// use nalgebra::Vector3;
    ///
    /// let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Spherical));
    /// let wrist = tree.insert(Joint::new(
    ///     "wrist",
    ///     JointKind::Rotational { axis: Vector3::x_axis() },
    /// ));
    ///
    /// // the root consumed 4 configuration scalars and 3 velocity scalars
    /// let joint = tree.joint(wrist).unwrap();
    /// assert_eq!(joint.rank_in_configuration(), 4);
    /// assert_eq!(joint.rank_in_velocity(), 3);
    /// ```
    pub fn insert(&mut self, mut joint: Joint<T>) -> JointId {
        joint.set_ranks(self.config_size, self.dof);
        self.config_size += joint.config_size();
        self.dof += joint.dof();
        let id = JointId(self.slots.len());
        self.slots.push(Some(JointSlot {
            joint,
            parent: None,
            children: Vec::new(),
        }));
        self.clear_all_caches();
        id
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// Fails with `Error::AlreadyParented` if `child` is attached already
    /// (the root counts as attached), and with `Error::CycleDetected` if
    /// `parent` sits in the subtree of `child`. A failed attach changes
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    ///
    /// let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    /// let a = tree.insert(Joint::new("a", JointKind::Anchor));
    /// tree.add_child_joint(tree.root(), a).unwrap();
    ///
    /// // `a` is attached now; attaching it again fails and changes nothing
    /// assert!(tree.add_child_joint(tree.root(), a).is_err());
    /// assert_eq!(tree.num_children(tree.root()).unwrap(), 1);
    /// ```
    pub fn add_child_joint(&mut self, parent: JointId, child: JointId) -> Result<(), Error> {
        self.slot(parent)?;
        let child_slot = self.slot(child)?;
        if child_slot.parent.is_some() || child == self.root {
            return Err(Error::AlreadyParented {
                joint_name: child_slot.joint.name.to_string(),
            });
        }
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if ancestor == child {
                return Err(Error::CycleDetected {
                    parent_name: self.slot(parent)?.joint.name.to_string(),
                    child_name: self.slot(child)?.joint.name.to_string(),
                });
            }
            current = self.slot(ancestor)?.parent;
        }
        self.slot_mut(child)?.parent = Some(parent);
        self.slot_mut(parent)?.children.push(child);
        self.clear_all_caches();
        Ok(())
    }

    /// Detach a joint and destroy its whole subtree
    ///
    /// The handles of the removed joints die. Their configuration and
    /// velocity ranks are retired, never reassigned: `config_size()` and
    /// `dof()` keep counting them, and the corresponding entries of the
    /// configuration vector are simply no longer read.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    /// use nalgebra::Vector3;
    ///
    /// let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    /// let a = tree.insert(Joint::new("a", JointKind::Rotational { axis: Vector3::z_axis() }));
    /// let b = tree.insert(Joint::new("b", JointKind::Rotational { axis: Vector3::z_axis() }));
    /// tree.add_child_joint(tree.root(), a).unwrap();
    /// tree.add_child_joint(a, b).unwrap();
    ///
    /// tree.detach_joint(a).unwrap();
    /// assert!(tree.joint(a).is_err());
    /// assert!(tree.joint(b).is_err());
    /// assert_eq!(tree.num_joints(), 1);
    /// // ranks are never reused: the configuration keeps its length
    /// assert_eq!(tree.config_size(), 2);
    /// ```
    pub fn detach_joint(&mut self, joint: JointId) -> Result<(), Error> {
        self.slot(joint)?;
        if joint == self.root {
            return Err(Error::DetachRoot);
        }
        let doomed: Vec<JointId> = self.iter_descendants(joint).collect();
        if let Some(parent) = self.slot(joint)?.parent {
            self.slot_mut(parent)?.children.retain(|&c| c != joint);
        }
        for id in doomed {
            self.slots[id.0] = None;
        }
        self.clear_all_caches();
        Ok(())
    }

    /// Length the configuration vector must have
    ///
    /// Grows by `config_size()` of every inserted joint and never shrinks.
    #[inline]
    pub fn config_size(&self) -> usize {
        self.config_size
    }

    /// Number of columns of the Jacobians: the velocity ranks handed out so
    /// far, detached joints included
    #[inline]
    pub fn dof(&self) -> usize {
        self.dof
    }

    /// Number of live joints in the tree
    pub fn num_joints(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// The joint behind a handle
    pub fn joint(&self, id: JointId) -> Result<&Joint<T>, Error> {
        Ok(&self.slot(id)?.joint)
    }

    /// Mutable access to the joint behind a handle
    ///
    /// Changing the joint's origin or bounds is fine; the propagation
    /// passes pick the new values up on their next run.
    pub fn joint_mut(&mut self, id: JointId) -> Result<&mut Joint<T>, Error> {
        Ok(&mut self.slot_mut(id)?.joint)
    }

    /// Parent of a joint, `None` for the root and for unattached joints
    pub fn parent(&self, id: JointId) -> Result<Option<JointId>, Error> {
        Ok(self.slot(id)?.parent)
    }

    /// Children of a joint, in attach order
    pub fn children(&self, id: JointId) -> Result<&[JointId], Error> {
        Ok(self.slot(id)?.children.as_slice())
    }

    /// Number of children of a joint
    pub fn num_children(&self, id: JointId) -> Result<usize, Error> {
        Ok(self.slot(id)?.children.len())
    }

    /// Child of a joint by rank in attach order
    pub fn child_joint(&self, id: JointId, rank: usize) -> Result<JointId, Error> {
        let slot = self.slot(id)?;
        slot.children
            .get(rank)
            .copied()
            .ok_or_else(|| Error::ChildOutOfRange {
                joint_name: slot.joint.name.to_string(),
                rank,
                num_children: slot.children.len(),
            })
    }

    /// Find a joint by name
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    /// use nalgebra::Vector3;
    ///
    /// let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    /// let pitch = tree.insert(Joint::new(
    ///     "pitch1",
    ///     JointKind::Rotational { axis: Vector3::y_axis() },
    /// ));
    /// tree.add_child_joint(tree.root(), pitch).unwrap();
    /// assert_eq!(tree.find("pitch1"), Some(pitch));
    /// assert_eq!(tree.find("pitch2"), None);
    /// ```
    pub fn find(&self, joint_name: &str) -> Option<JointId> {
        self.slots.iter().enumerate().find_map(|(i, slot)| match slot {
            Some(slot) if slot.joint.name == joint_name => Some(JointId(i)),
            _ => None,
        })
    }

    /// Iterate over every live joint in rank (insertion) order
    pub fn iter_joints(&self) -> impl Iterator<Item = &Joint<T>> {
        self.slots.iter().flatten().map(|slot| &slot.joint)
    }

    /// Iterate over a joint and its descendants, every parent before its
    /// children; no order is guaranteed between siblings. A dead handle
    /// yields nothing.
    pub fn iter_descendants(&self, start: JointId) -> Descendants<'_, T> {
        let stack = if self.slot(start).is_ok() {
            vec![start]
        } else {
            Vec::new()
        };
        Descendants::new(self, stack)
    }

    /// Iterate over a joint and its ancestors, up to its root
    pub fn iter_ancestors(&self, start: JointId) -> Ancestors<'_, T> {
        Ancestors::new(self, self.slot(start).ok().map(|_| start))
    }

    fn clear_all_caches(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.joint.clear_caches();
        }
    }

    /// Compute the world transform of every joint reachable from the root,
    /// parent before child, and return them in `iter_descendants(root)`
    /// order
    ///
    /// The configuration must hold exactly `config_size()` scalars. Joints
    /// inserted but not yet attached are not visited and keep no cached
    /// transform.
    pub fn update_transforms(&mut self, configuration: &[T]) -> Result<Vec<Isometry3<T>>, Error> {
        if configuration.len() != self.config_size {
            return Err(Error::SizeMismatchError {
                input: configuration.len(),
                required: self.config_size,
            });
        }
        let order: Vec<JointId> = self.iter_descendants(self.root).collect();
        let mut transforms = Vec::with_capacity(order.len());
        for id in order {
            let parent_transform = match self.parent_of(id) {
                Some(parent) => self
                    .slot(parent)?
                    .joint
                    .world_transform()
                    .expect("parents are computed before their children"),
                None => Isometry3::identity(),
            };
            let slot = self.slot_mut(id)?;
            let world = parent_transform * slot.joint.local_transform(configuration)?;
            slot.joint.set_world_transform(world);
            transforms.push(world);
        }
        Ok(transforms)
    }

    /// Assemble the Jacobian of every joint reachable from the root
    ///
    /// Each joint receives a 6 x `dof()` matrix, rows 0..3 angular and rows
    /// 3..6 linear, holding in column `rank_in_velocity + i` of every
    /// ancestor the spatial velocity a unit change of that ancestor's
    /// coordinate `i` induces at the joint's frame. Columns of joints that
    /// do not influence the frame stay zero.
    ///
    /// Requires the transforms of the current configuration; fails with
    /// `Error::TransformsNotComputed` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    /// use nalgebra::Vector3;
    ///
    /// let mut tree = KinematicTree::from_root(
    ///     JointBuilder::new()
    ///         .name("swing")
    ///         .kind(JointKind::Rotational { axis: Vector3::z_axis() })
    ///         .finalize(),
    /// );
    /// let slide = tree.insert(
    ///     JointBuilder::new()
    ///         .name("slide")
    ///         .kind(JointKind::Linear { axis: Vector3::x_axis() })
    ///         .finalize(),
    /// );
    /// tree.add_child_joint(tree.root(), slide).unwrap();
    ///
    /// // quarter turn about Z, then one unit out along the slide
    /// tree.update_transforms(&[std::f64::consts::FRAC_PI_2, 1.0]).unwrap();
    /// tree.update_jacobians().unwrap();
    ///
    /// // the slide ends up at (0, 1, 0)
    /// let pose = tree.joint(slide).unwrap().world_transform().unwrap();
    /// assert!((pose.translation.vector.y - 1.0).abs() < 1.0e-12);
    ///
    /// // swing's column in the slide's Jacobian: angular part is the Z
    /// // axis, linear part is axis x offset = (0,0,1) x (0,1,0) = (-1,0,0)
    /// let jacobian = tree.joint(slide).unwrap().jacobian().unwrap();
    /// assert!((jacobian[(2, 0)] - 1.0).abs() < 1.0e-12);
    /// assert!((jacobian[(3, 0)] + 1.0).abs() < 1.0e-12);
    /// ```
    pub fn update_jacobians(&mut self) -> Result<(), Error> {
        let order: Vec<JointId> = self.iter_descendants(self.root).collect();
        for &id in &order {
            let descendant_position = self
                .slot(id)?
                .joint
                .world_transform()
                .ok_or(Error::TransformsNotComputed)?;
            let mut jacobian = Matrix6xX::zeros(self.dof);
            let mut current = Some(id);
            while let Some(ancestor) = current {
                let slot = self.slot(ancestor)?;
                let own_position = slot
                    .joint
                    .world_transform()
                    .ok_or(Error::TransformsNotComputed)?;
                slot.joint
                    .write_sub_jacobian(&own_position, &descendant_position, &mut jacobian);
                current = slot.parent;
            }
            self.slot_mut(id)?.joint.set_jacobian(jacobian);
        }
        Ok(())
    }

    /// Aggregate mass and mass-weighted center of mass over every subtree,
    /// children before parents, and return the total mass under the root
    ///
    /// After this pass every reachable joint answers `subtree_mass()` and
    /// `subtree_mass_times_com()` (world frame). Requires the transforms of
    /// the current configuration; fails with `Error::TransformsNotComputed`
    /// otherwise.
    pub fn update_masses(&mut self) -> Result<T, Error> {
        let order: Vec<JointId> = self.iter_descendants(self.root).collect();
        let mut total_mass = T::zero();
        for &id in order.iter().rev() {
            let slot = self.slot(id)?;
            let world = slot
                .joint
                .world_transform()
                .ok_or(Error::TransformsNotComputed)?;
            let (mut mass, mut mass_com) = match &slot.joint.body {
                Some(body) => (
                    body.mass,
                    (world * body.origin().translation).translation.vector * body.mass,
                ),
                None => (T::zero(), Vector3::zeros()),
            };
            for &child in &slot.children {
                let child_joint = &self.slot(child)?.joint;
                mass += child_joint
                    .subtree_mass()
                    .expect("children are aggregated before their parent");
                mass_com += child_joint
                    .subtree_mass_times_com()
                    .expect("children are aggregated before their parent");
            }
            if id == self.root {
                total_mass = mass;
            }
            self.slot_mut(id)?.joint.set_mass_aggregates(mass, mass_com);
        }
        Ok(total_mass)
    }

    /// Center of mass of all bodies in the tree, in the world frame
    ///
    /// Refreshes the mass aggregates from the current transforms first.
    /// Fails with `Error::ZeroMass` when no body carries mass: the average
    /// is undefined then.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::*;
    /// use nalgebra::{Translation3, Vector3};
    ///
    /// let mut tree = KinematicTree::from_root(
    ///     JointBuilder::new().name("root").body(Body::from_mass(1.0)).finalize(),
    /// );
    /// let tip = tree.insert(
    ///     JointBuilder::new()
    ///         .name("tip")
    ///         .translation(Translation3::new(0.0, 0.0, 1.0))
    ///         .body(Body::from_mass(3.0))
    ///         .finalize(),
    /// );
    /// tree.add_child_joint(tree.root(), tip).unwrap();
    ///
    /// tree.update_transforms(&[]).unwrap();
    /// assert_eq!(tree.center_of_mass().unwrap(), Vector3::new(0.0, 0.0, 0.75));
    /// ```
    pub fn center_of_mass(&mut self) -> Result<Vector3<T>, Error> {
        let total_mass = self.update_masses()?;
        if total_mass == T::zero() {
            return Err(Error::ZeroMass);
        }
        let mass_com = self
            .joint(self.root)?
            .subtree_mass_times_com()
            .expect("update_masses fills the root aggregate");
        Ok(mass_com / total_mass)
    }

    /// Jacobian of the whole-body center of mass: 3 rows by `dof()` columns
    ///
    /// Column `rank_in_velocity + i` of a joint holds the velocity of the
    /// center of mass induced by a unit change of the joint's coordinate
    /// `i`: the velocity it induces at its subtree's own center of mass,
    /// weighted by the subtree's share of the total mass. Refreshes the
    /// mass aggregates first; fails with `Error::ZeroMass` when the tree
    /// carries no mass.
    pub fn com_jacobian(&mut self) -> Result<Matrix3xX<T>, Error> {
        let total_mass = self.update_masses()?;
        if total_mass == T::zero() {
            return Err(Error::ZeroMass);
        }
        let order: Vec<JointId> = self.iter_descendants(self.root).collect();
        let mut jacobian = Matrix3xX::zeros(self.dof);
        for id in order {
            let joint = &self.slot(id)?.joint;
            let own_position = joint
                .world_transform()
                .ok_or(Error::TransformsNotComputed)?;
            let subtree_mass = joint
                .subtree_mass()
                .ok_or(Error::TransformsNotComputed)?;
            let subtree_mass_times_com = joint
                .subtree_mass_times_com()
                .ok_or(Error::TransformsNotComputed)?;
            joint.write_com_sub_jacobian(
                &own_position,
                subtree_mass,
                &subtree_mass_times_com,
                total_mass,
                &mut jacobian,
            );
        }
        Ok(jacobian)
    }

    fn fmt_with_indent_level(
        &self,
        id: JointId,
        level: usize,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        if let Ok(slot) = self.slot(id) {
            writeln!(f, "{}{}", "    ".repeat(level), slot.joint)?;
            for &child in &slot.children {
                self.fmt_with_indent_level(child, level + 1, f)?;
            }
        }
        Ok(())
    }
}

impl<T: RealField + Copy + SubsetOf<f64>> Display for KinematicTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_with_indent_level(self.root, 0, f)
    }
}

#[test]
fn it_works() {
    use crate::joint::{JointBuilder, JointKind};
    use na::{Translation3, Vector3};

    let mut tree = KinematicTree::from_root(
        JointBuilder::new()
            .name("j0")
            .translation(Translation3::new(0.0, 0.1, 0.0))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .finalize(),
    );
    let j1 = tree.insert(
        JointBuilder::new()
            .name("j1")
            .translation(Translation3::new(0.0, 0.1, 0.1))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .finalize(),
    );
    let j2 = tree.insert(
        JointBuilder::new()
            .name("j2")
            .translation(Translation3::new(0.0, 0.1, 0.1))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .finalize(),
    );
    let j3 = tree.insert(
        JointBuilder::new()
            .name("j3")
            .translation(Translation3::new(0.0, 0.1, 0.2))
            .kind(JointKind::Rotational {
                axis: Vector3::y_axis(),
            })
            .finalize(),
    );
    tree.add_child_joint(tree.root(), j1).unwrap();
    tree.add_child_joint(j1, j2).unwrap();
    tree.add_child_joint(tree.root(), j3).unwrap();

    let names: Vec<String> = tree
        .iter_descendants(tree.root())
        .map(|id| tree.joint(id).unwrap().name.clone())
        .collect();
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "j0");

    // every parent comes before its children
    let order: Vec<JointId> = tree.iter_descendants(tree.root()).collect();
    for (i, &id) in order.iter().enumerate() {
        if let Some(parent) = tree.parent(id).unwrap() {
            assert!(order[..i].contains(&parent));
        }
    }

    let transforms = tree.update_transforms(&[0.0; 4]).unwrap();
    assert_eq!(transforms.len(), 4);
    println!("{}", tree);

    assert_eq!(
        tree.iter_ancestors(j2).collect::<Vec<_>>(),
        vec![j2, j1, tree.root()]
    );
}

#[test]
fn cycles_are_rejected() {
    use crate::joint::{Joint, JointKind};

    let mut tree = KinematicTree::from_root(Joint::<f64>::new("root", JointKind::Anchor));
    let a = tree.insert(Joint::new("a", JointKind::Anchor));
    let b = tree.insert(Joint::new("b", JointKind::Anchor));
    tree.add_child_joint(a, b).unwrap();

    // self-attachment and ancestor-attachment are both cycles
    assert!(matches!(
        tree.add_child_joint(a, a),
        Err(Error::CycleDetected { .. })
    ));
    assert!(matches!(
        tree.add_child_joint(b, a),
        Err(Error::CycleDetected { .. })
    ));
    // an attached joint is rejected before the cycle walk
    assert_eq!(
        tree.add_child_joint(a, b).unwrap_err(),
        Error::AlreadyParented {
            joint_name: "b".to_owned(),
        }
    );

    // the free subtree `a -> b` is still attachable to the real root
    tree.add_child_joint(tree.root(), a).unwrap();
    assert_eq!(tree.num_children(tree.root()).unwrap(), 1);
}
