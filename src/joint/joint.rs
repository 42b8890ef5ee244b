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
use super::bounds::DofBound;
use super::joint_kind::JointKind;
use crate::body::Body;
use crate::errors::Error;
use na::{Isometry3, Matrix3xX, Matrix6xX, RealField, Translation3, UnitQuaternion, Vector3};
use nalgebra as na;
use simba::scalar::SubsetOf;
use std::fmt::{self, Display};

/// Joint with a kind, per-DOF bounds, an optional body, and the cached
/// results of the propagation passes.
///
/// A joint consumes a fixed slice of the global configuration vector,
/// located by `rank_in_configuration()` and `config_size()`, and a fixed
/// slice of the velocity vector, located by `rank_in_velocity()` and
/// `dof()`. The ranks are assigned by the [`KinematicTree`] when the joint
/// is inserted and never change afterwards.
///
/// The cached world transform, Jacobian and mass aggregates are filled by
/// the tree's propagation passes and read back with `Option` getters:
/// `None` means the corresponding pass has not run since the last change
/// that invalidated it.
///
/// [`KinematicTree`]: ../struct.KinematicTree.html
#[derive(Debug, Clone)]
pub struct Joint<T: RealField + Copy> {
    /// Name of this joint
    pub name: String,
    /// Body attached to this joint, if any
    pub body: Option<Body<T>>,
    // fixed at construction: the bounds vector and the assigned ranks are
    // sized for it
    kind: JointKind<T>,
    /// per degree-of-freedom bounds, indexed by local rank `0..dof()`
    bounds: Vec<DofBound<T>>,
    /// transform of the joint frame in the parent frame at zero motion
    origin: Isometry3<T>,
    rank_in_configuration: usize,
    rank_in_velocity: usize,
    world_transform_cache: Option<Isometry3<T>>,
    jacobian_cache: Option<Matrix6xX<T>>,
    subtree_mass_cache: Option<T>,
    subtree_mass_com_cache: Option<Vector3<T>>,
}

impl<T> Joint<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Create a new Joint with name and kind
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    ///
    /// // create an anchor joint
    /// let anchor = kinetree::Joint::<f32>::new("a0", kinetree::JointKind::Anchor);
    /// assert_eq!(anchor.dof(), 0);
    ///
    /// // create a rotational joint about the Y axis
    /// let rot = kinetree::Joint::<f64>::new(
    ///     "r0",
    ///     kinetree::JointKind::Rotational { axis: na::Vector3::y_axis() },
    /// );
    /// assert_eq!(rot.config_size(), 1);
    /// assert_eq!(rot.dof(), 1);
    /// ```
    pub fn new(name: &str, kind: JointKind<T>) -> Joint<T> {
        Joint {
            name: name.to_string(),
            bounds: vec![DofBound::unbounded(); kind.dof()],
            kind,
            body: None,
            origin: Isometry3::identity(),
            rank_in_configuration: 0,
            rank_in_velocity: 0,
            world_transform_cache: None,
            jacobian_cache: None,
            subtree_mass_cache: None,
            subtree_mass_com_cache: None,
        }
    }
    /// Kind of this joint
    #[inline]
    pub fn kind(&self) -> &JointKind<T> {
        &self.kind
    }
    /// Number of scalars this joint consumes from the configuration vector
    #[inline]
    pub fn config_size(&self) -> usize {
        self.kind.config_size()
    }
    /// Number of scalars this joint consumes from the velocity vector
    #[inline]
    pub fn dof(&self) -> usize {
        self.kind.dof()
    }
    /// Offset of this joint's slice in the configuration vector
    ///
    /// Assigned when the joint is inserted into a tree; 0 for a free joint.
    #[inline]
    pub fn rank_in_configuration(&self) -> usize {
        self.rank_in_configuration
    }
    /// Offset of this joint's columns in the velocity vector
    ///
    /// Assigned when the joint is inserted into a tree; 0 for a free joint.
    #[inline]
    pub fn rank_in_velocity(&self) -> usize {
        self.rank_in_velocity
    }

    #[inline]
    pub(crate) fn set_ranks(&mut self, rank_in_configuration: usize, rank_in_velocity: usize) {
        self.rank_in_configuration = rank_in_configuration;
        self.rank_in_velocity = rank_in_velocity;
    }

    /// Transform of the joint frame in the parent frame at zero motion
    #[inline]
    pub fn origin(&self) -> &Isometry3<T> {
        &self.origin
    }

    /// Set the zero-motion transform of the joint frame in the parent frame
    ///
    /// The cached world transforms of this joint *and of its descendants*
    /// become stale: run `KinematicTree::update_transforms` before reading
    /// poses or assembling Jacobians again.
    #[inline]
    pub fn set_origin(&mut self, origin: Isometry3<T>) {
        self.origin = origin;
        self.clear_caches();
    }

    /// This joint's slice of a full configuration vector
    ///
    /// Returns `Error::SizeMismatchError` if the vector holds fewer than
    /// `rank_in_configuration() + config_size()` scalars. Joint-space
    /// helpers (sampling, interpolation, distance) operate on this slice;
    /// the joint itself only maps it to a transform.
    pub fn configuration_slice<'a>(&self, configuration: &'a [T]) -> Result<&'a [T], Error> {
        let required = self.rank_in_configuration + self.config_size();
        if configuration.len() < required {
            return Err(Error::SizeMismatchError {
                input: configuration.len(),
                required,
            });
        }
        Ok(&configuration[self.rank_in_configuration..required])
    }

    /// Calculate and return the transform of this joint frame in the parent
    /// joint frame at the given configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    ///
    /// // create a linear joint along the X axis
    /// let lin = kinetree::Joint::<f64>::new(
    ///     "l0",
    ///     kinetree::JointKind::Linear { axis: na::Vector3::x_axis() },
    /// );
    /// assert_eq!(lin.local_transform(&[0.0]).unwrap().translation.vector.x, 0.0);
    /// assert_eq!(lin.local_transform(&[-1.0]).unwrap().translation.vector.x, -1.0);
    /// ```
    pub fn local_transform(&self, configuration: &[T]) -> Result<Isometry3<T>, Error> {
        let slice = self.configuration_slice(configuration)?;
        Ok(self.origin * self.kind.motion_transform(slice))
    }

    /// Whether the degree of freedom at the given local rank is bounded
    ///
    /// # Examples
    ///
    /// ```
    /// use kinetree::{Error, Joint, JointKind};
    ///
    /// let mut joint = Joint::<f64>::new("s0", JointKind::Spherical);
    /// assert_eq!(joint.is_bounded(2), Ok(false));
    ///
    /// joint.set_lower_bound(2, -1.0).unwrap();
    /// joint.set_upper_bound(2, 1.0).unwrap();
    /// // values alone do not bound the DOF; the flag does
    /// assert_eq!(joint.lower_bound(2), Err(Error::UnboundedDof {
    ///     joint_name: "s0".to_owned(),
    ///     rank: 2,
    /// }));
    /// joint.set_bounded(2, true).unwrap();
    /// assert_eq!(joint.lower_bound(2), Ok(-1.0));
    /// assert_eq!(joint.upper_bound(2), Ok(1.0));
    ///
    /// // local ranks stop at dof()
    /// assert!(joint.is_bounded(3).is_err());
    /// ```
    pub fn is_bounded(&self, rank: usize) -> Result<bool, Error> {
        self.check_dof_rank(rank)?;
        Ok(self.bounds[rank].is_bounded())
    }
    /// Flag the degree of freedom at the given local rank bounded or not
    pub fn set_bounded(&mut self, rank: usize, bounded: bool) -> Result<(), Error> {
        self.check_dof_rank(rank)?;
        self.bounds[rank].bounded = bounded;
        Ok(())
    }
    /// Lower bound of the degree of freedom at the given local rank
    ///
    /// Returns `Error::UnboundedDof` if the DOF is not flagged bounded:
    /// the stored value is meaningless then and must not be read silently.
    pub fn lower_bound(&self, rank: usize) -> Result<T, Error> {
        self.check_bounded(rank)?;
        Ok(self.bounds[rank].lower)
    }
    /// Upper bound of the degree of freedom at the given local rank
    ///
    /// Returns `Error::UnboundedDof` if the DOF is not flagged bounded.
    pub fn upper_bound(&self, rank: usize) -> Result<T, Error> {
        self.check_bounded(rank)?;
        Ok(self.bounds[rank].upper)
    }
    /// Set the lower bound of the degree of freedom at the given local rank
    ///
    /// The value is interpreted only while the DOF is flagged bounded, so
    /// flag and values may be set in either order.
    pub fn set_lower_bound(&mut self, rank: usize, lower: T) -> Result<(), Error> {
        self.check_dof_rank(rank)?;
        self.bounds[rank].lower = lower;
        Ok(())
    }
    /// Set the upper bound of the degree of freedom at the given local rank
    pub fn set_upper_bound(&mut self, rank: usize, upper: T) -> Result<(), Error> {
        self.check_dof_rank(rank)?;
        self.bounds[rank].upper = upper;
        Ok(())
    }
    /// Bound of the degree of freedom at the given local rank
    pub fn bound(&self, rank: usize) -> Result<&DofBound<T>, Error> {
        self.check_dof_rank(rank)?;
        Ok(&self.bounds[rank])
    }
    /// Replace the bound of the degree of freedom at the given local rank
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra as na;
    /// use kinetree::{Joint, JointKind};
    ///
    /// let mut rot = Joint::<f64>::new(
    ///     "r0",
    ///     JointKind::Rotational { axis: na::Vector3::z_axis() },
    /// );
    /// rot.set_bound(0, (-1.5..=1.5).into()).unwrap();
    /// assert_eq!(rot.lower_bound(0), Ok(-1.5));
    /// ```
    pub fn set_bound(&mut self, rank: usize, bound: DofBound<T>) -> Result<(), Error> {
        self.check_dof_rank(rank)?;
        self.bounds[rank] = bound;
        Ok(())
    }

    fn check_dof_rank(&self, rank: usize) -> Result<(), Error> {
        if rank >= self.dof() {
            return Err(Error::DofOutOfRange {
                joint_name: self.name.to_string(),
                rank,
                dof: self.dof(),
            });
        }
        Ok(())
    }

    fn check_bounded(&self, rank: usize) -> Result<(), Error> {
        self.check_dof_rank(rank)?;
        if !self.bounds[rank].bounded {
            return Err(Error::UnboundedDof {
                joint_name: self.name.to_string(),
                rank,
            });
        }
        Ok(())
    }

    /// Get the result of the position pass
    ///
    /// `None` until `KinematicTree::update_transforms` has run after the
    /// last invalidating change.
    #[inline]
    pub fn world_transform(&self) -> Option<Isometry3<T>> {
        self.world_transform_cache
    }

    #[inline]
    pub(crate) fn set_world_transform(&mut self, world_transform: Isometry3<T>) {
        self.world_transform_cache = Some(world_transform);
        // a new pose invalidates everything derived from the old one
        self.jacobian_cache = None;
        self.subtree_mass_cache = None;
        self.subtree_mass_com_cache = None;
    }

    /// Get the result of the Jacobian pass
    ///
    /// 6 rows by whole-tree DOF columns: rows 0..3 are the angular part,
    /// rows 3..6 the linear part, both in the world frame at this joint's
    /// origin. `None` until `KinematicTree::update_jacobians` has run after
    /// the most recent position pass.
    #[inline]
    pub fn jacobian(&self) -> Option<&Matrix6xX<T>> {
        self.jacobian_cache.as_ref()
    }

    #[inline]
    pub(crate) fn set_jacobian(&mut self, jacobian: Matrix6xX<T>) {
        self.jacobian_cache = Some(jacobian);
    }

    /// Get the aggregate mass of this joint and all its descendants
    ///
    /// `None` until `KinematicTree::update_masses` has run after the most
    /// recent position pass.
    #[inline]
    pub fn subtree_mass(&self) -> Option<T> {
        self.subtree_mass_cache
    }

    /// Get the aggregate mass times center of mass of this joint and all
    /// its descendants, expressed in the world frame
    ///
    /// `None` until `KinematicTree::update_masses` has run after the most
    /// recent position pass.
    #[inline]
    pub fn subtree_mass_times_com(&self) -> Option<Vector3<T>> {
        self.subtree_mass_com_cache
    }

    #[inline]
    pub(crate) fn set_mass_aggregates(&mut self, mass: T, mass_times_com: Vector3<T>) {
        self.subtree_mass_cache = Some(mass);
        self.subtree_mass_com_cache = Some(mass_times_com);
    }

    #[inline]
    pub(crate) fn clear_caches(&mut self) {
        self.world_transform_cache = None;
        self.jacobian_cache = None;
        self.subtree_mass_cache = None;
        self.subtree_mass_com_cache = None;
    }

    /// Write the columns of this joint's degrees of freedom into the
    /// Jacobian of a descendant joint (or of this joint itself, with
    /// `descendant_position == own_position`).
    ///
    /// Column `rank_in_velocity() + i` receives the spatial velocity that a
    /// unit change of coordinate `i` induces at the descendant's frame:
    /// angular part in rows 0..3, linear part in rows 3..6. The linear part
    /// of a rotational DOF is the transport term `axis x (p_descendant -
    /// p_own)`. All other columns are left untouched.
    pub(crate) fn write_sub_jacobian(
        &self,
        own_position: &Isometry3<T>,
        descendant_position: &Isometry3<T>,
        jacobian: &mut Matrix6xX<T>,
    ) {
        let arm = descendant_position.translation.vector - own_position.translation.vector;
        match self.kind {
            JointKind::Anchor => {}
            JointKind::Spherical => {
                for i in 0..3 {
                    let omega = (own_position.rotation * Vector3::ith_axis(i)).into_inner();
                    let col = self.rank_in_velocity + i;
                    jacobian.fixed_view_mut::<3, 1>(0, col).copy_from(&omega);
                    jacobian
                        .fixed_view_mut::<3, 1>(3, col)
                        .copy_from(&omega.cross(&arm));
                }
            }
            JointKind::Rotational { axis } => {
                let omega = (own_position.rotation * axis).into_inner();
                let col = self.rank_in_velocity;
                jacobian.fixed_view_mut::<3, 1>(0, col).copy_from(&omega);
                jacobian
                    .fixed_view_mut::<3, 1>(3, col)
                    .copy_from(&omega.cross(&arm));
            }
            JointKind::Linear { axis } => {
                let v = (own_position.rotation * axis).into_inner();
                jacobian
                    .fixed_view_mut::<3, 1>(3, self.rank_in_velocity)
                    .copy_from(&v);
            }
        }
    }

    /// Write the columns of this joint's degrees of freedom into the
    /// whole-body center-of-mass Jacobian.
    ///
    /// The contribution moves this joint's whole subtree, so each column is
    /// the velocity the DOF induces at the subtree's center of mass, scaled
    /// by the subtree's share `subtree_mass / total_mass` of the total. A
    /// subtree of zero mass has no center of mass and contributes nothing.
    pub(crate) fn write_com_sub_jacobian(
        &self,
        own_position: &Isometry3<T>,
        subtree_mass: T,
        subtree_mass_times_com: &Vector3<T>,
        total_mass: T,
        jacobian: &mut Matrix3xX<T>,
    ) {
        if subtree_mass == T::zero() {
            return;
        }
        let fraction = subtree_mass / total_mass;
        let subtree_com = *subtree_mass_times_com / subtree_mass;
        match self.kind {
            JointKind::Anchor => {}
            JointKind::Spherical => {
                let arm = subtree_com - own_position.translation.vector;
                for i in 0..3 {
                    let omega = (own_position.rotation * Vector3::ith_axis(i)).into_inner();
                    jacobian.set_column(self.rank_in_velocity + i, &(omega.cross(&arm) * fraction));
                }
            }
            JointKind::Rotational { axis } => {
                let arm = subtree_com - own_position.translation.vector;
                let omega = (own_position.rotation * axis).into_inner();
                jacobian.set_column(self.rank_in_velocity, &(omega.cross(&arm) * fraction));
            }
            JointKind::Linear { axis } => {
                let v = (own_position.rotation * axis).into_inner();
                jacobian.set_column(self.rank_in_velocity, &(v * fraction));
            }
        }
    }
}

impl<T: RealField + Copy + SubsetOf<f64>> Display for Joint<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.kind)?;
        if let Some(pose) = self.world_transform_cache {
            let p = pose.translation.vector;
            write!(
                f,
                " ({:.3}, {:.3}, {:.3})",
                na::convert::<T, f64>(p.x),
                na::convert::<T, f64>(p.y),
                na::convert::<T, f64>(p.z),
            )?;
        }
        Ok(())
    }
}

/// Build a `Joint<T>`
///
/// # Examples
///
/// ```
/// use kinetree::*;
/// use nalgebra::{Translation3, Vector3};
///
/// let j0 = JointBuilder::new()
///     .name("shoulder_pitch")
///     .translation(Translation3::new(0.0, 0.1, 0.0))
///     .kind(JointKind::Rotational { axis: Vector3::y_axis() })
///     .finalize();
/// assert_eq!(j0.name, "shoulder_pitch");
/// ```
#[derive(Debug, Clone)]
pub struct JointBuilder<T: RealField + Copy> {
    name: String,
    kind: JointKind<T>,
    origin: Isometry3<T>,
    body: Option<Body<T>>,
}

impl<T> Default for JointBuilder<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JointBuilder<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    pub fn new() -> JointBuilder<T> {
        JointBuilder {
            name: "".to_string(),
            kind: JointKind::Anchor,
            origin: Isometry3::identity(),
            body: None,
        }
    }
    /// Set the name of the joint
    pub fn name(mut self, name: &str) -> JointBuilder<T> {
        self.name = name.to_string();
        self
    }
    /// Set the kind of the joint
    pub fn kind(mut self, kind: JointKind<T>) -> JointBuilder<T> {
        self.kind = kind;
        self
    }
    /// Set the zero-motion transform of the joint in the parent frame
    pub fn origin(mut self, origin: Isometry3<T>) -> JointBuilder<T> {
        self.origin = origin;
        self
    }
    /// Set the translation of the zero-motion transform
    pub fn translation(mut self, translation: Translation3<T>) -> JointBuilder<T> {
        self.origin.translation = translation;
        self
    }
    /// Set the rotation of the zero-motion transform
    pub fn rotation(mut self, rotation: UnitQuaternion<T>) -> JointBuilder<T> {
        self.origin.rotation = rotation;
        self
    }
    /// Attach a body to the joint
    pub fn body(mut self, body: Body<T>) -> JointBuilder<T> {
        self.body = Some(body);
        self
    }
    /// Create a `Joint` instance
    pub fn finalize(self) -> Joint<T> {
        let mut joint = Joint::new(&self.name, self.kind);
        joint.set_origin(self.origin);
        joint.body = self.body;
        joint
    }
}
