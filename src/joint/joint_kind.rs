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
use nalgebra as na;
use nalgebra::{Isometry3, Quaternion, RealField, Translation3, Unit, UnitQuaternion, Vector3};
use simba::scalar::SubsetOf;
use std::fmt::{self, Display};
use tracing::warn;

/// Quaternion norm under which the configuration slice cannot be normalized
/// into a rotation.
const DEGENERATE_QUATERNION_NORM: f64 = 1.0e-12;

/// Kind of a joint: the closed set of input spaces a joint maps to a
/// transform relative to its parent.
///
/// Each kind fixes how many scalars the joint consumes from the global
/// configuration vector (`config_size`) and from the velocity vector
/// (`dof`):
///
/// | kind | config size | dof | input space |
/// |------|-------------|-----|-------------|
/// | `Anchor` | 0 | 0 | trivial |
/// | `Spherical` | 4 | 3 | unit quaternion `(w, x, y, z)` |
/// | `Rotational` | 1 | 1 | angle about a fixed axis |
/// | `Linear` | 1 | 1 | length along a fixed axis |
#[derive(Copy, Debug, Clone)]
pub enum JointKind<T: RealField + Copy> {
    /// No degree of freedom. Used as an intermediate frame in a chain, or as
    /// the root of a multi-mechanism tree.
    Anchor,
    /// Maps a unit quaternion to a rotation of SO(3).
    Spherical,
    /// Rotation of an angle \[rad\] about `axis`, expressed in the frame
    /// placed by the joint's initial transform. The angle of an unbounded
    /// rotational joint wraps modulo a full turn; interpolation and distance
    /// under that wrap-around belong to the caller's joint-space helper, and
    /// nothing here assumes the angle moves monotonically between
    /// configurations.
    Rotational {
        /// axis of the joint
        axis: Unit<Vector3<T>>,
    },
    /// Translation of a length along `axis`, expressed in the frame placed
    /// by the joint's initial transform.
    Linear {
        /// axis of the joint
        axis: Unit<Vector3<T>>,
    },
}

impl<T> JointKind<T>
where
    T: RealField + Copy,
{
    /// Number of scalars the joint consumes from the configuration vector.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(kinetree::JointKind::<f64>::Spherical.config_size(), 4);
    /// assert_eq!(kinetree::JointKind::<f64>::Anchor.config_size(), 0);
    /// ```
    pub fn config_size(&self) -> usize {
        match self {
            JointKind::Anchor => 0,
            JointKind::Spherical => 4,
            JointKind::Rotational { .. } => 1,
            JointKind::Linear { .. } => 1,
        }
    }
    /// Number of degrees of freedom: scalars the joint consumes from the
    /// velocity vector. Differs from `config_size` for `Spherical` (a unit
    /// quaternion has 4 coordinates but 3 degrees of freedom).
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Vector3;
    /// assert_eq!(kinetree::JointKind::<f64>::Spherical.dof(), 3);
    /// assert_eq!(kinetree::JointKind::Rotational { axis: Vector3::<f64>::z_axis() }.dof(), 1);
    /// ```
    pub fn dof(&self) -> usize {
        match self {
            JointKind::Anchor => 0,
            JointKind::Spherical => 3,
            JointKind::Rotational { .. } => 1,
            JointKind::Linear { .. } => 1,
        }
    }
}

impl<T> JointKind<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    /// Map a configuration slice of `config_size` scalars to the transform
    /// of the joint frame relative to the frame placed by the joint's
    /// initial transform.
    ///
    /// The slice length is the caller's responsibility; every intermediate
    /// is recomputed from the slice on each call.
    pub(crate) fn motion_transform(&self, q: &[T]) -> Isometry3<T> {
        match *self {
            JointKind::Anchor => Isometry3::identity(),
            JointKind::Spherical => {
                Isometry3::from_parts(Translation3::identity(), unit_quaternion_from_slice(q))
            }
            JointKind::Rotational { axis } => Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&axis, q[0]),
            ),
            JointKind::Linear { axis } => Isometry3::from_parts(
                Translation3::from(axis.into_inner() * q[0]),
                UnitQuaternion::identity(),
            ),
        }
    }
}

/// Rotation from a `(w, x, y, z)` quaternion slice, renormalized
/// defensively: slices drift off unit length over many planning queries, so
/// unit norm is never assumed. A near-zero norm cannot be normalized at all;
/// it falls back to the identity rotation and is logged as a recoverable
/// anomaly rather than aborting the caller's search.
fn unit_quaternion_from_slice<T>(q: &[T]) -> UnitQuaternion<T>
where
    T: RealField + Copy + SubsetOf<f64>,
{
    let quaternion = Quaternion::new(q[0], q[1], q[2], q[3]);
    let norm = quaternion.norm();
    if norm <= na::convert(DEGENERATE_QUATERNION_NORM) {
        warn!(
            norm = na::convert::<T, f64>(norm),
            "degenerate quaternion configuration, falling back to identity rotation"
        );
        UnitQuaternion::identity()
    } else {
        UnitQuaternion::from_quaternion(quaternion)
    }
}

fn axis_to_string<T: RealField + Copy>(axis: &Unit<Vector3<T>>) -> &str {
    if *axis == Vector3::x_axis() {
        "+X"
    } else if *axis == Vector3::y_axis() {
        "+Y"
    } else if *axis == Vector3::z_axis() {
        "+Z"
    } else if *axis == -Vector3::x_axis() {
        "-X"
    } else if *axis == -Vector3::y_axis() {
        "-Y"
    } else if *axis == -Vector3::z_axis() {
        "-Z"
    } else {
        ""
    }
}

impl<T: RealField + Copy> Display for JointKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JointKind::Anchor => write!(f, "[⚓]"),
            JointKind::Spherical => write!(f, "[◎]"),
            JointKind::Rotational { axis } => write!(f, "[⚙{}]", axis_to_string(axis)),
            JointKind::Linear { axis } => write!(f, "[↕{}]", axis_to_string(axis)),
        }
    }
}
