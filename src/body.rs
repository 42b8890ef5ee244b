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
use nalgebra::{Isometry3, RealField};

/// Rigid body carried by a joint: a mass and the pose of its center of mass
/// in the joint frame.
///
/// Only the translation of `origin` enters the mass aggregation; the
/// rotation is kept so a body can double as an attachment frame for
/// sensors or payload markers.
///
/// # Examples
///
/// ```
/// use kinetree::Body;
///
/// let body = Body::from_mass(1.5);
/// assert_eq!(body.mass, 1.5);
/// assert_eq!(*body.origin(), nalgebra::Isometry3::identity());
/// ```
#[derive(Debug, Clone)]
pub struct Body<T: RealField + Copy> {
    /// Name of this body
    pub name: String,
    /// Mass \[kg\]. Zero is legal: the body then contributes nothing to the
    /// aggregated mass or center of mass.
    pub mass: T,
    origin: Isometry3<T>,
}

impl<T> Body<T>
where
    T: RealField + Copy,
{
    /// Body of the given mass with its center of mass at the joint frame
    /// origin.
    pub fn from_mass(mass: T) -> Self {
        Self {
            name: String::new(),
            mass,
            origin: Isometry3::identity(),
        }
    }
    /// Body of the given mass with its center of mass at `origin`,
    /// expressed in the joint frame.
    pub fn new(origin: Isometry3<T>, mass: T) -> Self {
        Self {
            name: String::new(),
            mass,
            origin,
        }
    }
    /// Pose of the center of mass in the joint frame.
    pub fn origin(&self) -> &Isometry3<T> {
        &self.origin
    }
    pub fn set_origin(&mut self, origin: Isometry3<T>) {
        self.origin = origin;
    }
}

/// Builder for [`Body`](struct.Body.html)
///
/// # Examples
///
/// ```
/// use kinetree::BodyBuilder;
/// use nalgebra::{Isometry3, Vector3};
///
/// let body = BodyBuilder::new()
///     .name("forearm")
///     .mass(0.8)
///     .origin(Isometry3::translation(0.0, 0.0, 0.12))
///     .finalize();
/// assert_eq!(body.name, "forearm");
/// assert_eq!(body.origin().translation.vector, Vector3::new(0.0, 0.0, 0.12));
/// ```
pub struct BodyBuilder<T>
where
    T: RealField + Copy,
{
    name: String,
    mass: T,
    origin: Isometry3<T>,
}

impl<T> Default for BodyBuilder<T>
where
    T: RealField + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BodyBuilder<T>
where
    T: RealField + Copy,
{
    pub fn new() -> Self {
        Self {
            name: String::new(),
            mass: T::zero(),
            origin: Isometry3::identity(),
        }
    }
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }
    pub fn mass(mut self, mass: T) -> Self {
        self.mass = mass;
        self
    }
    pub fn origin(mut self, origin: Isometry3<T>) -> Self {
        self.origin = origin;
        self
    }
    pub fn finalize(self) -> Body<T> {
        Body {
            name: self.name,
            mass: self.mass,
            origin: self.origin,
        }
    }
}
