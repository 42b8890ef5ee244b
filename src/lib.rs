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
//! # Joint-tree kinematics library using [nalgebra](https://nalgebra.org).
//!
//! `kinetree` models an articulated mechanism as a tree of joints, each
//! consuming a slice of a global configuration vector and mapping it to a
//! rigid transform. Three propagation passes derive data from a
//! configuration:
//!
//! 1. world transforms of every joint (forward kinematics),
//! 1. geometric Jacobians, per joint and for the whole-body center of mass,
//! 1. mass and center-of-mass aggregates per subtree.
//!
//! See `KinematicTree` as the top level interface.
//!
mod body;
mod errors;
mod tree;
use nalgebra as na;
pub mod iterator;
pub mod joint;

pub use self::body::*;
pub use self::errors::*;
pub use self::joint::{DofBound, Joint, JointBuilder, JointKind};
pub use self::tree::*;

// re-export from nalgebra
pub use na::{Isometry3, RealField, Translation3, UnitQuaternion, Vector3};
pub use simba::scalar::{SubsetOf, SupersetOf};
