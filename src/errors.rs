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
//! Error types returned by tree mutation, bound access and propagation
use thiserror::Error;

/// Failures reported by joint and tree operations.
///
/// Caller contract violations (out-of-range indices, invalid tree mutations,
/// reading a bound that was never set) fail at the point of misuse; they are
/// never retried or silently clamped.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A vector or slice did not have the expected number of scalars.
    #[error("size mismatch: input = {input}, required = {required}")]
    SizeMismatchError { input: usize, required: usize },
    /// The handle does not name a joint of this tree (never inserted, or
    /// removed by a detach).
    #[error("no joint for id {id}")]
    InvalidJointId { id: usize },
    /// A joint-local degree-of-freedom rank was out of range.
    #[error("joint {joint_name}: degree of freedom {rank} is out of range (dof = {dof})")]
    DofOutOfRange {
        joint_name: String,
        rank: usize,
        dof: usize,
    },
    /// A child was requested by a rank `>= num_children`.
    #[error("joint {joint_name}: child rank {rank} is out of range ({num_children} children)")]
    ChildOutOfRange {
        joint_name: String,
        rank: usize,
        num_children: usize,
    },
    /// The joint is already attached (the root counts as attached).
    #[error("joint {joint_name} already has a parent")]
    AlreadyParented { joint_name: String },
    /// The attachment would make a joint its own ancestor.
    #[error("attaching joint {child_name} under {parent_name} would create a cycle")]
    CycleDetected {
        parent_name: String,
        child_name: String,
    },
    /// The root joint anchors the tree and cannot be detached.
    #[error("the root joint cannot be detached")]
    DetachRoot,
    /// Lower/upper bound read on a degree of freedom whose bounded flag is
    /// not set.
    #[error("joint {joint_name}: degree of freedom {rank} is not bounded")]
    UnboundedDof { joint_name: String, rank: usize },
    /// A pass that consumes cached world transforms ran before
    /// `update_transforms`.
    #[error("world transforms have not been computed for this tree")]
    TransformsNotComputed,
    /// The tree carries no mass, so mass-fraction weighting is undefined.
    #[error("total mass of the tree is zero")]
    ZeroMass,
}
