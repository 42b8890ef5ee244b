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
//! Iterators to visit the ancestors and descendants of a joint
use crate::tree::{JointId, KinematicTree};
use na::RealField;
use nalgebra as na;

/// Iterator over a joint and its ancestors, from the joint up to the root
#[derive(Debug)]
pub struct Ancestors<'a, T>
where
    T: RealField + Copy,
{
    tree: &'a KinematicTree<T>,
    next: Option<JointId>,
}

impl<'a, T> Ancestors<'a, T>
where
    T: RealField + Copy,
{
    pub(crate) fn new(tree: &'a KinematicTree<T>, start: Option<JointId>) -> Self {
        Self { tree, next: start }
    }
}

impl<T> Iterator for Ancestors<'_, T>
where
    T: RealField + Copy,
{
    type Item = JointId;

    fn next(&mut self) -> Option<JointId> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}

/// Iterator over a joint and its descendants, every parent before its
/// children; no order is guaranteed between siblings
#[derive(Debug)]
pub struct Descendants<'a, T>
where
    T: RealField + Copy,
{
    tree: &'a KinematicTree<T>,
    stack: Vec<JointId>,
}

impl<'a, T> Descendants<'a, T>
where
    T: RealField + Copy,
{
    pub(crate) fn new(tree: &'a KinematicTree<T>, stack: Vec<JointId>) -> Self {
        Self { tree, stack }
    }
}

impl<T> Iterator for Descendants<'_, T>
where
    T: RealField + Copy,
{
    type Item = JointId;

    fn next(&mut self) -> Option<JointId> {
        let current = self.stack.pop()?;
        self.stack.extend_from_slice(self.tree.children_of(current));
        Some(current)
    }
}
