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
use nalgebra::RealField;

/// Bound record for one degree of freedom: a bounded flag plus the
/// `[lower, upper]` values it gates.
///
/// The values are stored even while the flag is clear, so flag and values may
/// be set in either order; they are only *interpreted* once the flag is set.
/// Flag-checked reads live on [`Joint`](crate::Joint)
/// (`lower_bound`/`upper_bound`), which report an error instead of handing
/// out a value that was never meant to be read.
#[derive(Copy, Debug, Clone)]
pub struct DofBound<T: RealField + Copy> {
    pub(crate) bounded: bool,
    pub(crate) lower: T,
    pub(crate) upper: T,
}

impl<T> DofBound<T>
where
    T: RealField + Copy,
{
    /// Create an unbounded record (flag clear, values zero).
    pub fn unbounded() -> Self {
        DofBound {
            bounded: false,
            lower: T::zero(),
            upper: T::zero(),
        }
    }
    /// Create a bounded record.
    ///
    /// In case `lower` is greater than `upper`, this function panics.
    ///
    /// # Examples
    ///
    /// ```
    /// let bound = kinetree::joint::DofBound::new(-1.0, 1.0);
    /// assert!(bound.is_bounded());
    /// // let bound = kinetree::joint::DofBound::new(1.0, -1.0);  // panic
    /// ```
    pub fn new(lower: T, upper: T) -> Self {
        assert!(
            lower <= upper,
            "lower must be less than or equal to upper"
        );
        DofBound {
            bounded: true,
            lower,
            upper,
        }
    }
    /// Whether the bounded flag is set.
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }
    /// Check if the value is within the bound.
    ///
    /// An unbounded record accepts every value; the limit values themselves
    /// are valid.
    ///
    /// # Examples
    ///
    /// ```
    /// let bound = kinetree::joint::DofBound::new(-1.0, 1.0);
    /// assert!(bound.is_valid(0.0));
    /// assert!(bound.is_valid(1.0));
    /// assert!(!bound.is_valid(1.5));
    /// assert!(kinetree::joint::DofBound::unbounded().is_valid(1.5));
    /// ```
    pub fn is_valid(&self, val: T) -> bool {
        !self.bounded || (val <= self.upper && val >= self.lower)
    }
    /// Clamp the value into the bound. An unbounded record returns the value
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// let bound = kinetree::joint::DofBound::new(-1.0, 1.0);
    /// assert_eq!(bound.clamp(2.0), 1.0);
    /// assert_eq!(bound.clamp(-2.0), -1.0);
    /// assert_eq!(bound.clamp(0.5), 0.5);
    /// ```
    pub fn clamp(&self, val: T) -> T {
        if !self.bounded {
            val
        } else if val < self.lower {
            self.lower
        } else if val > self.upper {
            self.upper
        } else {
            val
        }
    }
}

impl<T> From<::std::ops::RangeInclusive<T>> for DofBound<T>
where
    T: RealField + Copy,
{
    /// # Examples
    ///
    /// ```
    /// let bound: kinetree::joint::DofBound<f64> = (-1.0..=1.0).into();
    /// assert!(bound.is_valid(0.0));
    /// assert!(!bound.is_valid(1.5));
    /// ```
    fn from(range: ::std::ops::RangeInclusive<T>) -> Self {
        let (lower, upper) = range.into_inner();
        DofBound::new(lower, upper)
    }
}
