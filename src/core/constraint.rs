// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::core::{math, Error};
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Simple bounds `lower[i] <= x[i] <= upper[i]` on the variables.
///
/// # Example
///
/// ```
/// use boxmin::core::BoxConstraint;
///
/// let con = BoxConstraint::new(vec![0.0, -1.0], vec![1.0, 1.0]).unwrap();
/// let mut x = vec![3.0, -5.0];
/// con.project(&mut x);
/// assert_eq!(x, vec![1.0, -1.0]);
/// assert!(con.is_feasible(&x));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct BoxConstraint {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoxConstraint {
    /// Creates a new box constraint.
    ///
    /// Fails with `DimensionMismatch` if the bound vectors differ in length
    /// and with `InvalidParameter` if `lower[i] > upper[i]` for some `i`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, Error> {
        if lower.len() != upper.len() {
            return Err(boxmin_error!(
                DimensionMismatch,
                "BoxConstraint: lower and upper bounds must have the same length"
            ));
        }
        if lower.iter().zip(upper.iter()).any(|(&l, &u)| l > u) {
            return Err(boxmin_error!(
                InvalidParameter,
                "BoxConstraint: lower bound above upper bound"
            ));
        }
        Ok(BoxConstraint { lower, upper })
    }

    /// Dimension of the constrained space.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower bound vector.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound vector.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Clamps `x` onto the box in place.
    pub fn project(&self, x: &mut [f64]) {
        math::proj(&self.lower, &self.upper, x);
    }

    /// Returns `true` if `lower[i] <= x[i] <= upper[i]` for all `i`.
    pub fn is_feasible(&self, x: &[f64]) -> bool {
        x.len() == self.lower.len()
            && x.iter()
                .enumerate()
                .all(|(i, &xi)| self.lower[i] <= xi && xi <= self.upper[i])
    }
}
