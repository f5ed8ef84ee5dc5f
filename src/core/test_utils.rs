// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Shared test problems.

use crate::core::{CostFunction, CostGradient, Error, Gradient, HessianProduct};

/// Separable diagonal quadratic `f(x) = sum_i (i+1) * (x_i - (i+1)/10)^2`.
///
/// The unconstrained minimizer is `x_i = (i+1)/10`; inside the box
/// `[-3, 3]^n` the constrained minimizer is `x_i = min(3, (i+1)/10)`.
#[derive(Clone, Debug)]
pub struct DiagQuadratic {
    n: usize,
}

impl DiagQuadratic {
    pub fn new(n: usize) -> Self {
        DiagQuadratic { n }
    }

    /// Minimizer of the problem restricted to `[-3, 3]^n`.
    pub fn boxed_solution(&self) -> Vec<f64> {
        (0..self.n)
            .map(|i| (3.0f64).min((i as f64 + 1.0) / 10.0))
            .collect()
    }
}

impl CostFunction for DiagQuadratic {
    fn cost(&self, param: &[f64]) -> Result<f64, Error> {
        Ok(param
            .iter()
            .enumerate()
            .map(|(i, &xi)| {
                let di = xi - (i as f64 + 1.0) / 10.0;
                (i as f64 + 1.0) * di * di
            })
            .sum())
    }
}

impl Gradient for DiagQuadratic {
    fn gradient(&self, param: &[f64]) -> Result<Vec<f64>, Error> {
        Ok(param
            .iter()
            .enumerate()
            .map(|(i, &xi)| 2.0 * (i as f64 + 1.0) * (xi - (i as f64 + 1.0) / 10.0))
            .collect())
    }
}

impl CostGradient for DiagQuadratic {}

impl HessianProduct for DiagQuadratic {
    fn hessian_product(&self, param: &[f64], v: &[f64]) -> Result<Vec<f64>, Error> {
        Ok(param
            .iter()
            .enumerate()
            .map(|(i, _)| 2.0 * (i as f64 + 1.0) * v[i])
            .collect())
    }
}

/// Shifted sphere `f(x) = sum_i (x_i - 5)^2` whose unconstrained minimum at
/// `(5, ..., 5)` lies outside the unit box, so every bound activates.
#[derive(Clone, Debug)]
pub struct ShiftedSphere {}

impl CostFunction for ShiftedSphere {
    fn cost(&self, param: &[f64]) -> Result<f64, Error> {
        Ok(param.iter().map(|&xi| (xi - 5.0) * (xi - 5.0)).sum())
    }
}

impl Gradient for ShiftedSphere {
    fn gradient(&self, param: &[f64]) -> Result<Vec<f64>, Error> {
        Ok(param.iter().map(|&xi| 2.0 * (xi - 5.0)).collect())
    }
}

impl CostGradient for ShiftedSphere {}

impl HessianProduct for ShiftedSphere {
    fn hessian_product(&self, _param: &[f64], v: &[f64]) -> Result<Vec<f64>, Error> {
        Ok(v.iter().map(|&vi| 2.0 * vi).collect())
    }
}
