// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Optimization problems
//!
//! Traits for defining the objective function and the counting wrapper
//! [`Problem`] through which solvers evaluate it.

use crate::core::Error;

/// Problems which can compute their cost function value
pub trait CostFunction {
    /// Compute the cost function value at `param`.
    fn cost(&self, param: &[f64]) -> Result<f64, Error>;
}

/// Problems which can compute their gradient
pub trait Gradient {
    /// Compute the gradient at `param`. The returned vector must have the
    /// same length as `param`.
    fn gradient(&self, param: &[f64]) -> Result<Vec<f64>, Error>;
}

/// Problems which can compute cost function value and gradient in one call
///
/// The provided implementation evaluates [`CostFunction::cost`] and
/// [`Gradient::gradient`] one after the other; override it when a fused
/// evaluation is cheaper:
///
/// ```
/// # use boxmin::core::{CostFunction, CostGradient, Error, Gradient};
/// # struct Sphere;
/// # impl CostFunction for Sphere {
/// #     fn cost(&self, p: &[f64]) -> Result<f64, Error> {
/// #         Ok(p.iter().map(|x| x * x).sum())
/// #     }
/// # }
/// # impl Gradient for Sphere {
/// #     fn gradient(&self, p: &[f64]) -> Result<Vec<f64>, Error> {
/// #         Ok(p.iter().map(|x| 2.0 * x).collect())
/// #     }
/// # }
/// impl CostGradient for Sphere {}
/// ```
pub trait CostGradient: CostFunction + Gradient {
    /// Compute cost function value and gradient at `param`.
    fn cost_gradient(&self, param: &[f64]) -> Result<(f64, Vec<f64>), Error> {
        Ok((self.cost(param)?, self.gradient(param)?))
    }
}

/// Problems which can compute the product of their Hessian with an arbitrary
/// vector
pub trait HessianProduct {
    /// Compute `H(param) * v`. The returned vector must have the same length
    /// as `param`.
    fn hessian_product(&self, param: &[f64], v: &[f64]) -> Result<Vec<f64>, Error>;
}

/// Wraps a problem and keeps track of how often its methods have been called.
///
/// The counter triple is the sole observable measure of work performed by a
/// solver; counters are monotone non-decreasing and every user callback
/// dispatch increments the corresponding counter (a fused
/// [`cost_gradient`](`Problem::cost_gradient`) call increments both the cost
/// and the gradient counter).
#[derive(Clone, Debug)]
pub struct Problem<O> {
    /// Problem defined by the user
    pub problem: O,
    /// Number of cost function evaluations
    pub cost_count: u64,
    /// Number of gradient evaluations
    pub gradient_count: u64,
    /// Number of Hessian-vector-product evaluations
    pub hessian_count: u64,
}

impl<O> Problem<O> {
    /// Wraps a problem into an instance of `Problem`.
    pub fn new(problem: O) -> Self {
        Problem {
            problem,
            cost_count: 0,
            gradient_count: 0,
            hessian_count: 0,
        }
    }

    /// Resets all evaluation counters to zero.
    pub fn reset_counts(&mut self) {
        self.cost_count = 0;
        self.gradient_count = 0;
        self.hessian_count = 0;
    }
}

impl<O: CostFunction> Problem<O> {
    /// Compute the cost function value and count the evaluation.
    pub fn cost(&mut self, param: &[f64]) -> Result<f64, Error> {
        self.cost_count += 1;
        self.problem.cost(param)
    }
}

impl<O: Gradient> Problem<O> {
    /// Compute the gradient and count the evaluation.
    pub fn gradient(&mut self, param: &[f64]) -> Result<Vec<f64>, Error> {
        self.gradient_count += 1;
        let gradient = self.problem.gradient(param)?;
        if gradient.len() != param.len() {
            return Err(boxmin_error!(
                DimensionMismatch,
                "Problem: gradient length does not match parameter length"
            ));
        }
        Ok(gradient)
    }
}

impl<O: CostGradient> Problem<O> {
    /// Compute cost function value and gradient; counts one evaluation each.
    pub fn cost_gradient(&mut self, param: &[f64]) -> Result<(f64, Vec<f64>), Error> {
        self.cost_count += 1;
        self.gradient_count += 1;
        let (cost, gradient) = self.problem.cost_gradient(param)?;
        if gradient.len() != param.len() {
            return Err(boxmin_error!(
                DimensionMismatch,
                "Problem: gradient length does not match parameter length"
            ));
        }
        Ok((cost, gradient))
    }
}

impl<O: HessianProduct> Problem<O> {
    /// Compute the Hessian-vector product and count the evaluation.
    pub fn hessian_product(&mut self, param: &[f64], v: &[f64]) -> Result<Vec<f64>, Error> {
        self.hessian_count += 1;
        let hv = self.problem.hessian_product(param, v)?;
        if hv.len() != param.len() {
            return Err(boxmin_error!(
                DimensionMismatch,
                "Problem: Hessian-vector product length does not match parameter length"
            ));
        }
        Ok(hv)
    }
}
