// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::core::Problem;
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// The observable state of a minimizer.
///
/// Solvers read and update the current iterate, its gradient and cost, the
/// last full-space step `dx` and the strategy-defined optimality proxy
/// `size`. The evaluation counters are mirrored from the
/// [`Problem`](`crate::core::Problem`) wrapper after every operation so that
/// observers see a consistent snapshot.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct IterState {
    /// Current parameter vector (always feasible after `set`)
    pub param: Vec<f64>,
    /// Gradient of the objective at `param`
    pub grad: Vec<f64>,
    /// Last full-space step `x_k - x_{k-1}`; zero right after `set` or `restart`
    pub dx: Vec<f64>,
    /// Current cost function value
    pub cost: f64,
    /// Strategy-defined optimality proxy (projected-gradient norm)
    pub size: f64,
    /// Iteration counter
    pub iter: u64,
    /// Number of cost function evaluations
    pub cost_count: u64,
    /// Number of gradient evaluations
    pub gradient_count: u64,
    /// Number of Hessian-vector-product evaluations
    pub hessian_count: u64,
}

impl IterState {
    /// Creates a state for an `n`-dimensional problem. Cost and size start at
    /// infinity; `set` gives them their first real values.
    pub fn new(n: usize) -> Self {
        IterState {
            param: vec![0.0; n],
            grad: vec![0.0; n],
            dx: vec![0.0; n],
            cost: f64::INFINITY,
            size: f64::INFINITY,
            iter: 0,
            cost_count: 0,
            gradient_count: 0,
            hessian_count: 0,
        }
    }

    /// Returns the current parameter vector.
    pub fn get_param(&self) -> &[f64] {
        &self.param
    }

    /// Returns the gradient at the current parameter vector.
    pub fn get_grad(&self) -> &[f64] {
        &self.grad
    }

    /// Returns the last full-space step.
    pub fn get_dx(&self) -> &[f64] {
        &self.dx
    }

    /// Returns the current cost function value.
    pub fn get_cost(&self) -> f64 {
        self.cost
    }

    /// Returns the strategy-defined optimality proxy.
    pub fn get_size(&self) -> f64 {
        self.size
    }

    /// Returns the current iteration number.
    pub fn get_iter(&self) -> u64 {
        self.iter
    }

    pub(crate) fn increment_iter(&mut self) {
        self.iter += 1;
    }

    pub(crate) fn set_func_counts<O>(&mut self, problem: &Problem<O>) {
        self.cost_count = problem.cost_count;
        self.gradient_count = problem.gradient_count;
        self.hessian_count = problem.hessian_count;
    }
}
