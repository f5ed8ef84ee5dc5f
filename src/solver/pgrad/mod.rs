// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! * [Projected gradient method](struct.ProjectedGradient.html)
//!
//! # References:
//!
//! \[0\] C. T. Kelley (1999). Iterative Methods for Optimization. SIAM.

use crate::core::{
    math, BoxConstraint, CostGradient, Error, IterState, Parameters, Problem, Solver, Status, KV,
};
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Parameters of the projected gradient method.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct PgradParameters {
    /// Lower cut-off for the objective; reaching it terminates with `UnboundedF` (default `-1e99`)
    pub fmin: f64,
    /// Tolerance on the sup-norm of the projected gradient (default `1e-4`)
    pub tol: f64,
    /// Armijo sufficient-decrease coefficient (default `1e-4`)
    pub alpha: f64,
    /// Lower safeguard of the quadratic interpolation step (default `0.1`)
    pub sigma1: f64,
    /// Upper safeguard of the quadratic interpolation step (default `0.9`)
    pub sigma2: f64,
}

impl Default for PgradParameters {
    fn default() -> Self {
        PgradParameters {
            fmin: -1.0e99,
            tol: 1.0e-4,
            alpha: 1.0e-4,
            sigma1: 0.1,
            sigma2: 0.9,
        }
    }
}

impl Parameters for PgradParameters {
    fn validate(&self) -> Result<(), Error> {
        if self.tol < 0.0
            || self.alpha <= 0.0
            || self.sigma1 <= 0.0
            || self.sigma2 <= self.sigma1
            || self.sigma2 >= 1.0
        {
            return Err(boxmin_error!(
                InvalidParameter,
                "ProjectedGradient: invalid parameters"
            ));
        }
        Ok(())
    }
}

/// Projected gradient method with Armijo backtracking.
///
/// Each iteration backtracks along the projected steepest-descent path
/// `P(x - t * grad f(x))` until the sufficient-decrease condition
/// `f(trial) <= f(x) - (alpha / t) * ||trial - x||^2` holds, with a
/// safeguarded quadratic interpolation choosing the next trial step. The
/// cost sequence is strictly monotone.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ProjectedGradient {
    params: PgradParameters,
    n: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
    xx: Vec<f64>,
}

impl ProjectedGradient {
    /// Allocates a projected gradient solver for an `n`-dimensional problem.
    pub fn new(n: usize) -> Self {
        ProjectedGradient {
            params: PgradParameters::default(),
            n,
            lower: vec![0.0; n],
            upper: vec![0.0; n],
            xx: vec![0.0; n],
        }
    }

    /// `|| P(x - g) - x ||_inf`, the first-order optimality proxy.
    fn projected_gradient_size(&mut self, x: &[f64], g: &[f64]) -> f64 {
        self.xx.copy_from_slice(x);
        math::axpy(-1.0, g, &mut self.xx);
        math::proj(&self.lower, &self.upper, &mut self.xx);
        math::dist_inf(&self.xx, x)
    }
}

impl<O: CostGradient> Solver<O> for ProjectedGradient {
    const NAME: &'static str = "Projected gradient";

    type Parameters = PgradParameters;

    fn dimension(&self) -> usize {
        self.n
    }

    fn parameters(&self) -> &PgradParameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut PgradParameters {
        &mut self.params
    }

    fn set(
        &mut self,
        problem: &mut Problem<O>,
        constraint: &BoxConstraint,
        state: &mut IterState,
    ) -> Result<(), Error> {
        self.lower.copy_from_slice(constraint.lower());
        self.upper.copy_from_slice(constraint.upper());
        self.restart(problem, state)
    }

    fn restart(&mut self, problem: &mut Problem<O>, state: &mut IterState) -> Result<(), Error> {
        math::proj(&self.lower, &self.upper, &mut state.param);
        let (cost, grad) = problem.cost_gradient(&state.param)?;
        state.cost = cost;
        state.grad = grad;
        state.size = self.projected_gradient_size(&state.param, &state.grad);
        Ok(())
    }

    fn iterate(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<(Status, Option<KV>), Error> {
        let fx = state.cost;
        let mut status = Status::Success;
        let mut tnew = 1.0;

        loop {
            let t = tnew;

            // xx = P(x - t g)
            self.xx.copy_from_slice(&state.param);
            math::axpy(-t, &state.grad, &mut self.xx);
            math::proj(&self.lower, &self.upper, &mut self.xx);
            let fxx = problem.cost(&self.xx)?;

            // dx = xx - x
            for i in 0..self.n {
                state.dx[i] = self.xx[i] - state.param[i];
            }
            let dif2 = {
                let d = math::norm2(&state.dx);
                d * d
            };
            let gtd = math::dot(&state.grad, &state.dx);

            // safeguarded quadratic interpolation for the next trial
            let t_interp = -t * t * gtd / (2.0 * (fxx - state.cost - gtd));
            tnew = (self.params.sigma1 * t).max((self.params.sigma2 * t).min(t_interp));

            if fxx <= self.params.fmin {
                state.param.copy_from_slice(&self.xx);
                state.cost = fxx;
                status = Status::UnboundedF;
                break;
            }

            // sufficient decrease (Armijo)
            if fxx <= fx - (self.params.alpha / t) * dif2 {
                state.param.copy_from_slice(&self.xx);
                state.cost = fxx;
                break;
            }
        }

        state.grad = problem.gradient(&state.param)?;
        let size = self.projected_gradient_size(&state.param, &state.grad);
        state.size = size;

        Ok((status, None))
    }

    fn is_optimal(&self, state: &IterState) -> Status {
        if state.size > self.params.tol && state.cost > self.params.fmin {
            Status::Continue
        } else {
            Status::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::DiagQuadratic;
    use crate::core::{BoxminError, Minimizer};
    use crate::test_trait_impl;
    use approx::assert_relative_eq;

    test_trait_impl!(pgrad, ProjectedGradient);

    #[test]
    fn test_default_parameters() {
        let p = PgradParameters::default();
        assert_eq!(p.fmin.to_ne_bytes(), (-1.0e99f64).to_ne_bytes());
        assert_eq!(p.tol.to_ne_bytes(), 1.0e-4f64.to_ne_bytes());
        assert_eq!(p.alpha.to_ne_bytes(), 1.0e-4f64.to_ne_bytes());
        assert_eq!(p.sigma1.to_ne_bytes(), 0.1f64.to_ne_bytes());
        assert_eq!(p.sigma2.to_ne_bytes(), 0.9f64.to_ne_bytes());
    }

    #[test]
    fn test_parameter_validation() {
        let mut p = PgradParameters::default();
        p.tol = -1.0;
        assert_error!(
            p.validate(),
            BoxminError,
            "Invalid parameter: \"ProjectedGradient: invalid parameters\""
        );
        let mut p = PgradParameters::default();
        p.sigma2 = 1.0;
        assert!(p.validate().is_err());
        let mut p = PgradParameters::default();
        p.sigma2 = p.sigma1;
        assert!(p.validate().is_err());
        assert!(PgradParameters::default().validate().is_ok());
    }

    #[test]
    fn test_diag_quadratic_monotone() {
        let n = 100;
        let problem = DiagQuadratic::new(n);
        let solution = problem.boxed_solution();
        let constraint = BoxConstraint::new(vec![-3.0; 100], vec![3.0; 100]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();

        let mut minimizer = Minimizer::new(ProjectedGradient::new(n));
        minimizer
            .set(problem, &constraint, &x0, PgradParameters::default())
            .unwrap();

        let mut costs = vec![minimizer.cost()];
        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 5000 {
            let status = minimizer.iterate().unwrap();
            assert!(matches!(status, Status::Success | Status::UnboundedF));
            assert!(constraint.is_feasible(minimizer.param()));
            costs.push(minimizer.cost());
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);

        // strictly monotone cost sequence
        for w in costs.windows(2) {
            assert!(w[1] < w[0]);
        }

        for i in 0..n {
            assert!((minimizer.param()[i] - solution[i]).abs() < 1e-3);
        }
        // Hessian-vector products are never used by this strategy
        assert_eq!(minimizer.hessian_count(), 0);
    }

    #[test]
    fn test_infeasible_start_is_clamped_at_set() {
        let n = 10;
        let constraint = BoxConstraint::new(vec![-3.0; 10], vec![3.0; 10]).unwrap();
        let mut minimizer = Minimizer::new(ProjectedGradient::new(n));
        minimizer
            .set(
                DiagQuadratic::new(n),
                &constraint,
                &[100.0; 10],
                PgradParameters::default(),
            )
            .unwrap();
        assert!(constraint.is_feasible(minimizer.param()));
        for &xi in minimizer.param() {
            assert_relative_eq!(xi, 3.0, epsilon = f64::EPSILON);
        }
        assert_eq!(minimizer.cost_count(), 1);
        assert_eq!(minimizer.gradient_count(), 1);
    }

    #[test]
    fn test_fmin_cutoff() {
        // interior minimum with value zero, so the trajectory must cross
        // the cut-off
        let n = 10;
        let constraint = BoxConstraint::new(vec![-3.0; 10], vec![3.0; 10]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();
        let mut params = PgradParameters::default();
        params.fmin = 1.0;

        let mut minimizer = Minimizer::new(ProjectedGradient::new(n));
        minimizer
            .set(DiagQuadratic::new(n), &constraint, &x0, params)
            .unwrap();

        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 5000 {
            minimizer.iterate().unwrap();
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);
        assert!(minimizer.cost() <= 1.0);
    }
}
