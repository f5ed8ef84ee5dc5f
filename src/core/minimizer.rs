// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::core::observers::{Observe, ObserverMode, Observers};
use crate::core::{math, BoxConstraint, Error, IterState, Problem, Solver, Status};

/// Drives a solver strategy through its lifecycle.
///
/// A minimizer owns the strategy, the wrapped problem (after
/// [`set`](`Minimizer::set`)) and the shared working state; the caller pulls
/// iterations one at a time:
///
/// ```text
/// allocate  ->  Minimizer::new(strategy)
/// set       ->  minimizer.set(problem, &constraint, &x0, parameters)
/// iterate   ->  while minimizer.is_optimal() == Status::Continue {
///                   minimizer.iterate()?;
///               }
/// free      ->  drop(minimizer)
/// ```
pub struct Minimizer<O, S> {
    /// solver strategy
    solver: S,
    /// wrapped problem; present after `set`
    problem: Option<Problem<O>>,
    /// shared working state
    state: IterState,
    /// Storage for observers
    observers: Observers,
}

impl<O, S: Solver<O>> Minimizer<O, S> {
    /// Allocates a minimizer for the given strategy. All working vectors are
    /// sized from the strategy's dimension; nothing is evaluated yet.
    pub fn new(solver: S) -> Self {
        let n = solver.dimension();
        Minimizer {
            solver,
            problem: None,
            state: IterState::new(n),
            observers: Observers::new(),
        }
    }

    /// Initializes the minimizer with a problem, bounds, a starting point
    /// and a parameter block.
    ///
    /// The starting point is copied and projected onto the box; the first
    /// (f, grad) evaluation happens here. Fails with `DimensionMismatch` if
    /// `x0` or the constraint do not match the solver dimension and with
    /// `InvalidParameter` (leaving the minimizer untouched) if the parameter
    /// block is invalid.
    pub fn set(
        &mut self,
        problem: O,
        constraint: &BoxConstraint,
        x0: &[f64],
        parameters: S::Parameters,
    ) -> Result<(), Error> {
        let n = self.solver.dimension();
        if x0.len() != n {
            return Err(boxmin_error!(
                DimensionMismatch,
                "Minimizer: starting point length not compatible with solver"
            ));
        }
        if constraint.dimension() != n {
            return Err(boxmin_error!(
                DimensionMismatch,
                "Minimizer: constraint length not compatible with solver"
            ));
        }
        self.solver.set_parameters(parameters)?;

        self.state.param.copy_from_slice(x0);
        math::set_zero(&mut self.state.dx);
        self.state.iter = 0;

        let mut problem = Problem::new(problem);
        let result = self.solver.set(&mut problem, constraint, &mut self.state);
        self.state.set_func_counts(&problem);
        self.problem = Some(problem);
        result?;

        if !self.observers.is_empty() {
            self.observers
                .observe_init(S::NAME, &make_kv!("n" => n;))?;
        }
        Ok(())
    }

    /// Re-arms the evaluation counters and `dx` and re-evaluates the
    /// objective and gradient at the current iterate.
    pub fn restart(&mut self) -> Result<(), Error> {
        let problem = self
            .problem
            .as_mut()
            .ok_or_else(boxmin_error_closure!(
                NotInitialized,
                "Minimizer: `restart` called before `set`"
            ))?;
        problem.reset_counts();
        math::set_zero(&mut self.state.dx);
        self.state.iter = 0;
        let result = self.solver.restart(problem, &mut self.state);
        self.state.set_func_counts(problem);
        result
    }

    /// Performs one outer iteration of the strategy.
    pub fn iterate(&mut self) -> Result<Status, Error> {
        let problem = self
            .problem
            .as_mut()
            .ok_or_else(boxmin_error_closure!(
                NotInitialized,
                "Minimizer: `iterate` called before `set`"
            ))?;
        let result = self.solver.iterate(problem, &mut self.state);
        self.state.set_func_counts(problem);
        let (status, kv) = result?;
        self.state.increment_iter();

        if !self.observers.is_empty() {
            let kv = kv.unwrap_or_default();
            self.observers.observe_iter(&self.state, &kv)?;
        }
        Ok(status)
    }

    /// Optimality check of the last visited point.
    ///
    /// Returns [`Status::Success`] when the strategy's optimality predicate
    /// holds and [`Status::Continue`] otherwise (also before `set`).
    pub fn is_optimal(&self) -> Status {
        if self.problem.is_none() {
            return Status::Continue;
        }
        self.solver.is_optimal(&self.state)
    }

    /// Validates and installs a new parameter block.
    ///
    /// On `InvalidParameter` the previous block stays in place.
    pub fn set_parameters(&mut self, parameters: S::Parameters) -> Result<(), Error> {
        self.solver.set_parameters(parameters)
    }

    /// Returns the parameter block currently in use.
    pub fn parameters(&self) -> &S::Parameters {
        self.solver.parameters()
    }

    /// Attaches an observer.
    pub fn add_observer<OBS: Observe + 'static>(
        &mut self,
        observer: OBS,
        mode: ObserverMode,
    ) -> &mut Self {
        self.observers.push(observer, mode);
        self
    }

    /// Name of the solver strategy.
    pub fn name(&self) -> &'static str {
        S::NAME
    }

    /// Dimension of the problem space.
    pub fn dimension(&self) -> usize {
        self.solver.dimension()
    }

    /// Returns the full working state.
    pub fn state(&self) -> &IterState {
        &self.state
    }

    /// Returns the current iterate.
    pub fn param(&self) -> &[f64] {
        &self.state.param
    }

    /// Returns the last full-space step.
    pub fn dx(&self) -> &[f64] {
        &self.state.dx
    }

    /// Returns the gradient at the current iterate.
    pub fn gradient(&self) -> &[f64] {
        &self.state.grad
    }

    /// Returns the current cost function value.
    pub fn cost(&self) -> f64 {
        self.state.cost
    }

    /// Returns the strategy-defined optimality proxy.
    pub fn size(&self) -> f64 {
        self.state.size
    }

    /// Number of cost function evaluations so far.
    pub fn cost_count(&self) -> u64 {
        self.state.cost_count
    }

    /// Number of gradient evaluations so far.
    pub fn gradient_count(&self) -> u64 {
        self.state.gradient_count
    }

    /// Number of Hessian-vector-product evaluations so far.
    pub fn hessian_count(&self) -> u64 {
        self.state.hessian_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::DiagQuadratic;
    use crate::core::BoxminError;
    use crate::solver::spg::{SpectralProjectedGradient, SpgParameters};

    #[test]
    fn test_iterate_before_set_fails() {
        let mut minimizer: Minimizer<DiagQuadratic, _> =
            Minimizer::new(SpectralProjectedGradient::new(4));
        assert_eq!(minimizer.is_optimal(), Status::Continue);
        assert_error!(
            minimizer.iterate(),
            BoxminError,
            "Not initialized: \"Minimizer: `iterate` called before `set`\""
        );
        assert_error!(
            minimizer.restart(),
            BoxminError,
            "Not initialized: \"Minimizer: `restart` called before `set`\""
        );
    }

    #[test]
    fn test_set_rejects_bad_lengths() {
        let mut minimizer = Minimizer::new(SpectralProjectedGradient::new(4));
        let constraint = BoxConstraint::new(vec![-1.0; 4], vec![1.0; 4]).unwrap();
        assert_error!(
            minimizer.set(
                DiagQuadratic::new(4),
                &constraint,
                &[0.0; 3],
                SpgParameters::default()
            ),
            BoxminError,
            "Dimension mismatch: \"Minimizer: starting point length not compatible with solver\""
        );
        let short = BoxConstraint::new(vec![-1.0; 3], vec![1.0; 3]).unwrap();
        assert_error!(
            minimizer.set(
                DiagQuadratic::new(4),
                &short,
                &[0.0; 4],
                SpgParameters::default()
            ),
            BoxminError,
            "Dimension mismatch: \"Minimizer: constraint length not compatible with solver\""
        );
    }

    #[test]
    fn test_invalid_parameters_keep_previous_block() {
        let n = 4;
        let mut minimizer = Minimizer::new(SpectralProjectedGradient::new(n));
        let constraint = BoxConstraint::new(vec![-1.0; 4], vec![1.0; 4]).unwrap();
        minimizer
            .set(
                DiagQuadratic::new(n),
                &constraint,
                &[0.5; 4],
                SpgParameters::default(),
            )
            .unwrap();

        let mut bad = SpgParameters::default();
        bad.m = 0;
        assert!(minimizer.set_parameters(bad).is_err());
        // the previous (default) block is still in place
        assert_eq!(minimizer.parameters().m, 10);
    }

    #[test]
    fn test_restart_rearms_counters_and_dx() {
        let n = 4;
        let mut minimizer = Minimizer::new(SpectralProjectedGradient::new(n));
        let constraint = BoxConstraint::new(vec![-1.0; 4], vec![1.0; 4]).unwrap();
        minimizer
            .set(
                DiagQuadratic::new(n),
                &constraint,
                &[0.9; 4],
                SpgParameters::default(),
            )
            .unwrap();
        for _ in 0..3 {
            minimizer.iterate().unwrap();
        }
        assert!(minimizer.cost_count() > 1);
        assert!(minimizer.dx().iter().any(|&di| di != 0.0));

        minimizer.restart().unwrap();
        // counters were re-armed, then the mandatory re-evaluation ticked them
        assert_eq!(minimizer.cost_count(), 1);
        assert_eq!(minimizer.gradient_count(), 1);
        assert_eq!(minimizer.hessian_count(), 0);
        assert!(minimizer.dx().iter().all(|&di| di == 0.0));
        assert_eq!(minimizer.state().get_iter(), 0);
    }
}
