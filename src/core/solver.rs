// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::core::{BoxConstraint, Error, IterState, Problem, Status, KV};

/// A parameter block of a solver strategy.
///
/// `Default` must produce the documented default values; `validate` is
/// called before a block is accepted and returns an `InvalidParameter` error
/// for out-of-range values.
pub trait Parameters: Clone + Default {
    /// Checks the parameter block for consistency.
    fn validate(&self) -> Result<(), Error>;
}

/// Solver strategy interface
///
/// Every solver strategy implements this trait; a
/// [`Minimizer`](`crate::core::Minimizer`) drives it through the
/// `set` / `restart` / `iterate` / `is_optimal` lifecycle. Scratch space is
/// sized once at construction; none of the lifecycle methods allocate
/// per-iteration working vectors.
pub trait Solver<O> {
    /// Name of the solver strategy
    const NAME: &'static str = "UNDEFINED";

    /// Strategy-specific parameter block
    type Parameters: Parameters;

    /// Dimension of the problem space this solver was allocated for.
    fn dimension(&self) -> usize;

    /// Returns the parameter block currently in use.
    fn parameters(&self) -> &Self::Parameters;

    /// Mutable access to the parameter block; used by the provided
    /// [`set_parameters`](`Solver::set_parameters`).
    fn parameters_mut(&mut self) -> &mut Self::Parameters;

    /// Validates and installs a new parameter block.
    ///
    /// On failure the previous block stays in place.
    fn set_parameters(&mut self, parameters: Self::Parameters) -> Result<(), Error> {
        parameters.validate()?;
        *self.parameters_mut() = parameters;
        Ok(())
    }

    /// Initializes the solver at the starting point stored in `state`.
    ///
    /// Copies the bounds, makes the iterate feasible and performs the first
    /// objective/gradient evaluation.
    fn set(
        &mut self,
        problem: &mut Problem<O>,
        constraint: &BoxConstraint,
        state: &mut IterState,
    ) -> Result<(), Error>;

    /// Re-arms the solver at the current iterate, re-evaluating the
    /// objective and its gradient.
    fn restart(&mut self, problem: &mut Problem<O>, state: &mut IterState) -> Result<(), Error>;

    /// Performs one outer iteration.
    fn iterate(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<(Status, Option<KV>), Error>;

    /// Optimality check of the last visited point; returns
    /// [`Status::Success`] or [`Status::Continue`].
    fn is_optimal(&self, state: &IterState) -> Status;
}
