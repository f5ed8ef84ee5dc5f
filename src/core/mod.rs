// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! boxmin core
//!
//! The minimizer framework: problem traits, the box constraint, the shared
//! iteration state, the solver strategy interface, error handling and
//! observers.

/// Macros
#[macro_use]
pub mod macros;
/// Box constraints
mod constraint;
/// Error handling
mod errors;
/// Key value datastructure
mod kv;
/// Vector kernels
pub mod math;
/// The minimizer lifecycle driver
mod minimizer;
/// Observers
pub mod observers;
/// Traits for defining and handling optimization problems
mod problem;
/// `Solver` trait
mod solver;
/// Iteration state
mod state;
/// Definition of iteration outcomes
mod termination;

/// Shared test problems
#[cfg(test)]
pub(crate) mod test_utils;

pub use anyhow::Error;
pub use constraint::BoxConstraint;
pub use errors::{code, BoxminError};
pub use kv::KV;
pub use minimizer::Minimizer;
pub use observers::*;
pub use problem::{CostFunction, CostGradient, Gradient, HessianProduct, Problem};
pub use solver::{Parameters, Solver};
pub use state::IterState;
pub use termination::Status;
