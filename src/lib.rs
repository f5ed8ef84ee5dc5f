// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! boxmin is a library for box-constrained nonlinear minimization written
//! entirely in Rust.
//!
//! Given a smooth objective `f` and simple bounds `L <= x <= U`, it finds a
//! local minimizer satisfying the first-order optimality condition on the
//! box. Three interchangeable solver strategies share one interface:
//!
//! - [Projected gradient](`crate::solver::pgrad::ProjectedGradient`) with
//!   Armijo backtracking,
//! - [Spectral projected gradient](`crate::solver::spg::SpectralProjectedGradient`)
//!   (Barzilai-Borwein step with non-monotone line search),
//! - [GENCAN](`crate::solver::gencan::Gencan`), an active-set method
//!   combining spectral projected-gradient steps with truncated-Newton
//!   conjugate-gradient steps on the closure of the current face, inside a
//!   trust region.
//!
//! A problem supplies its objective value, gradient and (for GENCAN)
//! Hessian-vector products through the traits in [`core`]; the
//! [`Minimizer`](`crate::core::Minimizer`) tracks feasibility, the last
//! step, the optimality proxy `size` and the evaluation counters.
//! Observers allow one to track the progress of the iterations, either with
//! the provided terminal logger or by implementing
//! [`Observe`](`crate::core::observers::Observe`).
//!
//! # Example
//!
//! ```
//! use boxmin::core::{
//!     BoxConstraint, CostFunction, CostGradient, Error, Gradient, HessianProduct, Minimizer,
//!     Status,
//! };
//! use boxmin::solver::gencan::{Gencan, GencanParameters};
//!
//! struct Paraboloid {}
//!
//! impl CostFunction for Paraboloid {
//!     fn cost(&self, x: &[f64]) -> Result<f64, Error> {
//!         Ok(x.iter().map(|xi| (xi - 2.0) * (xi - 2.0)).sum())
//!     }
//! }
//!
//! impl Gradient for Paraboloid {
//!     fn gradient(&self, x: &[f64]) -> Result<Vec<f64>, Error> {
//!         Ok(x.iter().map(|xi| 2.0 * (xi - 2.0)).collect())
//!     }
//! }
//!
//! impl CostGradient for Paraboloid {}
//!
//! impl HessianProduct for Paraboloid {
//!     fn hessian_product(&self, _x: &[f64], v: &[f64]) -> Result<Vec<f64>, Error> {
//!         Ok(v.iter().map(|vi| 2.0 * vi).collect())
//!     }
//! }
//!
//! fn run() -> Result<(), Error> {
//!     let constraint = BoxConstraint::new(vec![0.0, 0.0], vec![1.0, 3.0])?;
//!     let mut minimizer = Minimizer::new(Gencan::new(2));
//!     minimizer.set(
//!         Paraboloid {},
//!         &constraint,
//!         &[0.5, 0.5],
//!         GencanParameters::default(),
//!     )?;
//!
//!     let mut iters = 0;
//!     while minimizer.is_optimal() == Status::Continue && iters < 100 {
//!         minimizer.iterate()?;
//!         iters += 1;
//!     }
//!
//!     // the minimum of the box-constrained problem is at (1, 2)
//!     assert!((minimizer.param()[0] - 1.0).abs() < 1e-4);
//!     assert!((minimizer.param()[1] - 2.0).abs() < 1e-4);
//!     Ok(())
//! }
//! # run().unwrap();
//! ```

#![warn(missing_docs)]
#![allow(unused_attributes)]

#[macro_use]
pub mod core;

/// Solvers
pub mod solver;
