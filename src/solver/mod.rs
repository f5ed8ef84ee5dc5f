// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Solver strategies

/// GENCAN active-set truncated-Newton method
pub mod gencan;
/// Projected gradient with Armijo backtracking
pub mod pgrad;
/// Spectral projected gradient with non-monotone line search
pub mod spg;
