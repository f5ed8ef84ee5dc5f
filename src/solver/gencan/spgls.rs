// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Spectral projected-gradient line search of GENCAN.
//!
//! Used on faces that are likely to change and as the fallback when the
//! truncated-Newton line search stalls. Works in the full space.

use super::{are_close, Gencan};
use crate::core::{math, CostFunction, Error, IterState, Problem};

/// Outcome of a line search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LineSearchStatus {
    /// The sufficient-decrease condition was met
    Success,
    /// Successive trial steps became numerically indistinguishable
    Failed,
    /// A trial value reached the lower cut-off `fmin`
    Unbounded,
}

impl Gencan {
    /// Armijo line search along the spectral projected-gradient direction
    /// `P(x - lambda * g) - x`, with safeguarded quadratic interpolation.
    ///
    /// Commits the accepted point into `state.param`/`state.cost`; the
    /// caller re-evaluates the gradient.
    pub(crate) fn spgls<O: CostFunction>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<LineSearchStatus, Error> {
        let n = self.n;

        let mut alpha = 1.0;

        // xtrial = P(x - lambda g)
        self.xtrial.copy_from_slice(&state.param);
        math::axpy(-self.lambda, &state.grad, &mut self.xtrial);
        math::proj(&self.lower, &self.upper, &mut self.xtrial);

        // d = xtrial - x
        for i in 0..n {
            self.d[i] = self.xtrial[i] - state.param[i];
        }
        let gtd = math::dot(&state.grad, &self.d);

        let mut ftrial = problem.cost(&self.xtrial)?;

        let mut interp = 0;

        while ftrial > state.cost + self.params.gamma * alpha * gtd {
            // the user asked to stop as soon as f falls this low
            if ftrial <= self.params.fmin {
                state.cost = ftrial;
                state.param.copy_from_slice(&self.xtrial);
                return Ok(LineSearchStatus::Unbounded);
            }

            interp += 1;

            if alpha < self.params.sigma1 {
                alpha /= self.params.nint;
            } else {
                // quadratic model
                let atemp = -gtd * alpha * alpha / (2.0 * (ftrial - state.cost - alpha * gtd));

                if !(atemp >= self.params.sigma1 && atemp <= self.params.sigma2 * alpha) {
                    alpha /= self.params.nint;
                } else {
                    alpha = atemp;
                }
            }

            // xtrial = x + alpha d
            self.xtrial.copy_from_slice(&state.param);
            math::axpy(alpha, &self.d, &mut self.xtrial);

            ftrial = problem.cost(&self.xtrial)?;

            if interp > self.params.mininterp
                && are_close(
                    alpha,
                    &self.d,
                    &state.param,
                    self.params.epsrel,
                    self.params.epsabs,
                )
            {
                state.cost = ftrial;
                state.param.copy_from_slice(&self.xtrial);
                return Ok(LineSearchStatus::Failed);
            }
        }

        state.cost = ftrial;
        state.param.copy_from_slice(&self.xtrial);

        Ok(LineSearchStatus::Success)
    }
}
