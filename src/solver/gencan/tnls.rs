// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Truncated-Newton line search of GENCAN.
//!
//! Works in the reduced space along the direction produced by the inner
//! conjugate-gradient solver. Accepts the unit step when the Armijo and
//! directional-derivative conditions hold; otherwise extrapolates beyond it
//! (projecting trials that leave the box) or interpolates with a safeguarded
//! quadratic model.

use super::{are_close, reduced, Gencan};
use crate::core::{math, CostFunction, Error, Gradient, IterState, Problem};

/// Outcome of the truncated-Newton line search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TnlsStatus {
    /// A point was accepted (possibly after hitting the extrapolation cap)
    Success,
    /// The step became too small; the outer iteration falls back to a
    /// spectral projected-gradient step
    Failed,
}

impl Gencan {
    /// Line search along `self.d` from the reduced-space iterate.
    ///
    /// `state.param`, `state.grad`, `self.lower` and `self.upper` must be in
    /// shrunk order; `self.tnls_amax` holds the maximum feasible step. On
    /// success `state.param[..nind]`, `state.cost` and `state.grad` are
    /// updated; on failure the iterate is left untouched.
    pub(crate) fn tnls<O: CostFunction + Gradient>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<TnlsStatus, Error> {
        let nind = self.nind;

        // directional derivative <g, d>
        let gtd = math::dot(&state.grad[..nind], &self.d[..nind]);

        // first trial
        let alpha = 1.0f64.min(self.tnls_amax);

        self.xtrial.copy_from_slice(&state.param);
        for i in 0..nind {
            self.xtrial[i] += alpha * self.d[i];
        }
        let fplus = {
            let ind = &self.ind[..nind];
            reduced::calc_f(problem, ind, &mut self.xtrial, &state.param)?
        };

        if self.tnls_amax > 1.0 {
            // x + d belongs to the interior of the feasible set
            if fplus <= state.cost + self.params.gamma * alpha * gtd {
                // Armijo holds at the unit step
                {
                    let ind = &self.ind[..nind];
                    reduced::calc_g(
                        problem,
                        ind,
                        &mut self.xtrial,
                        &state.param,
                        &mut state.grad,
                    )?;
                }
                let gptd = math::dot(&state.grad[..nind], &self.d[..nind]);

                if gptd >= self.params.beta * gtd {
                    // the directional derivative flattened enough
                    state.cost = fplus;
                    state.param[..nind].copy_from_slice(&self.xtrial[..nind]);
                    return Ok(TnlsStatus::Success);
                }
                self.tnls_extrapolation(problem, state, alpha, fplus)
            } else {
                self.tnls_interpolation(problem, state, alpha, fplus, gtd)
            }
        } else {
            // x + d leaves the feasible set
            if fplus < state.cost {
                self.tnls_extrapolation(problem, state, alpha, fplus)
            } else {
                self.tnls_interpolation(problem, state, alpha, fplus, gtd)
            }
        }
    }

    /// Extends the step while the objective keeps decreasing, at most
    /// `maxextrap` times; trials past the maximum feasible step are
    /// projected onto the box.
    fn tnls_extrapolation<O: CostFunction + Gradient>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
        mut alpha: f64,
        mut fplus: f64,
    ) -> Result<TnlsStatus, Error> {
        let nind = self.nind;
        let mut extrap = 0usize;

        loop {
            extrap += 1;

            if extrap > self.params.maxextrap {
                // cap reached; the best point found so far stands
                state.cost = fplus;
                state.param[..nind].copy_from_slice(&self.xtrial[..nind]);
                let ind = &self.ind[..nind];
                reduced::calc_g(
                    problem,
                    ind,
                    &mut self.xtrial,
                    &state.param,
                    &mut state.grad,
                )?;
                return Ok(TnlsStatus::Success);
            }

            // choose the new step
            let atemp = if alpha < self.tnls_amax && self.tnls_amax < self.params.next * alpha {
                self.tnls_amax
            } else {
                self.params.next * alpha
            };

            // xtemp = x + atemp d, projected once it leaves the box
            self.tnls_xtemp.copy_from_slice(&state.param);
            for i in 0..nind {
                self.tnls_xtemp[i] += atemp * self.d[i];
            }
            if atemp > self.tnls_amax {
                math::proj(
                    &self.lower[..nind],
                    &self.upper[..nind],
                    &mut self.tnls_xtemp[..nind],
                );
            }

            // once past the feasible segment, projected trials may collapse
            // onto the previous point
            if alpha > self.tnls_amax {
                let same = (0..nind).all(|i| {
                    (self.tnls_xtemp[i] - self.xtrial[i]).abs()
                        <= (self.params.epsrel * self.xtrial[i].abs()).max(self.params.epsabs)
                });
                if same {
                    state.cost = fplus;
                    state.param[..nind].copy_from_slice(&self.xtrial[..nind]);
                    let ind = &self.ind[..nind];
                    reduced::calc_g(
                        problem,
                        ind,
                        &mut self.xtrial,
                        &state.param,
                        &mut state.grad,
                    )?;
                    return Ok(TnlsStatus::Success);
                }
            }

            let ftemp = {
                let ind = &self.ind[..nind];
                reduced::calc_f(problem, ind, &mut self.tnls_xtemp, &state.param)?
            };

            if ftemp < fplus {
                // keep extending
                alpha = atemp;
                fplus = ftemp;
                self.xtrial[..nind].copy_from_slice(&self.tnls_xtemp[..nind]);
            } else {
                // no further decrease; settle for the previous trial
                state.cost = fplus;
                state.param[..nind].copy_from_slice(&self.xtrial[..nind]);
                let ind = &self.ind[..nind];
                reduced::calc_g(
                    problem,
                    ind,
                    &mut self.xtrial,
                    &state.param,
                    &mut state.grad,
                )?;
                return Ok(TnlsStatus::Success);
            }
        }
    }

    /// Shrinks the step with a safeguarded quadratic model until the Armijo
    /// condition holds; reports failure once the trials become numerically
    /// indistinguishable after `mininterp` interpolations.
    fn tnls_interpolation<O: CostFunction + Gradient>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
        mut alpha: f64,
        mut fplus: f64,
        gtd: f64,
    ) -> Result<TnlsStatus, Error> {
        let nind = self.nind;
        let mut interp = 0usize;

        loop {
            interp += 1;

            if fplus <= state.cost + self.params.gamma * alpha * gtd {
                state.cost = fplus;
                state.param[..nind].copy_from_slice(&self.xtrial[..nind]);
                let ind = &self.ind[..nind];
                reduced::calc_g(
                    problem,
                    ind,
                    &mut self.xtrial,
                    &state.param,
                    &mut state.grad,
                )?;
                return Ok(TnlsStatus::Success);
            }

            // safeguarded quadratic step
            if alpha < self.params.sigma1 {
                alpha /= self.params.nint;
            } else {
                let atemp = -gtd * alpha * alpha / (2.0 * (fplus - state.cost - alpha * gtd));

                if !(atemp >= self.params.sigma1 && atemp <= self.params.sigma2 * alpha) {
                    alpha /= self.params.nint;
                } else {
                    alpha = atemp;
                }
            }

            // xtrial = x + alpha d
            self.xtrial.copy_from_slice(&state.param);
            for i in 0..nind {
                self.xtrial[i] += alpha * self.d[i];
            }
            fplus = {
                let ind = &self.ind[..nind];
                reduced::calc_f(problem, ind, &mut self.xtrial, &state.param)?
            };

            if interp > self.params.mininterp
                && are_close(
                    alpha,
                    &self.d[..nind],
                    &state.param[..nind],
                    self.params.epsrel,
                    self.params.epsabs,
                )
            {
                return Ok(TnlsStatus::Failed);
            }
        }
    }
}
