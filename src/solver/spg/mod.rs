// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! * [Spectral projected gradient method](struct.SpectralProjectedGradient.html)
//!
//! # References:
//!
//! \[0\] E. G. Birgin, J. M. Martinez and M. Raydan (2000). Nonmonotone
//! spectral projected gradient methods on convex sets. SIAM Journal on
//! Optimization 10(4), 1196-1211.

use crate::core::{
    math, BoxConstraint, CostGradient, Error, IterState, Parameters, Problem, Solver, Status, KV,
};
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Parameters of the spectral projected gradient method.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SpgParameters {
    /// Lower cut-off for the objective; reaching it terminates with `UnboundedF` (default `-1e99`)
    pub fmin: f64,
    /// Tolerance on the sup-norm of the projected gradient (default `1e-4`)
    pub tol: f64,
    /// Size of the non-monotone memory (default `10`).
    ///
    /// The ring buffer is allocated at `set`; replacing the parameter block
    /// between iterations keeps the current ring until the next `set`.
    pub m: usize,
    /// Lower clamp of the spectral step (default `1e-30`)
    pub alphamin: f64,
    /// Upper clamp of the spectral step (default `1e30`)
    pub alphamax: f64,
    /// Armijo sufficient-decrease coefficient (default `1e-4`)
    pub gamma: f64,
    /// Lower safeguard of the quadratic interpolation step (default `0.1`)
    pub sigma1: f64,
    /// Upper safeguard of the quadratic interpolation step (default `0.9`)
    pub sigma2: f64,
}

impl Default for SpgParameters {
    fn default() -> Self {
        SpgParameters {
            fmin: -1.0e99,
            tol: 1.0e-4,
            m: 10,
            alphamin: 1.0e-30,
            alphamax: 1.0e30,
            gamma: 1.0e-4,
            sigma1: 0.1,
            sigma2: 0.9,
        }
    }
}

impl Parameters for SpgParameters {
    fn validate(&self) -> Result<(), Error> {
        if self.tol < 0.0
            || self.m < 1
            || self.alphamin <= 0.0
            || self.alphamax < self.alphamin
            || self.gamma <= 0.0
            || self.gamma >= 1.0
            || self.sigma1 <= 0.0
            || self.sigma2 <= self.sigma1
            || self.sigma2 >= 1.0
        {
            return Err(boxmin_error!(
                InvalidParameter,
                "SpectralProjectedGradient: invalid parameters"
            ));
        }
        Ok(())
    }
}

/// Spectral projected gradient method with non-monotone line search.
///
/// The search direction is `P(x - alpha * grad) - x` with the
/// Barzilai-Borwein spectral step `alpha`; a trial is accepted once it lies
/// below the maximum of the last `m` objective values plus the Armijo term,
/// which permits non-monotone cost sequences.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SpectralProjectedGradient {
    params: SpgParameters,
    n: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
    xx: Vec<f64>,
    d: Vec<f64>,
    s: Vec<f64>,
    y: Vec<f64>,
    /// spectral steplength
    alpha: f64,
    /// ring buffer of past objective values
    fring: Vec<f64>,
    /// number of filled ring slots
    m: usize,
    /// index of the most recent ring entry
    tail: usize,
}

impl SpectralProjectedGradient {
    /// Allocates a spectral projected gradient solver for an `n`-dimensional
    /// problem. The non-monotone ring is sized at `set`, once the parameter
    /// block is known.
    pub fn new(n: usize) -> Self {
        SpectralProjectedGradient {
            params: SpgParameters::default(),
            n,
            lower: vec![0.0; n],
            upper: vec![0.0; n],
            xx: vec![0.0; n],
            d: vec![0.0; n],
            s: vec![0.0; n],
            y: vec![0.0; n],
            alpha: 1.0,
            fring: Vec::new(),
            m: 0,
            tail: 0,
        }
    }

    /// `|| P(x - g) - x ||_inf` via the `d` scratch vector.
    fn projected_gradient_size(&mut self, x: &[f64], g: &[f64]) -> f64 {
        self.d.copy_from_slice(x);
        math::axpy(-1.0, g, &mut self.d);
        math::proj(&self.lower, &self.upper, &mut self.d);
        math::dist_inf(&self.d, x)
    }

    fn prepare(&mut self, cost: f64, gsupn: f64) {
        // a vanishing gradient means the current point is already
        // stationary; any positive step will do
        self.alpha = if gsupn > 0.0 { 1.0 / gsupn } else { 1.0 };
        self.m = 1;
        self.tail = 0;
        self.fring[0] = cost;
    }
}

impl<O: CostGradient> Solver<O> for SpectralProjectedGradient {
    const NAME: &'static str = "Spectral projected gradient";

    type Parameters = SpgParameters;

    fn dimension(&self) -> usize {
        self.n
    }

    fn parameters(&self) -> &SpgParameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut SpgParameters {
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
        self.fring = vec![0.0; self.params.m];
        self.restart(problem, state)
    }

    fn restart(&mut self, problem: &mut Problem<O>, state: &mut IterState) -> Result<(), Error> {
        math::proj(&self.lower, &self.upper, &mut state.param);
        let (cost, grad) = problem.cost_gradient(&state.param)?;
        state.cost = cost;
        state.grad = grad;
        state.size = self.projected_gradient_size(&state.param, &state.grad);
        let gsupn = math::norm_inf(&state.grad);
        self.prepare(cost, gsupn);
        Ok(())
    }

    fn iterate(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<(Status, Option<KV>), Error> {
        // save the previous gradient
        self.y.copy_from_slice(&state.grad);

        // d = P(x - alpha g) - x
        self.d.copy_from_slice(&state.param);
        math::axpy(-self.alpha, &state.grad, &mut self.d);
        math::proj(&self.lower, &self.upper, &mut self.d);
        for i in 0..self.n {
            self.d[i] -= state.param[i];
        }
        let dtg = math::dot(&self.d, &state.grad);

        // non-monotone line search
        let mut lambda = 1.0;
        let (fxx, status) = loop {
            // xx = x + lambda d
            self.xx.copy_from_slice(&state.param);
            math::axpy(lambda, &self.d, &mut self.xx);
            let fxx = problem.cost(&self.xx)?;

            if fxx <= self.params.fmin {
                break (fxx, Status::UnboundedF);
            }

            let fmax = self.fring[..self.m]
                .iter()
                .fold(f64::NEG_INFINITY, |acc, &fi| {
                    acc.max(fi + self.params.gamma * lambda * dtg)
                });
            if fxx <= fmax {
                break (fxx, Status::Success);
            }

            // build a quadratic model and minimize it
            let lambda_new = -lambda * lambda * dtg / (2.0 * (fxx - state.cost - lambda * dtg));
            lambda = (self.params.sigma1 * lambda).max((self.params.sigma2 * lambda).min(lambda_new));
        };

        // s = x_{k+1} - x_k
        for i in 0..self.n {
            self.s[i] = self.xx[i] - state.param[i];
        }
        state.param.copy_from_slice(&self.xx);
        state.grad = problem.gradient(&state.param)?;
        state.cost = fxx;
        let size = self.projected_gradient_size(&state.param, &state.grad);
        state.size = size;

        // y = -(g_{k+1} - g_k)
        for i in 0..self.n {
            self.y[i] -= state.grad[i];
        }

        // push f into the ring
        self.m = (self.m + 1).min(self.fring.len());
        self.tail = (self.tail + 1) % self.fring.len();
        self.fring[self.tail] = state.cost;

        // spectral update; the negated y makes this the standard BB1 step
        let b = math::dot(&self.s, &self.y);
        self.alpha = if b >= 0.0 {
            self.params.alphamax
        } else {
            let snrm = math::norm2(&self.s);
            (-snrm * snrm / b).clamp(self.params.alphamin, self.params.alphamax)
        };

        state.dx.copy_from_slice(&self.s);

        Ok((status, Some(make_kv!("alpha" => self.alpha;))))
    }

    fn is_optimal(&self, state: &IterState) -> Status {
        if state.size > self.params.tol && state.cost > self.params.fmin {
            Status::Continue
        } else {
            Status::Success
        }
    }
}
