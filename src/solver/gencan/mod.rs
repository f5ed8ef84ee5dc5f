// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! * [GENCAN active-set truncated-Newton method](struct.Gencan.html)
//!
//! # References:
//!
//! \[0\] E. G. Birgin and J. M. Martinez (2002). Large-scale active-set
//! box-constrained optimization method with spectral projected gradients.
//! Computational Optimization and Applications 23, 101-125.

use crate::core::{
    math, BoxConstraint, CostGradient, Error, HessianProduct, IterState, Parameters, Problem,
    Solver, Status, KV,
};
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

mod cg;
pub mod reduced;
mod spgls;
mod tnls;

pub(crate) use cg::CgStatus;
pub(crate) use spgls::LineSearchStatus;
pub(crate) use tnls::TnlsStatus;

/// Which norm a trust region or a stopping rule is measured in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Norm {
    /// The Euclidean norm
    Euclidean,
    /// The sup norm
    Infinity,
}

/// Parameters of the GENCAN method.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct GencanParameters {
    /// Tolerance on the Euclidean norm of the projected gradient (default `1e-5`)
    pub epsgpen: f64,
    /// Tolerance on the sup-norm of the projected gradient (default `1e-5`)
    pub epsgpsn: f64,
    /// Lower cut-off for the objective; reaching it terminates with `UnboundedF` (default `-1e99`)
    pub fmin: f64,
    /// Initial trust-region radius; negative means automatic (default `-1`)
    pub udelta0: f64,
    /// Slope of the user override for the inner iteration limit, affine in
    /// `nind`; negative means automatic (default `-1`)
    pub ucgmia: f64,
    /// Offset of the user override for the inner iteration limit; negative
    /// means automatic (default `-1`)
    pub ucgmib: f64,
    /// Norm driving the inner stopping tolerance and iteration schedule
    /// (default [`Norm::Euclidean`])
    pub cg_scre: Norm,
    /// Projected-gradient norm at which the inner tolerance reaches
    /// `cg_epsf` (default `epsgpen`)
    pub cg_gpnf: f64,
    /// Initial relative stopping tolerance of the inner solver (default `0.1`)
    pub cg_epsi: f64,
    /// Final relative stopping tolerance of the inner solver (default `1e-5`)
    pub cg_epsf: f64,
    /// Relative quadratic-progress threshold of the inner solver (default `1e-4`)
    pub cg_epsnqmp: f64,
    /// Number of consecutive low-progress inner iterations tolerated (default `5`)
    pub cg_maxitnqmp: usize,
    /// Whether the objective is (nearly) quadratic (default `false`)
    pub nearlyq: bool,
    /// Interpolation contraction factor (default `2.0`)
    pub nint: f64,
    /// Extrapolation expansion factor (default `2.0`)
    pub next: f64,
    /// Interpolations before the too-close test may fail the line search (default `4`)
    pub mininterp: usize,
    /// Maximum number of extrapolation trials (default `100`)
    pub maxextrap: usize,
    /// Norm of the trust region (default [`Norm::Euclidean`])
    pub trtype: Norm,
    /// Face-test parameter in `(0, 1)` (default `0.9`)
    pub eta: f64,
    /// Smallest trust-region radius (default `0.1`)
    pub delmin: f64,
    /// Lower clamp of the spectral step (default `1e-10`)
    pub lspgmi: f64,
    /// Upper clamp of the spectral step (default `1e10`)
    pub lspgma: f64,
    /// Angle-condition parameter in `(0, 1)` (default `1e-6`)
    pub theta: f64,
    /// Armijo sufficient-decrease coefficient in `(0, 0.5)` (default `1e-4`)
    pub gamma: f64,
    /// Directional-derivative acceptance coefficient in `(0, 1)` (default `0.5`)
    pub beta: f64,
    /// Lower safeguard of the quadratic interpolation step (default `0.1`)
    pub sigma1: f64,
    /// Upper safeguard of the quadratic interpolation step (default `0.9`)
    pub sigma2: f64,
    /// Relative closeness threshold (default `1e-7`)
    pub epsrel: f64,
    /// Absolute closeness threshold (default `1e-10`)
    pub epsabs: f64,
    /// Relative infinity (default `1e20`)
    pub infrel: f64,
    /// Absolute infinity (default `1e99`)
    pub infabs: f64,
}

impl Default for GencanParameters {
    fn default() -> Self {
        GencanParameters {
            epsgpen: 1.0e-5,
            epsgpsn: 1.0e-5,
            fmin: -1.0e99,
            udelta0: -1.0,
            ucgmia: -1.0,
            ucgmib: -1.0,
            cg_scre: Norm::Euclidean,
            cg_gpnf: 1.0e-5,
            cg_epsi: 1.0e-1,
            cg_epsf: 1.0e-5,
            cg_epsnqmp: 1.0e-4,
            cg_maxitnqmp: 5,
            nearlyq: false,
            nint: 2.0,
            next: 2.0,
            mininterp: 4,
            maxextrap: 100,
            trtype: Norm::Euclidean,
            eta: 0.9,
            delmin: 0.1,
            lspgmi: 1.0e-10,
            lspgma: 1.0e10,
            theta: 1.0e-6,
            gamma: 1.0e-4,
            beta: 0.5,
            sigma1: 0.1,
            sigma2: 0.9,
            epsrel: 1.0e-7,
            epsabs: 1.0e-10,
            infrel: 1.0e20,
            infabs: 1.0e99,
        }
    }
}

impl Parameters for GencanParameters {
    fn validate(&self) -> Result<(), Error> {
        if self.epsgpsn < 0.0
            || self.epsgpen < 0.0
            || self.cg_gpnf < 0.0
            || self.cg_epsi < 0.0
            || self.cg_epsf < 0.0
            || self.cg_epsnqmp < 0.0
            || self.cg_maxitnqmp < 1
            || self.nint <= 1.0
            || self.next <= 1.0
            || self.mininterp < 1
            || self.eta <= 0.0
            || self.eta >= 1.0
            || self.delmin <= 0.0
            || self.lspgmi <= 0.0
            || self.lspgma < self.lspgmi
            || self.theta <= 0.0
            || self.theta >= 1.0
            || self.gamma <= 0.0
            || self.gamma >= 0.5
            || self.beta <= 0.0
            || self.beta >= 1.0
            || self.sigma1 <= 0.0
            || self.sigma2 <= self.sigma1
            || self.sigma2 >= 1.0
            || self.epsrel < 0.0
            || self.epsabs < 0.0
            || self.infrel < 0.0
            || self.infabs < 0.0
        {
            return Err(boxmin_error!(InvalidParameter, "Gencan: invalid parameters"));
        }
        Ok(())
    }
}

/// GENCAN: active-set method for box-constrained minimization.
///
/// Each outer iteration inspects the current face. When the face is likely
/// to change (the interior part of the projected gradient is small against
/// the whole), a spectral projected-gradient step leaves it; otherwise the
/// iterate stays on the closure of the face and a truncated-Newton direction
/// is computed there by conjugate gradients inside a trust region, followed
/// by a line search with extrapolation. Variables that end up numerically on
/// a bound are pinned to it exactly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Gencan {
    params: GencanParameters,
    n: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
    /// numerical lower and upper bounds used for pinning
    near_l: Vec<f64>,
    near_u: Vec<f64>,
    /// free coordinates of the current face
    ind: Vec<usize>,
    nind: usize,
    xeucn: f64,
    xsupn: f64,
    s: Vec<f64>,
    y: Vec<f64>,
    d: Vec<f64>,
    /// (1 - eta)^2
    ometa2: f64,
    /// epsgpen^2
    epsgpen2: f64,
    /// spectral steplength
    lambda: f64,
    sts: f64,
    sty: f64,
    sinf: f64,
    /// squared Euclidean norm of the projected gradient
    gpeucn2: f64,
    /// sup-norm of the projected gradient
    gpsupn: f64,
    /// squared Euclidean norm of the projected gradient over the interior
    gieucn2: f64,
    /// affine coefficients of the inner-tolerance schedule
    acgeps: f64,
    bcgeps: f64,
    /// projected-gradient norms at the first iteration
    gpsupn0: f64,
    gpeucn20: f64,
    xtrial: Vec<f64>,
    tnls_xtemp: Vec<f64>,
    /// maximum feasible step of the truncated-Newton line search
    tnls_amax: f64,
    cg_w: Vec<f64>,
    cg_r: Vec<f64>,
    cg_d: Vec<f64>,
    cg_sprev: Vec<f64>,
    /// trust-region radius
    cg_delta: f64,
}

impl Gencan {
    /// Allocates a GENCAN solver for an `n`-dimensional problem.
    pub fn new(n: usize) -> Self {
        Gencan {
            params: GencanParameters::default(),
            n,
            lower: vec![0.0; n],
            upper: vec![0.0; n],
            near_l: vec![0.0; n],
            near_u: vec![0.0; n],
            ind: vec![0; n],
            nind: 0,
            xeucn: 0.0,
            xsupn: 0.0,
            s: vec![0.0; n],
            y: vec![0.0; n],
            d: vec![0.0; n],
            ometa2: 0.0,
            epsgpen2: 0.0,
            lambda: 1.0,
            sts: 0.0,
            sty: 0.0,
            sinf: 0.0,
            gpeucn2: 0.0,
            gpsupn: 0.0,
            gieucn2: 0.0,
            acgeps: 0.0,
            bcgeps: 0.0,
            gpsupn0: 0.0,
            gpeucn20: 0.0,
            xtrial: vec![0.0; n],
            tnls_xtemp: vec![0.0; n],
            tnls_amax: 0.0,
            cg_w: vec![0.0; n],
            cg_r: vec![0.0; n],
            cg_d: vec![0.0; n],
            cg_sprev: vec![0.0; n],
            cg_delta: 0.0,
        }
    }

    /// Projected-gradient statistics at `(x, g)`.
    ///
    /// For each coordinate, `gp_i = clamp(x_i - g_i, l_i, u_i) - x_i`.
    /// Records the sup-norm and squared Euclidean norm of `gp`, the squared
    /// norm over the strictly interior coordinates, and the interior
    /// coordinates themselves in `ind`.
    fn projected_gradient(&mut self, x: &[f64], g: &[f64]) {
        let mut nind = 0;
        let mut gpsupn = 0.0f64;
        let mut gpeucn2 = 0.0;
        let mut gieucn2 = 0.0;

        for i in 0..self.n {
            let gpi = self.lower[i].max(x[i] - g[i]).min(self.upper[i]) - x[i];
            let gpi2 = gpi * gpi;

            gpsupn = gpsupn.max(gpi.abs());
            gpeucn2 += gpi2;

            if x[i] > self.lower[i] && x[i] < self.upper[i] {
                gieucn2 += gpi2;
                self.ind[nind] = i;
                nind += 1;
            }
        }

        self.nind = nind;
        self.gpsupn = gpsupn;
        self.gpeucn2 = gpeucn2;
        self.gieucn2 = gieucn2;
    }

    /// Defines the state variables and prepares for the first iteration.
    fn prepare<O: CostGradient>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<(), Error> {
        // impose feasibility
        math::proj(&self.lower, &self.upper, &mut state.param);

        self.xeucn = math::norm2(&state.param);
        self.xsupn = math::norm_inf(&state.param);

        let (cost, grad) = problem.cost_gradient(&state.param)?;
        state.cost = cost;
        state.grad = grad;

        for i in 0..self.n {
            self.near_l[i] =
                self.lower[i] + (self.params.epsrel * self.lower[i].abs()).max(self.params.epsabs);
            self.near_u[i] =
                self.upper[i] - (self.params.epsrel * self.upper[i].abs()).max(self.params.epsabs);
        }

        self.ometa2 = (1.0 - self.params.eta) * (1.0 - self.params.eta);
        self.epsgpen2 = self.params.epsgpen * self.params.epsgpen;

        self.projected_gradient(&state.param, &state.grad);

        // Fit a line in log10 space so the inner relative tolerance equals
        // cg_epsi at the initial projected-gradient norm and cg_epsf at the
        // target one. A vanishing projected gradient means the point is
        // already stationary and the schedule is never consulted.
        if self.gpeucn2 > 0.0 && self.gpsupn > 0.0 {
            match self.params.cg_scre {
                Norm::Euclidean => {
                    self.acgeps = 2.0 * (self.params.cg_epsf / self.params.cg_epsi).log10()
                        / (self.params.cg_gpnf * self.params.cg_gpnf / self.gpeucn2).log10();
                    self.bcgeps =
                        2.0 * self.params.cg_epsi.log10() - self.acgeps * self.gpeucn2.log10();
                }
                Norm::Infinity => {
                    self.acgeps = (self.params.cg_epsf / self.params.cg_epsi).log10()
                        / (self.params.cg_gpnf / self.gpsupn).log10();
                    self.bcgeps = self.params.cg_epsi.log10() - self.acgeps * self.gpsupn.log10();
                }
            }
        } else {
            self.acgeps = 0.0;
            self.bcgeps = 0.0;
        }

        self.gpsupn0 = self.gpsupn;
        self.gpeucn20 = self.gpeucn2;

        // initial spectral steplength
        self.lambda = if self.gpeucn2 > 0.0 {
            1.0f64.max(self.xeucn) / self.gpeucn2.sqrt()
        } else {
            1.0
        };

        // initial trust-region radius
        self.cg_delta = if self.params.udelta0 < 0.0 {
            let aux = match self.params.trtype {
                Norm::Euclidean => 0.1 * 1.0f64.max(self.xeucn),
                Norm::Infinity => 0.1 * 1.0f64.max(self.xsupn),
            };
            self.params.delmin.max(aux)
        } else {
            self.params.delmin.max(self.params.udelta0)
        };

        state.size = self.gpsupn;
        Ok(())
    }

    /// Maximum feasible step along `d` from the reduced-space iterate.
    fn tnls_maximum_step(&self, x: &[f64]) -> f64 {
        let mut step = self.params.infabs;
        for i in 0..self.nind {
            let di = self.d[i];
            if di > 0.0 {
                step = step.min((self.upper[i] - x[i]) / di);
            } else if di < 0.0 {
                step = step.min((self.lower[i] - x[i]) / di);
            }
        }
        step
    }

    /// Spectral steplength update from the last step `s` and gradient
    /// difference `y`.
    fn spg_steplength(&mut self) {
        if self.sty <= 0.0 {
            self.lambda = if self.gpeucn2 > 0.0 {
                1.0f64.max(self.xeucn) / self.gpeucn2.sqrt()
            } else {
                1.0
            };
        } else {
            self.lambda = (self.sts / self.sty)
                .max(self.params.lspgmi)
                .min(self.params.lspgma);
        }
    }
}

/// Two consecutive iterates `x` and `x + alpha * d` are numerically
/// indistinguishable when every component of the step lies within the
/// relative/absolute thresholds.
pub(crate) fn are_close(alpha: f64, d: &[f64], x: &[f64], epsrel: f64, epsabs: f64) -> bool {
    d.iter()
        .zip(x)
        .all(|(&di, &xi)| (alpha * di).abs() <= (epsrel * xi.abs()).max(epsabs))
}

impl<O: CostGradient + HessianProduct> Solver<O> for Gencan {
    const NAME: &'static str = "GENCAN";

    type Parameters = GencanParameters;

    fn dimension(&self) -> usize {
        self.n
    }

    fn parameters(&self) -> &GencanParameters {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut GencanParameters {
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
        self.prepare(problem, state)
    }

    fn restart(&mut self, problem: &mut Problem<O>, state: &mut IterState) -> Result<(), Error> {
        self.prepare(problem, state)
    }

    fn iterate(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<(Status, Option<KV>), Error> {
        // save the previous point and gradient
        self.s.copy_from_slice(&state.param);
        self.y.copy_from_slice(&state.grad);

        let mut finnerit = false;
        let ls_status;

        if self.gieucn2 <= self.ometa2 * self.gpeucn2 {
            // the face is unlikely to change: leave it with a spectral
            // projected-gradient step
            ls_status = self.spgls(problem, state)?;
            state.grad = problem.gradient(&state.param)?;
        } else {
            // the new iterate belongs to the closure of the current face
            let nind = self.nind;
            {
                let ind = &self.ind[..nind];
                reduced::shrink(ind, &mut state.param);
                reduced::shrink(ind, &mut state.grad);
                reduced::shrink(ind, &mut self.lower);
                reduced::shrink(ind, &mut self.upper);
            }

            // descent direction from the Newtonian system
            let cg_status = self.cg(problem, state)?;

            if matches!(cg_status, CgStatus::NoDescent) {
                let ind = &self.ind[..nind];
                reduced::expand(ind, &mut state.param);
                reduced::expand(ind, &mut state.grad);
                reduced::expand(ind, &mut self.lower);
                reduced::expand(ind, &mut self.upper);
                return Err(boxmin_error!(
                    NoDescentDirection,
                    "Gencan: conjugate gradient could not produce a descent direction"
                ));
            }
            if matches!(cg_status, CgStatus::InnerIterations) {
                finnerit = true;
            }

            // maximum step for the truncated-Newton line search
            self.tnls_amax = if matches!(cg_status, CgStatus::Boundary) {
                1.0
            } else {
                self.tnls_maximum_step(&state.param)
            };

            let tnls_status = self.tnls(problem, state)?;

            {
                let ind = &self.ind[..nind];
                reduced::expand(ind, &mut state.param);
                reduced::expand(ind, &mut state.grad);
                reduced::expand(ind, &mut self.lower);
                reduced::expand(ind, &mut self.upper);
            }

            // a very small truncated-Newton step discards the iteration and
            // forces a spectral projected-gradient step instead
            ls_status = if matches!(tnls_status, TnlsStatus::Failed) {
                let fallback = self.spgls(problem, state)?;
                state.grad = problem.gradient(&state.param)?;
                fallback
            } else {
                LineSearchStatus::Success
            };
        }

        // pin variables that are numerically on a bound
        for i in 0..self.n {
            if state.param[i] <= self.near_l[i] {
                state.param[i] = self.lower[i];
            } else if state.param[i] >= self.near_u[i] {
                state.param[i] = self.upper[i];
            }
        }

        self.xsupn = math::norm_inf(&state.param);
        self.xeucn = math::norm2(&state.param);

        // s = x_{k+1} - x_k and y = g_{k+1} - g_k
        for i in 0..self.n {
            self.s[i] = state.param[i] - self.s[i];
            self.y[i] = state.grad[i] - self.y[i];
        }
        self.sts = math::dot(&self.s, &self.s);
        self.sty = math::dot(&self.s, &self.y);
        self.sinf = math::norm_inf(&self.s);

        self.projected_gradient(&state.param, &state.grad);
        self.spg_steplength();

        // trust-region radius for the next iteration
        self.cg_delta = match self.params.trtype {
            Norm::Euclidean => self.params.delmin.max(10.0 * self.sts.sqrt()),
            Norm::Infinity => self.params.delmin.max(10.0 * self.sinf),
        };

        state.size = self.gpsupn;
        state.dx.copy_from_slice(&self.s);

        let status = match ls_status {
            LineSearchStatus::Unbounded => Status::UnboundedF,
            LineSearchStatus::Failed => Status::LineSearchFailed,
            LineSearchStatus::Success => {
                if finnerit {
                    Status::InnerIterations
                } else {
                    Status::Success
                }
            }
        };

        Ok((
            status,
            Some(make_kv!(
                "nind" => self.nind;
                "lambda" => self.lambda;
                "cg_delta" => self.cg_delta;
            )),
        ))
    }

    fn is_optimal(&self, state: &IterState) -> Status {
        if self.gpeucn2 <= self.epsgpen2
            || self.gpsupn <= self.params.epsgpsn
            || state.cost <= self.params.fmin
        {
            Status::Success
        } else {
            Status::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::{DiagQuadratic, ShiftedSphere};
    use crate::core::{BoxminError, Minimizer};
    use crate::test_trait_impl;

    test_trait_impl!(gencan, Gencan);

    #[test]
    fn test_default_parameters() {
        let p = GencanParameters::default();
        assert_eq!(p.epsgpen.to_ne_bytes(), 1.0e-5f64.to_ne_bytes());
        assert_eq!(p.epsgpsn.to_ne_bytes(), 1.0e-5f64.to_ne_bytes());
        assert_eq!(p.fmin.to_ne_bytes(), (-1.0e99f64).to_ne_bytes());
        assert_eq!(p.udelta0.to_ne_bytes(), (-1.0f64).to_ne_bytes());
        assert_eq!(p.cg_scre, Norm::Euclidean);
        assert_eq!(p.cg_gpnf.to_ne_bytes(), 1.0e-5f64.to_ne_bytes());
        assert_eq!(p.cg_epsi.to_ne_bytes(), 1.0e-1f64.to_ne_bytes());
        assert_eq!(p.cg_epsf.to_ne_bytes(), 1.0e-5f64.to_ne_bytes());
        assert_eq!(p.cg_epsnqmp.to_ne_bytes(), 1.0e-4f64.to_ne_bytes());
        assert_eq!(p.cg_maxitnqmp, 5);
        assert!(!p.nearlyq);
        assert_eq!(p.nint.to_ne_bytes(), 2.0f64.to_ne_bytes());
        assert_eq!(p.next.to_ne_bytes(), 2.0f64.to_ne_bytes());
        assert_eq!(p.mininterp, 4);
        assert_eq!(p.maxextrap, 100);
        assert_eq!(p.trtype, Norm::Euclidean);
        assert_eq!(p.eta.to_ne_bytes(), 0.9f64.to_ne_bytes());
        assert_eq!(p.delmin.to_ne_bytes(), 0.1f64.to_ne_bytes());
        assert_eq!(p.lspgmi.to_ne_bytes(), 1.0e-10f64.to_ne_bytes());
        assert_eq!(p.lspgma.to_ne_bytes(), 1.0e10f64.to_ne_bytes());
        assert_eq!(p.theta.to_ne_bytes(), 1.0e-6f64.to_ne_bytes());
        assert_eq!(p.gamma.to_ne_bytes(), 1.0e-4f64.to_ne_bytes());
        assert_eq!(p.beta.to_ne_bytes(), 0.5f64.to_ne_bytes());
        assert_eq!(p.sigma1.to_ne_bytes(), 0.1f64.to_ne_bytes());
        assert_eq!(p.sigma2.to_ne_bytes(), 0.9f64.to_ne_bytes());
        assert_eq!(p.epsrel.to_ne_bytes(), 1.0e-7f64.to_ne_bytes());
        assert_eq!(p.epsabs.to_ne_bytes(), 1.0e-10f64.to_ne_bytes());
        assert_eq!(p.infrel.to_ne_bytes(), 1.0e20f64.to_ne_bytes());
        assert_eq!(p.infabs.to_ne_bytes(), 1.0e99f64.to_ne_bytes());
    }

    #[test]
    fn test_parameter_validation() {
        let checks: Vec<fn(&mut GencanParameters)> = vec![
            |p| p.epsgpen = -1.0,
            |p| p.epsgpsn = -1.0,
            |p| p.cg_gpnf = -1.0,
            |p| p.cg_epsi = -1.0,
            |p| p.cg_epsf = -1.0,
            |p| p.cg_epsnqmp = -1.0,
            |p| p.cg_maxitnqmp = 0,
            |p| p.nint = 1.0,
            |p| p.next = 0.5,
            |p| p.mininterp = 0,
            |p| p.eta = 0.0,
            |p| p.eta = 1.0,
            |p| p.delmin = 0.0,
            |p| p.lspgmi = 0.0,
            |p| p.lspgma = 1.0e-20,
            |p| p.theta = 1.0,
            |p| p.gamma = 0.5,
            |p| p.gamma = 0.0,
            |p| p.beta = 1.0,
            |p| p.sigma1 = 0.0,
            |p| p.sigma2 = 0.1,
            |p| p.sigma2 = 1.0,
            |p| p.epsrel = -1.0,
            |p| p.epsabs = -1.0,
        ];
        for poison in checks {
            let mut p = GencanParameters::default();
            poison(&mut p);
            assert_error!(
                p.validate(),
                BoxminError,
                "Invalid parameter: \"Gencan: invalid parameters\""
            );
        }
        assert!(GencanParameters::default().validate().is_ok());
    }

    #[test]
    fn test_diag_quadratic() {
        let n = 100;
        let problem = DiagQuadratic::new(n);
        let solution = problem.boxed_solution();
        let constraint = BoxConstraint::new(vec![-3.0; 100], vec![3.0; 100]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();

        let mut minimizer = Minimizer::new(Gencan::new(n));
        minimizer
            .set(problem, &constraint, &x0, GencanParameters::default())
            .unwrap();
        assert!(constraint.is_feasible(minimizer.param()));

        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 1000 {
            minimizer.iterate().unwrap();
            assert!(constraint.is_feasible(minimizer.param()));
            assert!(minimizer.size() >= 0.0);
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);

        for i in 0..n {
            assert!(
                (minimizer.param()[i] - solution[i]).abs() < 1e-5,
                "coordinate {} off: {} vs {}",
                i,
                minimizer.param()[i],
                solution[i]
            );
        }
        assert!(minimizer.cost_count() < 500);
        assert!(minimizer.gradient_count() < 500);
    }

    #[test]
    fn test_diag_quadratic_nearly_quadratic_flag() {
        let n = 50;
        let problem = DiagQuadratic::new(n);
        let solution = problem.boxed_solution();
        let constraint = BoxConstraint::new(vec![-3.0; 50], vec![3.0; 50]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();

        let mut params = GencanParameters::default();
        params.nearlyq = true;

        let mut minimizer = Minimizer::new(Gencan::new(n));
        minimizer.set(problem, &constraint, &x0, params).unwrap();

        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 1000 {
            minimizer.iterate().unwrap();
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);
        for i in 0..n {
            assert!((minimizer.param()[i] - solution[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bound_activation() {
        // minimum of (x1-5)^2 + (x2-5)^2 over [0,1]^2 is at (1,1): both
        // bounds must activate and the interior gradient must vanish
        let constraint = BoxConstraint::new(vec![0.0, 0.0], vec![1.0, 1.0]).unwrap();
        let mut minimizer = Minimizer::new(Gencan::new(2));
        minimizer
            .set(
                ShiftedSphere {},
                &constraint,
                &[0.5, 0.5],
                GencanParameters::default(),
            )
            .unwrap();

        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 100 {
            minimizer.iterate().unwrap();
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);
        assert_eq!(minimizer.param()[0].to_ne_bytes(), 1.0f64.to_ne_bytes());
        assert_eq!(minimizer.param()[1].to_ne_bytes(), 1.0f64.to_ne_bytes());

        // all variables sit on bounds, so the interior part of the
        // projected gradient is identically zero
        let solver_view = minimizer.state();
        assert_eq!(solver_view.get_size(), minimizer.size());
        assert!(minimizer.size() <= 1e-5);
    }

    #[test]
    fn test_fmin_cutoff() {
        // all targets (i+1)/10 are interior to the box, so the minimum value
        // is zero and the trajectory must cross the cut-off
        let n = 10;
        let constraint = BoxConstraint::new(vec![-3.0; 10], vec![3.0; 10]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();
        let mut params = GencanParameters::default();
        params.fmin = 1.0;

        let mut minimizer = Minimizer::new(Gencan::new(n));
        minimizer
            .set(DiagQuadratic::new(n), &constraint, &x0, params)
            .unwrap();

        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 1000 {
            let status = minimizer.iterate().unwrap();
            assert!(matches!(
                status,
                Status::Success | Status::UnboundedF | Status::InnerIterations
            ));
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);
        // either the cut-off fired inside a line search or a regular step
        // crossed it; in both cases the reported value satisfies the bound
        assert!(minimizer.cost() <= 1.0);
    }

    #[test]
    fn test_infeasible_start_is_clamped_at_set() {
        let n = 100;
        let constraint = BoxConstraint::new(vec![-3.0; 100], vec![3.0; 100]).unwrap();
        let mut minimizer = Minimizer::new(Gencan::new(n));
        minimizer
            .set(
                DiagQuadratic::new(n),
                &constraint,
                &[100.0; 100],
                GencanParameters::default(),
            )
            .unwrap();
        assert!(constraint.is_feasible(minimizer.param()));
        for &xi in minimizer.param() {
            assert_eq!(xi.to_ne_bytes(), 3.0f64.to_ne_bytes());
        }
        assert_eq!(minimizer.cost_count(), 1);
        assert_eq!(minimizer.gradient_count(), 1);
        assert_eq!(minimizer.hessian_count(), 0);
    }

    #[test]
    fn test_hessian_only_used_by_cg() {
        let n = 10;
        let constraint = BoxConstraint::new(vec![-3.0; 10], vec![3.0; 10]).unwrap();
        let x0: Vec<f64> = (0..n).map(|i| 0.1 * (i as f64 + 1.0) - 0.05).collect();
        let mut minimizer = Minimizer::new(Gencan::new(n));
        minimizer
            .set(
                DiagQuadratic::new(n),
                &constraint,
                &x0,
                GencanParameters::default(),
            )
            .unwrap();
        let mut iters = 0;
        while minimizer.is_optimal() == Status::Continue && iters < 100 {
            minimizer.iterate().unwrap();
            iters += 1;
        }
        assert_eq!(minimizer.is_optimal(), Status::Success);
        // the interior start makes the truncated-Newton path run, so
        // Hessian-vector products were consumed
        assert!(minimizer.hessian_count() > 0);
    }
}
