// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Conjugate-gradient inner solver of GENCAN.
//!
//! Minimizes the quadratic model `q(s) = s'Hs/2 + g's` over the reduced
//! space, subject to the trust region `||s|| <= cg_delta` (Euclidean or sup
//! norm) and the box `l - x <= s <= u - x`. The Hessian enters only through
//! Hessian-vector products.

use super::{are_close, reduced, Gencan, Norm};
use crate::core::{math, Error, HessianProduct, IterState, Problem};

/// How the inner conjugate-gradient loop ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CgStatus {
    /// The residual satisfied the relative stopping tolerance
    Converged,
    /// The step reached the trust-region boundary
    TrustRegion,
    /// The step reached the boundary of the box
    Boundary,
    /// The angle condition `<g,s> <= -theta ||g|| ||s||` failed; the last
    /// step was rewound
    Angle,
    /// Two consecutive inner iterates were numerically identical
    CloseIterates,
    /// The quadratic model stalled for too many consecutive iterations
    InsufficientProgress,
    /// The iteration limit was reached
    InnerIterations,
    /// No descent direction exists along the current conjugate direction
    NoDescent,
}

/// Roots of `a x^2 + b x + c = 0` in ascending order, computed in the
/// numerically stable form.
fn solve_quadratic(a: f64, b: f64, c: f64) -> (f64, f64) {
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        let r = -b / (2.0 * a);
        return (r, r);
    }
    let sq = disc.sqrt();
    let (r1, r2) = if b >= 0.0 {
        ((-b - sq) / (2.0 * a), 2.0 * c / (-b - sq))
    } else {
        (2.0 * c / (-b + sq), (-b + sq) / (2.0 * a))
    };
    if r1 < r2 {
        (r1, r2)
    } else {
        (r2, r1)
    }
}

impl Gencan {
    /// Runs the conjugate-gradient loop; the resulting step accumulates in
    /// `self.d` (reduced order). `state.param` and `state.grad` must be in
    /// shrunk order.
    pub(crate) fn cg<O: HessianProduct>(
        &mut self,
        problem: &mut Problem<O>,
        state: &mut IterState,
    ) -> Result<CgStatus, Error> {
        let nind = self.nind;

        let theta2 = self.params.theta * self.params.theta;
        let epsabs = self.params.epsabs;
        let epsrel = self.params.epsrel;
        let infabs = self.params.infabs;
        let nearlyq = self.params.nearlyq;

        // iteration limit: user-supplied affine in nind, the dimension for
        // nearly quadratic objectives, or a schedule that grows from
        // logarithmic to linear in nind as the outer iterate approaches
        // optimality
        let cg_maxit: usize = if self.params.ucgmia < 0.0 || self.params.ucgmib < 0.0 {
            if nearlyq {
                nind
            } else {
                let kappa = match self.params.cg_scre {
                    Norm::Euclidean => (self.gpeucn2 / self.gpeucn20).log10()
                        / (self.epsgpen2 / self.gpeucn20).log10(),
                    Norm::Infinity => (self.gpsupn / self.gpsupn0).log10()
                        / (self.params.epsgpsn / self.gpsupn0).log10(),
                };
                let kappa = kappa.min(1.0).max(0.0);
                let aux = (nind as f64).min(10.0 * (nind as f64).log10()).max(1.0);
                ((1.0 - kappa) * aux + kappa * nind as f64) as usize
            }
        } else {
            (self.params.ucgmia * nind as f64 + self.params.ucgmib).max(1.0) as usize
        };

        // per-iteration relative tolerance from the affine log10 schedule,
        // clamped to [cg_epsf, cg_epsi]
        let cg_eps = match self.params.cg_scre {
            Norm::Euclidean => {
                10.0f64.powf(self.acgeps * self.gpeucn2.log10() + self.bcgeps).sqrt()
            }
            Norm::Infinity => 10.0f64.powf(self.acgeps * self.gpsupn.log10() + self.bcgeps),
        };
        let cg_eps = cg_eps.min(self.params.cg_epsi).max(self.params.cg_epsf);
        let cg_eps2 = cg_eps * cg_eps;

        let gnorm2 = math::dot(&state.grad[..nind], &state.grad[..nind]);

        // s accumulates in self.d
        math::set_zero(&mut self.d[..nind]);
        self.cg_r[..nind].copy_from_slice(&state.grad[..nind]);

        let mut q = 0.0;
        let mut snorm2 = 0.0;
        let mut rnorm2 = gnorm2;
        let mut rnorm2_prev = gnorm2;
        let mut dnorm2 = 0.0;
        let mut dtr = 0.0;
        let mut dtw = 0.0;
        let mut alpha = 0.0;

        let mut iter = 0usize;
        let mut itnqmp = 0usize;
        let mut bestprog = 0.0f64;

        // repeat while ||r||_2 = ||H s + g||_2 > eps ||g||_2
        while rnorm2 > cg_eps2 * gnorm2 {
            if iter > cg_maxit {
                return Ok(CgStatus::InnerIterations);
            }

            // conjugate direction
            if iter == 0 {
                for i in 0..nind {
                    self.cg_d[i] = -self.cg_r[i];
                }
                dnorm2 = rnorm2;
                dtr = -rnorm2;
            } else {
                let beta = rnorm2 / rnorm2_prev;
                for i in 0..nind {
                    self.cg_d[i] = -self.cg_r[i] + beta * self.cg_d[i];
                }
                let aux = dtr + alpha * dtw;
                dnorm2 = rnorm2 + beta * (beta * dnorm2 - 2.0 * aux);
                dtr = -rnorm2 + beta * aux;
            }

            // force d to be a descent direction of q(s), i.e.
            // <grad q(s), d> = <H s + g, d> = <r, d> <= 0
            if dtr > 0.0 {
                for i in 0..nind {
                    self.cg_d[i] = -self.cg_d[i];
                }
                dtr = -dtr;
            }

            // w = H d
            {
                let ind = &self.ind[..nind];
                reduced::calc_hv(problem, ind, &mut state.param, &mut self.cg_d, &mut self.cg_w)?;
            }
            dtw = math::dot(&self.cg_d[..nind], &self.cg_w[..nind]);
            let dts = math::dot(&self.cg_d[..nind], &self.d[..nind]);

            // amax1 > 0 and amax1n < 0 take s + alpha d to the trust-region
            // boundary
            let (amax1n, amax1) = match self.params.trtype {
                Norm::Euclidean => {
                    let aa = dnorm2;
                    let bb = 2.0 * dts;
                    let cc = snorm2 - self.cg_delta * self.cg_delta;
                    solve_quadratic(aa, bb, cc)
                }
                Norm::Infinity => {
                    let mut amax1 = infabs;
                    let mut amax1n = -infabs;
                    for i in 0..nind {
                        let di = self.cg_d[i];
                        let si = self.d[i];
                        if di > 0.0 {
                            amax1 = amax1.min((self.cg_delta - si) / di);
                            amax1n = amax1n.max((-self.cg_delta - si) / di);
                        } else if di < 0.0 {
                            amax1 = amax1.min((-self.cg_delta - si) / di);
                            amax1n = amax1n.max((self.cg_delta - si) / di);
                        }
                    }
                    (amax1n, amax1)
                }
            };

            // amax2 > 0 and amax2n < 0 keep l - x <= s + alpha d <= u - x
            let mut amax2 = infabs;
            let mut amax2n = -infabs;
            for i in 0..nind {
                let di = self.cg_d[i];
                if di > 0.0 {
                    amax2 = amax2.min((self.upper[i] - state.param[i] - self.d[i]) / di);
                    amax2n = amax2n.max((self.lower[i] - state.param[i] - self.d[i]) / di);
                } else if di < 0.0 {
                    amax2 = amax2.min((self.lower[i] - state.param[i] - self.d[i]) / di);
                    amax2n = amax2n.max((self.upper[i] - state.param[i] - self.d[i]) / di);
                }
            }

            let amax = amax1.min(amax2);
            let amaxn = amax1n.max(amax2n);

            let qprev = q;

            if dtw > 0.0 {
                // plain conjugate-gradient step, clipped at the boundary
                alpha = amax.min(rnorm2 / dtw);
                q += alpha * (alpha * dtw / 2.0 + dtr);
            } else {
                let qamax = q + amax * (amax * dtw / 2.0 + dtr);
                if iter == 0 {
                    // maximum positive step along minus the gradient
                    alpha = amax;
                    q = qamax;
                } else {
                    let qamaxn = q + amaxn * (amaxn * dtw / 2.0 + dtr);
                    if nearlyq && (qamax < q || qamaxn < q) {
                        // for a nearly quadratic objective go to the best
                        // boundary point
                        if qamax < qamaxn {
                            alpha = amax;
                            q = qamax;
                        } else {
                            alpha = amaxn;
                            q = qamaxn;
                        }
                    } else {
                        return Ok(CgStatus::NoDescent);
                    }
                }
            }

            self.cg_sprev[..nind].copy_from_slice(&self.d[..nind]);
            for i in 0..nind {
                self.d[i] += alpha * self.cg_d[i];
            }
            snorm2 += alpha * (alpha * dnorm2 + 2.0 * dts);

            // residual r = H s + g
            rnorm2_prev = rnorm2;
            for i in 0..nind {
                self.cg_r[i] += alpha * self.cg_w[i];
            }
            rnorm2 = math::dot(&self.cg_r[..nind], &self.cg_r[..nind]);

            iter += 1;

            // angle condition; on failure rewind to the previous step
            let gts = math::dot(&state.grad[..nind], &self.d[..nind]);
            if gts > 0.0 || gts * gts < theta2 * gnorm2 * snorm2 {
                self.d[..nind].copy_from_slice(&self.cg_sprev[..nind]);
                return Ok(CgStatus::Angle);
            }

            // boundary of the trust region
            if (alpha - amax1).abs() < epsabs || (alpha - amax1n).abs() < epsabs {
                return Ok(CgStatus::TrustRegion);
            }

            // boundary of the box
            if (alpha - amax2).abs() < epsabs || (alpha - amax2n).abs() < epsabs {
                return Ok(CgStatus::Boundary);
            }

            if are_close(alpha, &self.cg_d[..nind], &self.d[..nind], epsrel, epsabs) {
                return Ok(CgStatus::CloseIterates);
            }

            // quadratic-progress test
            let currprog = qprev - q;
            bestprog = currprog.max(bestprog);
            if currprog < self.params.cg_epsnqmp * bestprog {
                itnqmp += 1;
                if itnqmp >= self.params.cg_maxitnqmp {
                    return Ok(CgStatus::InsufficientProgress);
                }
            } else {
                itnqmp = 0;
            }
        }

        Ok(CgStatus::Converged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_quadratic() {
        // x^2 - 1: roots -1 and 1
        let (r1, r2) = solve_quadratic(1.0, 0.0, -1.0);
        assert!((r1 + 1.0).abs() < 1e-15);
        assert!((r2 - 1.0).abs() < 1e-15);

        // 2 x^2 + 3 x - 2: roots -2 and 1/2
        let (r1, r2) = solve_quadratic(2.0, 3.0, -2.0);
        assert!((r1 + 2.0).abs() < 1e-15);
        assert!((r2 - 0.5).abs() < 1e-15);

        // negative b branch: 2 x^2 - 3 x - 2
        let (r1, r2) = solve_quadratic(2.0, -3.0, -2.0);
        assert!((r1 + 0.5).abs() < 1e-15);
        assert!((r2 - 2.0).abs() < 1e-15);
    }
}
