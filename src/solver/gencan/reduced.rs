// Copyright 2023-2024 boxmin developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Reduced-space index tools
//!
//! The active-set phase of GENCAN works on the face
//! `Ind = { i : lower[i] < x[i] < upper[i] }` of dimension `nind`.
//! [`shrink`] permutes a vector in place so that the free coordinates occupy
//! the first `nind` positions; [`expand`] undoes the permutation. The
//! `calc_*` evaluators bridge between the reduced space and the user's
//! full-space callbacks without copying vectors around.

use crate::core::{math, CostFunction, Error, Gradient, HessianProduct, Problem};

/// Moves the free coordinates listed in `ind` to the front of `v` by
/// swapping `v[i]` with `v[ind[i]]` for `i = 0, .., nind-1`.
///
/// `ind` must hold strictly increasing indices below `v.len()` (which
/// implies `ind[i] >= i`).
pub fn shrink(ind: &[usize], v: &mut [f64]) {
    for (i, &j) in ind.iter().enumerate() {
        v.swap(i, j);
    }
}

/// Inverse of [`shrink`]: traverses `ind` in reverse to undo the swaps.
///
/// # Example
///
/// ```
/// use boxmin::solver::gencan::reduced::{expand, shrink};
///
/// let mut v = vec![10.0, 11.0, 12.0, 13.0, 14.0];
/// let ind = [1, 3, 4];
/// shrink(&ind, &mut v);
/// assert_eq!(v, vec![11.0, 13.0, 14.0, 10.0, 12.0]);
/// expand(&ind, &mut v);
/// assert_eq!(v, vec![10.0, 11.0, 12.0, 13.0, 14.0]);
/// ```
pub fn expand(ind: &[usize], v: &mut [f64]) {
    for (i, &j) in ind.iter().enumerate().rev() {
        v.swap(i, j);
    }
}

/// Evaluates the objective at a reduced-space point.
///
/// `x[..nind]` holds the free coordinates of the trial point; the tail is
/// overwritten with the bound-pinned coordinates taken from the companion
/// `xc`, the vector is expanded to full order for the callback and shrunk
/// back afterwards.
pub fn calc_f<O: CostFunction>(
    problem: &mut Problem<O>,
    ind: &[usize],
    x: &mut [f64],
    xc: &[f64],
) -> Result<f64, Error> {
    let nind = ind.len();
    let missing = x.len() - nind;

    if missing > 0 {
        x[nind..].copy_from_slice(&xc[nind..]);
        expand(ind, x);
    }

    let f = problem.cost(x)?;

    if missing > 0 {
        shrink(ind, x);
    }

    Ok(f)
}

/// Evaluates the gradient at a reduced-space point; the result lands in `g`
/// in shrunk order.
pub fn calc_g<O: Gradient>(
    problem: &mut Problem<O>,
    ind: &[usize],
    x: &mut [f64],
    xc: &[f64],
    g: &mut [f64],
) -> Result<(), Error> {
    let nind = ind.len();
    let missing = x.len() - nind;

    if missing > 0 {
        x[nind..].copy_from_slice(&xc[nind..]);
        expand(ind, x);
    }

    let gradient = problem.gradient(x)?;
    g.copy_from_slice(&gradient);

    if missing > 0 {
        shrink(ind, x);
        shrink(ind, g);
    }

    Ok(())
}

/// Evaluates the Hessian-vector product in the reduced space.
///
/// `x` must be the current iterate in shrunk order (its tail already carries
/// the pinned coordinates); `v[..nind]` is the reduced direction, its tail
/// is zero-padded before expansion. The product lands in `hv` in shrunk
/// order.
pub fn calc_hv<O: HessianProduct>(
    problem: &mut Problem<O>,
    ind: &[usize],
    x: &mut [f64],
    v: &mut [f64],
    hv: &mut [f64],
) -> Result<(), Error> {
    let nind = ind.len();
    let missing = x.len() - nind;

    if missing > 0 {
        math::set_zero(&mut v[nind..]);
        expand(ind, x);
        expand(ind, v);
    }

    let product = problem.hessian_product(x, v)?;
    hv.copy_from_slice(&product);

    if missing > 0 {
        shrink(ind, x);
        shrink(ind, v);
        shrink(ind, hv);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::DiagQuadratic;
    use approx::assert_relative_eq;

    #[test]
    fn test_shrink_expand_roundtrip() {
        let n = 9;
        let original: Vec<f64> = (0..n).map(|i| i as f64 * 1.5 - 2.0).collect();

        // a few representative faces, including the empty and the full one
        let faces: Vec<Vec<usize>> = vec![
            vec![],
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8],
            vec![2, 5, 7],
            vec![0, 8],
            vec![4],
        ];

        for ind in faces {
            let mut v = original.clone();
            shrink(&ind, &mut v);
            // the front holds exactly the selected entries
            for (i, &j) in ind.iter().enumerate() {
                assert_eq!(v[i].to_ne_bytes(), original[j].to_ne_bytes());
            }
            expand(&ind, &mut v);
            assert_eq!(v, original);
        }
    }

    #[test]
    fn test_calc_f_matches_full_space() {
        let n = 6;
        let problem_def = DiagQuadratic::new(n);
        let mut problem = Problem::new(problem_def.clone());

        let x_full: Vec<f64> = vec![0.3, -1.0, 2.0, 0.0, 1.5, -0.5];
        let ind = [1, 2, 4];

        // shrink a copy of the iterate; trial changes only free coordinates
        let mut xc = x_full.clone();
        shrink(&ind, &mut xc);
        let mut trial = xc.clone();
        trial[0] += 0.25;
        trial[2] -= 0.5;

        let f = calc_f(&mut problem, &ind, &mut trial, &xc).unwrap();

        // reference: apply the same change in full space
        let mut reference = x_full;
        reference[1] += 0.25;
        reference[4] -= 0.5;
        let f_ref = problem.cost(&reference).unwrap();
        assert_relative_eq!(f, f_ref, epsilon = f64::EPSILON);

        // the trial vector is back in shrunk order
        assert_eq!(trial[1].to_ne_bytes(), xc[1].to_ne_bytes());
        assert_eq!(problem.cost_count, 2);
    }

    #[test]
    fn test_calc_g_and_hv_match_full_space() {
        let n = 5;
        let mut problem = Problem::new(DiagQuadratic::new(n));

        let x_full: Vec<f64> = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let ind = [0, 3];

        let mut x = x_full.clone();
        shrink(&ind, &mut x);

        let mut g = vec![0.0; n];
        let xc = x.clone();
        calc_g(&mut problem, &ind, &mut x, &xc, &mut g).unwrap();

        let g_full = problem.gradient(&x_full).unwrap();
        assert_relative_eq!(g[0], g_full[0], epsilon = f64::EPSILON);
        assert_relative_eq!(g[1], g_full[3], epsilon = f64::EPSILON);

        // Hv with a reduced direction touching only the free coordinates
        let mut v = vec![0.0; n];
        v[0] = 1.0;
        v[1] = -2.0;
        let mut hv = vec![0.0; n];
        calc_hv(&mut problem, &ind, &mut x, &mut v, &mut hv).unwrap();

        let mut v_full = vec![0.0; n];
        v_full[0] = 1.0;
        v_full[3] = -2.0;
        let hv_full = problem.hessian_product(&x_full, &v_full).unwrap();
        assert_relative_eq!(hv[0], hv_full[0], epsilon = f64::EPSILON);
        assert_relative_eq!(hv[1], hv_full[3], epsilon = f64::EPSILON);

        // x is restored to shrunk order
        for i in 0..n {
            assert_eq!(x[i].to_ne_bytes(), xc[i].to_ne_bytes());
        }
    }
}
