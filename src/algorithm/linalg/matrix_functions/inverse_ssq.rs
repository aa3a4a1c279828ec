//! Inverse scaling and squaring on triangular matrices
//!
//! Shared by the logarithm and the fractional power: take s square roots of
//! T until T^(1/2^s) − I is small enough for a degree-m Padé approximant,
//! then recompute the diagonal and first superdiagonal of that difference
//! directly from T to avoid cancellation.

use super::spectrum::has_principal_branch;
use super::sqrt::sqrtm_triu;
use super::types::DEFAULT_SQRTM_BLOCK_SIZE;
use crate::dtype::{Complex128, unwinding_number};
use crate::error::{Error, Result};
use crate::matrix::Mat;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

/// Cap on square roots taken by the inverse scaling and squaring
pub const MAX_INVERSE_SQUARING_ROOTS: u32 = 100;

/// Extra square roots allowed when a3/2 would admit degree 5
const MAX_EXTRA_ROOTS: u32 = 2;

/// Result of the inverse squaring stage
#[derive(Debug, Clone)]
pub(crate) struct InverseSquaring {
    /// T^(1/2^s) − I, upper triangular
    pub r: Mat<Complex128>,
    /// Number of square roots taken
    pub s: u32,
    /// Padé degree
    pub m: usize,
}

/// `a^(1/2^k) − 1` without cancellation
///
/// Uses a^(1/2^k) − 1 = (a − 1) / Π_{j=1..k} (1 + a^(1/2^j)).
pub fn briggs_helper(a: Complex128, k: u32) -> Complex128 {
    match k {
        0 => a - Complex128::ONE,
        1 => a.sqrt() - Complex128::ONE,
        _ => {
            let mut a = a;
            let mut k_hat = k;
            if a.phase() >= FRAC_PI_2 {
                a = a.sqrt();
                k_hat = k - 1;
            }
            let z0 = a - Complex128::ONE;
            a = a.sqrt();
            let mut r = Complex128::ONE + a;
            for _ in 1..k_hat {
                a = a.sqrt();
                r *= Complex128::ONE + a;
            }
            z0 / r
        }
    }
}

/// Superdiagonal entry of T^p for the 2×2 block [[l1, t12], [0, l2]]
pub fn fractional_power_superdiag_entry(
    l1: Complex128,
    l2: Complex128,
    t12: Complex128,
    p: f64,
) -> Complex128 {
    if l1 == l2 {
        return t12 * l1.powf(p - 1.0).scale(p);
    }
    if (l2 - l1).magnitude() > (l1 + l2).magnitude() / 2.0 {
        return t12 * (l2.powf(p) - l1.powf(p)) / (l2 - l1);
    }
    let z = (l2 - l1) / (l2 + l1);
    let (log_l1, log_l2) = (l1.ln(), l2.ln());
    let tmp_a = t12 * (log_l2 + log_l1).scale(p / 2.0).exp();
    let u = unwinding_number(log_l2 - log_l1);
    let tmp_b = (z.atanh() + Complex128::new(0.0, PI * u)).scale(p);
    let tmp_c = tmp_b.sinh().scale(2.0) / (l2 - l1);
    tmp_a * tmp_c
}

/// Superdiagonal entry of log(T) for the 2×2 block [[l1, t12], [0, l2]]
pub fn logm_superdiag_entry(l1: Complex128, l2: Complex128, t12: Complex128) -> Complex128 {
    if l1 == l2 {
        return t12 / l1;
    }
    if (l2 - l1).magnitude() > (l1 + l2).magnitude() / 2.0 {
        return t12 * (l2.ln() - l1.ln()) / (l2 - l1);
    }
    let z = (l2 - l1) / (l2 + l1);
    let u = unwinding_number(l2.ln() - l1.ln());
    t12 * (z.atanh() + Complex128::new(0.0, PI * u)).scale(2.0) / (l2 - l1)
}

/// ‖(T − I)^p‖₁^(1/p)
fn d_p(t_minus_i: &Mat<Complex128>, p: u32) -> f64 {
    let mut power = t_minus_i.clone();
    for _ in 1..p {
        power = power.matmul(t_minus_i);
    }
    power.norm1().powf(1.0 / p as f64)
}

/// `theta[m - 1]` bounds ‖T − I‖ for a degree-m approximant
#[inline]
fn theta_at(theta: &[f64], m: usize) -> f64 {
    theta[m - 1]
}

/// Take square roots of `t0` until a Padé degree from `theta` fits
///
/// `theta` must hold at least 7 bounds. T₀ must be upper triangular with a
/// nonzero diagonal.
pub(crate) fn inverse_squaring(t0: &Mat<Complex128>, theta: &[f64]) -> Result<InverseSquaring> {
    let n = t0.rows();
    let diag0 = t0.diagonal();
    if diag0.iter().any(|&d| d == Complex128::ZERO) {
        return Err(Error::SingularMatrix);
    }

    let sqrt_step = |t: &Mat<Complex128>| sqrtm_triu(t, DEFAULT_SQRTM_BLOCK_SIZE);
    let minus_identity = |t: &Mat<Complex128>| {
        let mut r = t.clone();
        r.add_diagonal(-Complex128::ONE);
        r
    };

    // s0: enough roots that every diagonal entry is within θ7 of 1
    let mut s0 = 0u32;
    let mut d = diag0.clone();
    while d.iter().map(|&x| (x - Complex128::ONE).magnitude()).fold(0.0, f64::max)
        > theta_at(theta, 7)
    {
        if s0 >= MAX_INVERSE_SQUARING_ROOTS {
            return Err(Error::no_convergence("inverse scaling and squaring", s0 as usize));
        }
        d.iter_mut().for_each(|x| *x = x.sqrt());
        s0 += 1;
    }

    let mut t = t0.clone();
    for _ in 0..s0 {
        t = sqrt_step(&t)?;
    }

    let mut s = s0;
    let mut extra = 0u32;
    let mut tm1 = minus_identity(&t);
    let mut d3 = d_p(&tm1, 3);
    let a2 = d_p(&tm1, 2).max(d3);
    let mut m = (1..=2).find(|&i| a2 <= theta_at(theta, i));

    while m.is_none() {
        if s > s0 {
            d3 = d_p(&tm1, 3);
        }
        let d4 = d_p(&tm1, 4);
        let a3 = d3.max(d4);
        if a3 <= theta_at(theta, 7) {
            if let Some(j1) = (3..=7).find(|&i| a3 <= theta_at(theta, i)) {
                if j1 <= 6 {
                    m = Some(j1);
                    break;
                }
            }
            if a3 / 2.0 <= theta_at(theta, 5) && extra < MAX_EXTRA_ROOTS {
                extra += 1;
                t = sqrt_step(&t)?;
                tm1 = minus_identity(&t);
                s += 1;
                continue;
            }
        }
        let d5 = d_p(&tm1, 5);
        let eta = a3.min(d4.max(d5));
        m = (6..=7).find(|&i| eta <= theta_at(theta, i));
        if m.is_some() {
            break;
        }
        if s >= MAX_INVERSE_SQUARING_ROOTS {
            return Err(Error::no_convergence("inverse scaling and squaring", s as usize));
        }
        t = sqrt_step(&t)?;
        tm1 = minus_identity(&t);
        s += 1;
    }
    let m = m.unwrap_or(7);

    let mut r = tm1;
    if has_principal_branch(&diag0) {
        for (j, &a) in diag0.iter().enumerate() {
            r[(j, j)] = briggs_helper(a, s);
        }
        let p = (-(s as f64)).exp2();
        for j in 0..n.saturating_sub(1) {
            r[(j, j + 1)] =
                fractional_power_superdiag_entry(diag0[j], diag0[j + 1], t0[(j, j + 1)], p);
        }
    }
    debug!(n, s, m, "inverse scaling and squaring");
    Ok(InverseSquaring { r, s, m })
}
