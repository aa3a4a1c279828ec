//! Complex Schur decomposition using shifted QR iteration with deflation

use crate::algorithm::linalg::{ComplexSchurDecomposition, GivensRotation};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::matrix::Mat;
use tracing::debug;

/// QR sweeps allowed per eigenvalue before giving up
const SCHUR_MAX_ITERATIONS_PER_EIGENVALUE: usize = 30;

/// Sweeps without deflation after which an exceptional shift is used
const EXCEPTIONAL_SHIFT_PERIOD: usize = 10;

/// Complex Schur decomposition
///
/// Computes A = Z @ T @ Z^H where Z is unitary and T is upper triangular.
///
/// 1. Householder reduction to upper Hessenberg form, accumulated into Z
/// 2. Explicitly shifted QR sweeps on the active window, using the Wilkinson
///    shift of the trailing 2×2 block, deflating negligible subdiagonals
///
/// Upper triangular input is returned as-is with Z = I.
pub fn schur_decompose_impl(a: &Mat<Complex128>) -> Result<ComplexSchurDecomposition> {
    let n = a.rows();
    let mut t = a.clone();
    let mut z = Mat::identity(n);

    if n <= 1 || t.is_upper_triangular() {
        return Ok(ComplexSchurDecomposition { z, t });
    }

    hessenberg_reduction(&mut t, &mut z);

    let max_iter = SCHUR_MAX_ITERATIONS_PER_EIGENVALUE * n;
    let eps = f64::EPSILON;
    let scale = t.norm1().max(f64::MIN_POSITIVE);
    let mut total_iter = 0usize;
    let mut since_deflation = 0usize;
    let mut hi = n - 1;

    while hi > 0 {
        // Find the start of the unreduced block ending at `hi`
        let mut lo = hi;
        while lo > 0 {
            let mut s = t[(lo - 1, lo - 1)].magnitude() + t[(lo, lo)].magnitude();
            if s == 0.0 {
                s = scale;
            }
            if t[(lo, lo - 1)].magnitude() <= eps * s {
                t[(lo, lo - 1)] = Complex128::ZERO;
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            since_deflation = 0;
            continue;
        }

        total_iter += 1;
        since_deflation += 1;
        if total_iter > max_iter {
            return Err(Error::no_convergence("schur_decompose", max_iter));
        }

        let shift = if since_deflation % EXCEPTIONAL_SHIFT_PERIOD == 0 {
            t[(hi, hi)] + Complex128::new(0.75 * t[(hi, hi - 1)].re.abs(), 0.0)
        } else {
            wilkinson_shift(&t, hi)
        };
        qr_sweep(&mut t, &mut z, lo, hi, shift);
    }

    t.zero_lower();
    debug!(n, iterations = total_iter, "schur decomposition converged");
    Ok(ComplexSchurDecomposition { z, t })
}

/// Reduce H to upper Hessenberg form in place using Householder reflections,
/// accumulating the reflections into Q.
fn hessenberg_reduction(h: &mut Mat<Complex128>, q: &mut Mat<Complex128>) {
    let n = h.rows();
    for k in 0..n.saturating_sub(2) {
        let len = n - k - 1;
        let mut v: Vec<Complex128> = (0..len).map(|i| h[(k + 1 + i, k)]).collect();
        let norm = v.iter().map(|x| x.magnitude_squared()).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }

        // alpha = -e^{i·arg(x0)}·‖x‖ keeps v0 = x0 - alpha away from cancellation
        let x0 = v[0];
        let phase = if x0.magnitude() == 0.0 {
            Complex128::ONE
        } else {
            x0.scale(1.0 / x0.magnitude())
        };
        let alpha = -phase.scale(norm);
        v[0] = x0 - alpha;
        let v_norm = v.iter().map(|x| x.magnitude_squared()).sum::<f64>().sqrt();
        if v_norm == 0.0 {
            continue;
        }
        for vi in &mut v {
            *vi = vi.scale(1.0 / v_norm);
        }

        // H = P H for rows k+1..n, P = I - 2 v v^H
        for j in 0..n {
            let dot = (0..len).fold(Complex128::ZERO, |acc, i| {
                acc + v[i].conj() * h[(k + 1 + i, j)]
            });
            for i in 0..len {
                h[(k + 1 + i, j)] -= v[i] * dot.scale(2.0);
            }
        }

        // H = H P and Q = Q P for columns k+1..n
        for m in [&mut *h, &mut *q] {
            for i in 0..n {
                let dot = (0..len).fold(Complex128::ZERO, |acc, j| acc + m[(i, k + 1 + j)] * v[j]);
                for j in 0..len {
                    m[(i, k + 1 + j)] -= dot.scale(2.0) * v[j].conj();
                }
            }
        }

        h[(k + 1, k)] = alpha;
        for i in (k + 2)..n {
            h[(i, k)] = Complex128::ZERO;
        }
    }
}

/// Eigenvalue of the trailing 2×2 block of the active window closest to its
/// last diagonal entry.
fn wilkinson_shift(h: &Mat<Complex128>, hi: usize) -> Complex128 {
    let a = h[(hi - 1, hi - 1)];
    let b = h[(hi - 1, hi)];
    let c = h[(hi, hi - 1)];
    let d = h[(hi, hi)];

    let half_diff = (a - d).scale(0.5);
    let disc = (half_diff * half_diff + b * c).sqrt();
    let mean = (a + d).scale(0.5);
    let l1 = mean + disc;
    let l2 = mean - disc;
    if (l1 - d).magnitude() <= (l2 - d).magnitude() {
        l1
    } else {
        l2
    }
}

/// One explicitly shifted QR sweep on the window `lo..=hi`.
///
/// Rotations are applied to full rows and columns so that T stays a valid
/// Schur factor of the whole matrix, not just of the window.
fn qr_sweep(
    t: &mut Mat<Complex128>,
    z: &mut Mat<Complex128>,
    lo: usize,
    hi: usize,
    shift: Complex128,
) {
    let n = t.rows();
    for k in lo..=hi {
        t[(k, k)] -= shift;
    }

    let mut rotations = Vec::with_capacity(hi - lo);
    for k in lo..hi {
        let (rot, _) = GivensRotation::new(t[(k, k)], t[(k + 1, k)]);
        rot.apply_rows(t, k, k..n);
        t[(k + 1, k)] = Complex128::ZERO;
        rotations.push(rot);
    }

    for (offset, rot) in rotations.iter().enumerate() {
        let k = lo + offset;
        rot.apply_cols_adjoint(t, k, 0..(k + 2).min(hi + 1));
        rot.apply_cols_adjoint(z, k, 0..n);
    }

    for k in lo..=hi {
        t[(k, k)] += shift;
    }
}
