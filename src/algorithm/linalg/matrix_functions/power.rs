//! Integer and real powers of a matrix
//!
//! Integer exponents use binary powering (negative ones through the
//! inverse). A real exponent p is split as p = a + b with a integer and
//! |b| < 1, chosen from the condition number; A^b comes from the
//! Schur-Padé method of Higham & Lin on the triangular factor.

use super::inverse_ssq::{fractional_power_superdiag_entry, inverse_squaring};
use super::parlett::parlett_schur;
use super::scalar::Power;
use super::spectrum::{OutputDomain, SchurForm, has_principal_branch, tolerate_numerical};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::{Complex128, Element};
use crate::error::{Error, Result};
use crate::matrix::{Mat, Matrix, MatrixData};
use tracing::debug;

/// Padé error bounds θ_m for m = 1..=7
const POWER_THETA: [f64; 7] = [
    1.51e-5, 2.24e-3, 1.88e-2, 6.04e-2, 1.24e-1, 2.00e-1, 2.79e-1,
];

/// A^k for a typed matrix; `None` when k < 0 and A is singular
fn matrix_power_mat<T, B>(backend: &B, a: &Mat<T>, k: i64) -> Result<Option<Mat<T>>>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let n = a.rows();
    let base = if k < 0 {
        match tolerate_numerical(backend.inverse(a))? {
            Some(inv) => inv,
            None => return Ok(None),
        }
    } else {
        a.clone()
    };

    let mut exponent = k.unsigned_abs();
    let mut result = Mat::identity(n);
    let mut square = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.matmul(&square);
        }
        exponent >>= 1;
        if exponent > 0 {
            square = square.matmul(&square);
        }
    }
    Ok(Some(result))
}

/// A^k for a dtype-erased matrix, keeping the dtype
pub(crate) fn matrix_power_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    k: i64,
) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    let n = a.rows();
    let result: Option<Matrix> = match a.data() {
        MatrixData::F64(m) => matrix_power_mat(backend, m, k)?.map(Into::into),
        MatrixData::Complex128(m) => matrix_power_mat(backend, m, k)?.map(Into::into),
    };
    Ok(match result {
        Some(m) if m.is_finite() => m,
        _ => Matrix::nan(n, n, a.dtype()),
    })
}

/// Coefficient c_i of the continued fraction for (1 − x)^t
fn pade_constant(i: usize, t: f64) -> f64 {
    if i == 1 {
        return -t;
    }
    let j = (i / 2) as f64;
    if i % 2 == 0 {
        (-j + t) / (2.0 * (2.0 * j - 1.0))
    } else {
        (-j - t) / (2.0 * (2.0 * j + 1.0))
    }
}

/// (I − X)^t by its degree-m continued fraction, bottom up
fn fractional_power_pade<B: LinearAlgebraAlgorithms>(
    backend: &B,
    x: &Mat<Complex128>,
    t: f64,
    m: usize,
) -> Result<Mat<Complex128>> {
    let mut y = x.scale(pade_constant(2 * m, t));
    for j in (1..2 * m).rev() {
        let rhs = x.scale(pade_constant(j, t));
        let mut lhs = y;
        lhs.add_diagonal(Complex128::ONE);
        y = backend.solve_triangular_upper(&lhs, &rhs)?;
    }
    y.add_diagonal(Complex128::ONE);
    Ok(y)
}

/// Overwrite the diagonal and first superdiagonal of U ≈ T0^p exactly
fn restore_power_entries(u: &mut Mat<Complex128>, t0: &Mat<Complex128>, p: f64) {
    let n = t0.rows();
    for j in 0..n {
        u[(j, j)] = t0[(j, j)].powf(p);
    }
    for j in 0..n.saturating_sub(1) {
        u[(j, j + 1)] =
            fractional_power_superdiag_entry(t0[(j, j)], t0[(j + 1, j + 1)], t0[(j, j + 1)], p);
    }
}

/// T^t for upper triangular T with nonzero diagonal and t ∈ (−1, 1)
pub(crate) fn remainder_power_triu<B: LinearAlgebraAlgorithms>(
    backend: &B,
    t0: &Mat<Complex128>,
    t: f64,
) -> Result<Mat<Complex128>> {
    if t0.is_diagonal() {
        return Ok(Mat::from_diagonal(
            &t0.diagonal().iter().map(|d| d.powf(t)).collect::<Vec<_>>(),
        ));
    }

    let ssq = inverse_squaring(t0, &POWER_THETA)?;
    let neg_r = ssq.r.scale(-1.0);
    let mut u = fractional_power_pade(backend, &neg_r, t, ssq.m)?;

    let principal = has_principal_branch(&t0.diagonal());
    for i in (0..=ssq.s).rev() {
        if i < ssq.s {
            u = u.matmul(&u);
        }
        if principal {
            restore_power_entries(&mut u, t0, t * (-(i as f64)).exp2());
        }
    }
    Ok(u)
}

/// Condition number κ₁(A) = ‖A‖₁‖A⁻¹‖₁, infinite when A is singular
fn condition_number<B: LinearAlgebraAlgorithms>(backend: &B, a: &Mat<Complex128>) -> Result<f64> {
    Ok(match tolerate_numerical(backend.inverse(a))? {
        Some(inv) => a.norm1() * inv.norm1(),
        None => f64::INFINITY,
    })
}

/// A^b for |b| < 1 on the Schur form; `None` when T is singular
fn remainder_power<B: LinearAlgebraAlgorithms>(
    backend: &B,
    form: &SchurForm,
    b: f64,
) -> Result<Option<Mat<Complex128>>> {
    if form.singular() {
        return Ok(None);
    }
    match tolerate_numerical(remainder_power_triu(backend, form.t(), b))? {
        Some(u) => Ok(Some(form.schur.back_transform(&u))),
        None => Ok(None),
    }
}

pub(crate) fn fractional_matrix_power_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    p: f64,
) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    if !p.is_finite() {
        return Err(Error::invalid_argument("p", format!("exponent must be finite, got {p}")));
    }
    let n = a.rows();
    if n == 0 {
        return Ok(a.clone());
    }
    if p == p.trunc() && p.abs() < i64::MAX as f64 {
        return matrix_power_impl(backend, a, p as i64);
    }

    let Some(form) = tolerate_numerical(SchurForm::new(backend, a))? else {
        return Ok(Matrix::nan(n, n, a.dtype()));
    };
    let domain = OutputDomain::PrincipalBranch;
    let ac = a.to_complex_mat();

    let kappa = condition_number(backend, &ac)?;
    if kappa.is_finite() && !form.singular() {
        let p1 = p - p.floor();
        let p2 = p - p.ceil();
        let (int_part, frac) = if p1 * kappa.powf(1.0 - p1) <= -p2 * kappa {
            (p.floor(), p1)
        } else {
            (p.ceil(), p2)
        };
        debug!(p, kappa, int_part, frac, "fractional power split");

        if let Some(r) = remainder_power(backend, &form, frac)? {
            if let Some(q) = matrix_power_mat(backend, &ac, int_part as i64)? {
                return Ok(form.finish(q.matmul(&r), domain));
            }
        }
    }

    // Singular (or numerically singular) A
    if p < 0.0 {
        return Ok(form.undefined(domain));
    }
    debug!(p, "fractional power of a singular matrix via schur-parlett");
    let frac = p - p.floor();
    let mut schur = form.schur.clone();
    let Some(tri) = tolerate_numerical(parlett_schur(&mut schur, &Power(frac)))? else {
        return Ok(form.undefined(domain));
    };
    let r = schur.back_transform(&tri.f);
    let Some(q) = matrix_power_mat(backend, &ac, p.floor() as i64)? else {
        return Ok(form.undefined(domain));
    };
    Ok(form.finish(q.matmul(&r), domain))
}
