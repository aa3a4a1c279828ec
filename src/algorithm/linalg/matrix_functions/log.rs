//! Principal matrix logarithm by inverse scaling and squaring
//!
//! On the Schur factor: take square roots until T^(1/2^s) is close to I,
//! apply a Gauss–Legendre partial-fraction Padé approximant to
//! log(I + R), scale by 2^s and restore the diagonal and superdiagonal from
//! the exact scalar formulas.

use super::expm::expm_impl;
use super::inverse_ssq::{inverse_squaring, logm_superdiag_entry};
use super::quadrature::gauss_legendre_unit;
use super::spectrum::{OutputDomain, SchurForm, has_principal_branch, tolerate_numerical};
use super::types::{Diagnostics, EstimatedMatrix};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::Complex128;
use crate::error::Result;
use crate::matrix::{Mat, Matrix};
use tracing::{debug, warn};

/// Padé error bounds θ_m for m = 1..=16
const LOGM_THETA: [f64; 16] = [
    1.59e-5, 2.31e-3, 1.94e-2, 6.21e-2, 1.28e-1, 2.06e-1, 2.88e-1, 3.67e-1, 4.39e-1, 5.03e-1,
    5.60e-1, 6.09e-1, 6.52e-1, 6.89e-1, 7.21e-1, 7.49e-1,
];

/// Value substituted for exactly zero diagonal entries of T
const NEARLY_SINGULAR: f64 = 1e-20;

/// Relative residual above which the plain entry point warns
const LOGM_TOLERANCE: f64 = 1e3 * f64::EPSILON;

/// Replace exact zeros on the diagonal of T by a tiny value
///
/// log of a singular matrix does not exist; this yields a finite but huge
/// result instead of -inf everywhere.
fn force_nonsingular(t: &mut Mat<Complex128>) {
    let n = t.rows();
    let mut replaced = 0usize;
    let mut tiny = 0usize;
    for i in 0..n {
        let d = t[(i, i)];
        if d == Complex128::ZERO {
            t[(i, i)] = Complex128::new(NEARLY_SINGULAR, 0.0);
            replaced += 1;
        } else if d.magnitude() < NEARLY_SINGULAR {
            tiny += 1;
        }
    }
    if replaced > 0 || tiny > 0 {
        debug!(replaced, tiny, "logm: matrix is singular or nearly singular");
    }
}

/// log(T) for upper triangular T with a nonzero diagonal
pub(crate) fn logm_triu<B: LinearAlgebraAlgorithms>(
    backend: &B,
    t0: &Mat<Complex128>,
) -> Result<Mat<Complex128>> {
    let n = t0.rows();
    let ssq = inverse_squaring(t0, &LOGM_THETA)?;

    // U = 2^s Σ w_j (I + x_j R)⁻¹ R
    let mut u = Mat::zeros(n, n);
    for (node, weight) in gauss_legendre_unit(ssq.m) {
        let mut lhs = ssq.r.scale(node);
        lhs.add_diagonal(Complex128::ONE);
        let rhs = ssq.r.scale(weight);
        u = &u + &backend.solve_triangular_upper(&lhs, &rhs)?;
    }
    u = u.scale((ssq.s as f64).exp2());

    let diag0 = t0.diagonal();
    if has_principal_branch(&diag0) {
        for (j, d) in diag0.iter().enumerate() {
            u[(j, j)] = d.ln();
        }
        for j in 0..n.saturating_sub(1) {
            u[(j, j + 1)] = logm_superdiag_entry(diag0[j], diag0[j + 1], t0[(j, j + 1)]);
        }
    }
    Ok(u)
}

/// ‖expm(L) − A‖₁ / ‖A‖₁
fn logm_residual<B: LinearAlgebraAlgorithms>(backend: &B, l: &Matrix, a: &Matrix) -> Result<f64> {
    let e = expm_impl(backend, l)?;
    let residual = e.sub(a)?.norm1();
    let norm = a.norm1();
    Ok(if norm == 0.0 { residual } else { residual / norm })
}

pub(crate) fn logm_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    diagnostics: Diagnostics,
) -> Result<EstimatedMatrix> {
    validate_square_matrix(a.shape())?;
    if a.rows() == 0 {
        return Ok(EstimatedMatrix {
            matrix: a.clone(),
            error_estimate: 0.0,
        });
    }

    let Some(mut form) = tolerate_numerical(SchurForm::new(backend, a))? else {
        return Ok(EstimatedMatrix {
            matrix: Matrix::nan(a.rows(), a.cols(), a.dtype()),
            error_estimate: f64::NAN,
        });
    };
    let domain = OutputDomain::PrincipalBranch;

    force_nonsingular(&mut form.schur.t);
    let matrix = match tolerate_numerical(logm_triu(backend, form.t()))? {
        Some(u) => form.finish(form.schur.back_transform(&u), domain),
        None => form.undefined(domain),
    };

    let error_estimate = if matrix.is_finite() {
        logm_residual(backend, &matrix, a)?
    } else {
        f64::NAN
    };
    if diagnostics.enabled() && !(error_estimate.is_finite() && error_estimate < LOGM_TOLERANCE) {
        warn!(error_estimate, "logm result may be inaccurate");
    }
    Ok(EstimatedMatrix {
        matrix,
        error_estimate,
    })
}
