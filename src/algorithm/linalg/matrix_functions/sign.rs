//! Matrix sign function
//!
//! Evaluated by Schur–Parlett with a sign function that refuses to cluster
//! eigenvalues across the imaginary axis. When the Parlett estimate is poor
//! the result seeds a Newton iteration S ← (S + S⁻¹)/2 started from a
//! slightly shifted A.

use super::parlett::parlett_schur;
use super::scalar::Sign;
use super::spectrum::{OutputDomain, SchurForm, tolerate_numerical};
use super::types::{Diagnostics, EstimatedMatrix};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::Complex128;
use crate::error::Result;
use crate::matrix::{Mat, Matrix};
use tracing::{debug, warn};

/// Eigenvalues within this multiple of eps·max|λ| of the imaginary axis make
/// the sign undefined
const SIGN_THRESHOLD_FACTOR: f64 = 1e3;

/// Error estimate below which the Parlett result is accepted
const SIGN_TOLERANCE: f64 = 1e3 * f64::EPSILON;

/// Newton iteration budget
pub const MAX_SIGN_NEWTON_ITERATIONS: usize = 100;

pub(crate) fn signm_impl<B: LinearAlgebraAlgorithms>(
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
    let domain = OutputDomain::RealSpectrum;

    let spectral_radius = form
        .eigenvalues()
        .iter()
        .map(|z| z.magnitude())
        .fold(0.0, f64::max);
    let sign = Sign {
        threshold: SIGN_THRESHOLD_FACTOR * f64::EPSILON * spectral_radius,
    };

    let parlett = tolerate_numerical(parlett_schur(&mut form.schur, &sign))?;
    let Some(tri) = parlett.filter(|tri| tri.f.is_finite()) else {
        if diagnostics.enabled() {
            warn!("signm: an eigenvalue lies on the imaginary axis; sign is undefined");
        }
        return Ok(EstimatedMatrix {
            matrix: form.undefined(domain),
            error_estimate: f64::NAN,
        });
    };

    let s0 = form.schur.back_transform(&tri.f);
    if tri.error_estimate < SIGN_TOLERANCE {
        return Ok(EstimatedMatrix {
            matrix: form.finish(s0, domain),
            error_estimate: tri.error_estimate,
        });
    }

    debug!(
        error_estimate = tri.error_estimate,
        "signm: falling back to Newton iteration"
    );
    let (s, error_estimate) = sign_newton(backend, &a.to_complex_mat(), tri.error_estimate)?;
    if diagnostics.enabled() && !(error_estimate < SIGN_TOLERANCE) {
        warn!(error_estimate, "signm result may be inaccurate");
    }
    Ok(EstimatedMatrix {
        matrix: form.finish(s, domain),
        error_estimate,
    })
}

/// Newton iteration for sign(A) from S₀ = A + (0.5/‖A‖₁)·I
///
/// The estimate is ‖P² − P‖₁ for the projector P = (S² + S)/2. Stops when the
/// estimate drops below tolerance or stagnates. A singular iterate returns
/// NaN.
fn sign_newton<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Mat<Complex128>,
    initial_estimate: f64,
) -> Result<(Mat<Complex128>, f64)> {
    let n = a.rows();
    let norm = a.norm1();
    let mut s = a.clone();
    if norm > 0.0 {
        s.add_diagonal(Complex128::new(0.5 / norm, 0.0));
    }

    let mut prev = initial_estimate;
    let mut estimate = initial_estimate;
    for iteration in 0..MAX_SIGN_NEWTON_ITERATIONS {
        let Some(inv) = tolerate_numerical(backend.inverse(&s))? else {
            return Ok((Mat::nan(n, n), f64::NAN));
        };
        s = Mat::linear_combination(&[(0.5, &s), (0.5, &inv)]);
        let s2 = s.matmul(&s);
        let p = Mat::linear_combination(&[(0.5, &s2), (0.5, &s)]);
        estimate = (&p.matmul(&p) - &p).norm1();
        if estimate < SIGN_TOLERANCE || estimate == prev {
            debug!(iterations = iteration + 1, estimate, "signm newton stopped");
            break;
        }
        prev = estimate;
    }
    Ok((s, estimate))
}
