//! Schur forms prepared for matrix-function evaluation
//!
//! Every Schur-based function starts from [`SchurForm::new`] and ends with
//! [`SchurForm::finish`], which decides the output dtype. The computed Schur
//! diagonal is cleaned first: eigenvalues at roundoff level are set to zero
//! so that singularity is recognised, and for real input roundoff-level
//! imaginary parts and negative real parts are dropped so that a real
//! spectrum is recognised as real.

use crate::algorithm::linalg::{ComplexSchurDecomposition, LinearAlgebraAlgorithms};
use crate::dtype::{Complex128, DType};
use crate::error::Result;
use crate::matrix::{Mat, Matrix};
use tracing::debug;

/// Multiple of eps·‖T‖₁ below which a Schur diagonal component is roundoff
const SPECTRUM_SNAP_FACTOR: f64 = 100.0;

/// Imaginary parts below `REAL_RESULT_TOLERANCE·max(1, max|F|)` are dropped
/// when deciding whether a computed function value is real
const REAL_RESULT_TOLERANCE: f64 = 1e6 * f64::EPSILON;

/// How the output dtype of a Schur-based evaluation is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputDomain {
    /// Real iff the input is real and every eigenvalue is real and
    /// non-negative (functions with a branch cut on the negative axis)
    PrincipalBranch,
    /// Real iff the input is real, every eigenvalue is real and the computed
    /// value has negligible imaginary part (general scalar functions)
    RealSpectrum,
}

/// Complex Schur form of a square input plus what is known about its
/// spectrum
#[derive(Debug, Clone)]
pub(crate) struct SchurForm {
    pub schur: ComplexSchurDecomposition,
    pub real_input: bool,
}

impl SchurForm {
    /// Triangularize `a`
    ///
    /// Upper triangular input is used as is with Z = I.
    pub fn new<B: LinearAlgebraAlgorithms>(backend: &B, a: &Matrix) -> Result<Self> {
        let m = a.to_complex_mat();
        let real_input = a.dtype() == DType::F64;

        if m.is_upper_triangular() {
            let n = m.rows();
            return Ok(Self {
                schur: ComplexSchurDecomposition {
                    z: Mat::identity(n),
                    t: m,
                },
                real_input,
            });
        }

        let mut schur = backend.schur_decompose(&m)?;
        snap_spectrum(&mut schur.t, real_input);
        Ok(Self { schur, real_input })
    }

    /// Matrix order
    #[inline]
    pub fn order(&self) -> usize {
        self.schur.order()
    }

    /// Schur factor T
    #[inline]
    pub fn t(&self) -> &Mat<Complex128> {
        &self.schur.t
    }

    /// Eigenvalues along the diagonal of T
    pub fn eigenvalues(&self) -> Vec<Complex128> {
        self.schur.eigenvalues()
    }

    /// True when every eigenvalue is exactly real
    pub fn real_spectrum(&self) -> bool {
        self.eigenvalues().iter().all(|z| z.im == 0.0)
    }

    /// True when some eigenvalue is exactly zero
    pub fn singular(&self) -> bool {
        self.eigenvalues().iter().any(|&z| z == Complex128::ZERO)
    }

    /// Whether the result will be reported as real
    fn real_output(&self, domain: OutputDomain, f: Option<&Mat<Complex128>>) -> bool {
        if !self.real_input {
            return false;
        }
        match domain {
            OutputDomain::PrincipalBranch => self
                .eigenvalues()
                .iter()
                .all(|z| z.im == 0.0 && z.re >= 0.0),
            OutputDomain::RealSpectrum => {
                self.real_spectrum()
                    && f.is_none_or(|f| {
                        f.max_imag() <= REAL_RESULT_TOLERANCE * f.max_abs().max(1.0)
                    })
            }
        }
    }

    /// Dtype of an all-NaN result for this input
    pub fn nan_dtype(&self, domain: OutputDomain) -> DType {
        if self.real_output(domain, None) {
            DType::F64
        } else {
            DType::Complex128
        }
    }

    /// All-NaN result for this input
    pub fn undefined(&self, domain: OutputDomain) -> Matrix {
        let n = self.order();
        Matrix::nan(n, n, self.nan_dtype(domain))
    }

    /// Wrap a full (back-transformed) function value
    ///
    /// Non-finite values become all-NaN.
    pub fn finish(&self, f: Mat<Complex128>, domain: OutputDomain) -> Matrix {
        if !f.is_finite() {
            return self.undefined(domain);
        }
        if self.real_output(domain, Some(&f)) {
            f.real_part().into()
        } else {
            f.into()
        }
    }
}

/// True when no eigenvalue lies on the closed negative real axis
pub(crate) fn has_principal_branch(eigenvalues: &[Complex128]) -> bool {
    eigenvalues.iter().all(|z| z.re > 0.0 || z.im != 0.0)
}

/// Zero out roundoff-level entries on the diagonal of a computed Schur factor
///
/// Eigenvalues of magnitude at most the tolerance become exactly zero. For
/// real input, small imaginary parts and small negative real parts are also
/// dropped.
fn snap_spectrum(t: &mut Mat<Complex128>, real_input: bool) {
    let tol = SPECTRUM_SNAP_FACTOR * f64::EPSILON * t.norm1();
    let mut snapped = 0usize;
    for i in 0..t.rows() {
        let z = t[(i, i)];
        let mut w = if z.magnitude() <= tol { Complex128::ZERO } else { z };
        if real_input {
            if w.im != 0.0 && w.im.abs() <= tol {
                w.im = 0.0;
            }
            if w.im == 0.0 && w.re < 0.0 && -w.re <= tol {
                w.re = 0.0;
            }
        }
        if w != z {
            t[(i, i)] = w;
            snapped += 1;
        }
    }
    if snapped > 0 {
        debug!(snapped, tol, "snapped roundoff-level Schur diagonal entries");
    }
}

/// Turn a numerical breakdown into `None` and pass other errors through
///
/// Singular systems, missing square roots and non-convergence make the
/// function value undefined rather than the call invalid.
pub(crate) fn tolerate_numerical<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_numerical() => {
            debug!(error = %e, "matrix function undefined");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
