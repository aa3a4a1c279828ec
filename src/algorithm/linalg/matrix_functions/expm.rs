//! Matrix exponential by scaling and squaring
//!
//! exp(A) = (exp(2⁻ˢA))^(2ˢ) with the inner exponential from a diagonal Padé
//! approximant r_m = (V − U)⁻¹(V + U). The degree and s come from
//! [`choose_pade_for`]. Upper triangular input keeps its diagonal and first
//! superdiagonal exact through the squaring phase. The computation stays in
//! the input dtype.

use super::pade::{choose_pade_for, pade_terms};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::{Complex128, DType, Element};
use crate::error::{Error, Result};
use crate::matrix::{Mat, Matrix, MatrixData};
use tracing::debug;

/// Default number of terms of the truncated Taylor exponential
pub const DEFAULT_TAYLOR_TERMS: usize = 20;

/// exp of a typed square matrix
///
/// Returns an all-NaN matrix for non-finite input, an out-of-range norm or a
/// singular Padé denominator.
pub(crate) fn expm_mat<T, B>(backend: &B, a: &Mat<T>) -> Result<Mat<T>>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let n = a.rows();
    if n == 0 {
        return Ok(a.clone());
    }
    if !a.is_finite() {
        return Ok(Mat::nan(n, n));
    }
    if a.is_zero() {
        return Ok(Mat::identity(n));
    }
    if n == 1 {
        return Ok(Mat::from_vec(1, 1, vec![T::from_complex(a[(0, 0)].to_complex().exp())]));
    }

    let Some(choice) = choose_pade_for(a) else {
        debug!(norm = backend.norm1(a), "expm: norm out of range");
        return Ok(Mat::nan(n, n));
    };
    debug!(
        degree = choice.entry.degree,
        squarings = choice.squarings,
        "expm pade selection"
    );

    let scaled = if choice.squarings > 0 {
        a.scale((-(choice.squarings as f64)).exp2())
    } else {
        a.clone()
    };
    let terms = pade_terms(&scaled, None, &choice.entry);

    let lu = match backend.lu_decompose(&(&terms.v - &terms.u)) {
        Ok(lu) => lu,
        Err(Error::SingularMatrix) => return Ok(Mat::nan(n, n)),
        Err(e) => return Err(e),
    };
    let mut r = lu.solve(&(&terms.u + &terms.v))?;
    if choice.squarings > 0 && a.is_upper_triangular() {
        r = square_triangular(r, a, choice.squarings);
    } else {
        for _ in 0..choice.squarings {
            r = r.matmul(&r);
        }
    }

    if !r.is_finite() {
        return Ok(Mat::nan(n, n));
    }
    Ok(r)
}

/// Squaring phase for upper triangular A (Al-Mohy & Higham 2009, Code
/// Fragment 2.1)
///
/// `x` approximates exp(2⁻ˢA). Before each squaring level i the diagonal is
/// reset to exp(2⁻ⁱ a_kk), and after it the first superdiagonal is set from
/// the closed form of the 2×2 exponential.
fn square_triangular<T: Element>(mut x: Mat<T>, a: &Mat<T>, squarings: u32) -> Mat<T> {
    let n = a.rows();
    let diag: Vec<Complex128> = a.diagonal().into_iter().map(Element::to_complex).collect();
    let superdiag: Vec<Complex128> = (0..n - 1).map(|k| a[(k, k + 1)].to_complex()).collect();

    let scale = (-(squarings as f64)).exp2();
    for (k, d) in diag.iter().enumerate() {
        x[(k, k)] = T::from_complex(d.scale(scale).exp());
    }
    for level in (0..squarings).rev() {
        x = x.matmul(&x);
        let scale = (-(level as f64)).exp2();
        for (k, d) in diag.iter().enumerate() {
            x[(k, k)] = T::from_complex(d.scale(scale).exp());
        }
        for (k, t) in superdiag.iter().enumerate() {
            x[(k, k + 1)] = T::from_complex(exp_superdiagonal(
                diag[k].scale(scale),
                diag[k + 1].scale(scale),
                t.scale(scale),
            ));
        }
    }
    x
}

/// (0, 1) entry of exp([[λ₁, t], [0, λ₂]])
///
/// t·(e^λ₁ − e^λ₂)/(λ₁ − λ₂) cancels badly for close λ; the sinch form does not.
fn exp_superdiagonal(l1: Complex128, l2: Complex128, t: Complex128) -> Complex128 {
    let mean = (l1 + l2).scale(0.5);
    let half_gap = (l1 - l2).scale(0.5);
    t * mean.exp() * sinch(half_gap)
}

/// sinh(z)/z
fn sinch(z: Complex128) -> Complex128 {
    if z.magnitude() < 0.0135 {
        let z2 = z * z;
        let inner = Complex128::ONE + z2.scale(1.0 / 42.0);
        let middle = Complex128::ONE + z2.scale(1.0 / 20.0) * inner;
        Complex128::ONE + z2.scale(1.0 / 6.0) * middle
    } else {
        z.sinh() / z
    }
}

/// exp of a dtype-erased matrix
pub(crate) fn expm_impl<B: LinearAlgebraAlgorithms>(backend: &B, a: &Matrix) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    Ok(match a.data() {
        MatrixData::F64(m) => expm_mat(backend, m)?.into(),
        MatrixData::Complex128(m) => expm_mat(backend, m)?.into(),
    })
}

/// Σ_{k<terms} A^k / k!
fn expm_taylor_mat<T: Element>(a: &Mat<T>, terms: usize) -> Mat<T> {
    let n = a.rows();
    if terms == 0 {
        return Mat::zeros(n, n);
    }
    let mut sum = Mat::identity(n);
    let mut term = Mat::identity(n);
    for k in 1..terms {
        term = term.matmul(a).scale(1.0 / k as f64);
        sum = &sum + &term;
    }
    sum
}

/// Truncated Taylor exponential, for cross-checking the Padé exponential
pub(crate) fn expm_taylor_impl(a: &Matrix, terms: usize) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    let result: Matrix = match a.data() {
        MatrixData::F64(m) => expm_taylor_mat(m, terms).into(),
        MatrixData::Complex128(m) => expm_taylor_mat(m, terms).into(),
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Ok(Matrix::nan(a.rows(), a.cols(), a.dtype()))
    }
}

/// Unit upper triangular X whose column k is an eigenvector of T for t_kk
///
/// `None` when T has a repeated eigenvalue with a nonzero coupling, i.e. no
/// eigenvector basis from back substitution.
fn triangular_eigenvectors(t: &Mat<Complex128>) -> Option<Mat<Complex128>> {
    let n = t.rows();
    let mut x = Mat::identity(n);
    for k in 1..n {
        let lambda = t[(k, k)];
        for i in (0..k).rev() {
            let sum = ((i + 1)..=k).fold(Complex128::ZERO, |acc, j| acc + t[(i, j)] * x[(j, k)]);
            let denom = t[(i, i)] - lambda;
            x[(i, k)] = if denom != Complex128::ZERO {
                -(sum / denom)
            } else if sum == Complex128::ZERO {
                Complex128::ZERO
            } else {
                return None;
            };
        }
    }
    Some(x)
}

/// exp(A) = V·exp(Λ)·V⁻¹ from the eigendecomposition
///
/// The eigenvectors of the Schur factor T come from back substitution, so
/// exp(T) = X·exp(Λ)·X⁻¹ and exp(A) = Z·exp(T)·Zᴴ. Accuracy degrades with the
/// conditioning of the eigenvector basis; a defective A gives all-NaN. Real
/// input gives the real part.
pub(crate) fn expm_eig_impl<B: LinearAlgebraAlgorithms>(backend: &B, a: &Matrix) -> Result<Matrix> {
    validate_square_matrix(a.shape())?;
    let n = a.rows();
    let dtype = a.dtype();
    if n == 0 {
        return Ok(a.clone());
    }
    if !a.is_finite() {
        return Ok(Matrix::nan(n, n, dtype));
    }

    let schur = backend.schur_decompose(&a.to_complex_mat())?;
    let Some(x) = triangular_eigenvectors(&schur.t) else {
        debug!(n, "expm_eig: no eigenvector basis");
        return Ok(Matrix::nan(n, n, dtype));
    };
    let exp_lambda: Vec<Complex128> = schur.eigenvalues().iter().map(|l| l.exp()).collect();
    let x_inv = backend.solve_triangular_upper(&x, &Mat::identity(n))?;
    let x_lambda = Mat::from_fn(n, n, |i, j| x[(i, j)] * exp_lambda[j]);
    let f = schur.back_transform(&x_lambda.matmul(&x_inv));

    if !f.is_finite() {
        return Ok(Matrix::nan(n, n, dtype));
    }
    Ok(match dtype {
        DType::F64 => f.real_part().into(),
        DType::Complex128 => f.into(),
    })
}

/// exp(i·A) for a complex copy of `a`
pub(crate) fn expm_i<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Mat<Complex128>,
    sign: f64,
) -> Result<Mat<Complex128>> {
    let ia = a.scale_by(Complex128::new(0.0, sign));
    expm_mat(backend, &ia)
}
