//! Matrix function operations (funm, expm, logm, sqrtm, signm, powers)
//!
//! Matrix functions extend scalar functions to matrices. For a scalar function `f`
//! and a diagonalizable matrix `A = V @ diag(λ) @ V^{-1}`, the matrix function is:
//!
//! `f(A) = V @ diag(f(λ)) @ V^{-1}`
//!
//! For general matrices the complex Schur decomposition is used:
//! `A = Z @ T @ Z^H`, then `f(A) = Z @ f(T) @ Z^H`
//!
//! where f(T) is computed by recurrences on the triangular factor.

use super::linear_algebra::LinearAlgebraAlgorithms;
use crate::algorithm::linalg::matrix_functions::{
    self as mf, Diagnostics, EstimatedMatrix, FrechetOptions, FrechetResult, ScalarFunction,
    SqrtmOptions, TrigFunction,
};
use crate::error::Result;
use crate::matrix::Matrix;

/// Trait for matrix function operations
///
/// Blanket-implemented for every [`LinearAlgebraAlgorithms`] back-end, so
/// `client.logm(&a)` works for any client.
///
/// # Failure Model
///
/// - Invalid shapes or arguments are returned as `Err`.
/// - A function that is undefined at `A` (no square root, eigenvalue on a
///   branch cut or on the imaginary axis for `signm`), or whose iteration does
///   not converge, yields an all-NaN matrix.
/// - Ill-conditioned results are returned with a large error estimate; the
///   plain entry points also emit a `tracing::warn!`.
///
/// # Output Dtype
///
/// Complex input always gives complex output. Real input to a Schur-based
/// function gives real output when the spectrum is real (and, for `logm`,
/// `sqrtm` and non-integer powers, non-negative). `expm`, `expm_frechet`,
/// integer powers and the trigonometric functions keep the input dtype.
///
/// # Use Cases
///
/// - **expm**: Solving linear ODEs `dx/dt = Ax` → `x(t) = e^{At} x(0)`
/// - **logm**: Generators of Markov chains and rotations
/// - **sqrtm**: Polar decomposition, control theory
/// - **expm_frechet**: Sensitivity and condition estimation of `expm`
pub trait MatrixFunctionsAlgorithms: LinearAlgebraAlgorithms + Sized {
    /// Matrix function f(A) for an analytic scalar function
    ///
    /// Uses the block Schur–Parlett algorithm:
    /// 1. Complex Schur decomposition `A = Z @ T @ Z^H`
    /// 2. Cluster eigenvalues closer than 0.1 (relative for |λ| < 1) and
    ///    reorder T so each cluster is a contiguous diagonal block
    /// 3. Diagonal blocks by Taylor series about the cluster mean
    /// 4. Off-diagonal blocks from `T_ii X − X T_jj = C` (Sylvester)
    ///
    /// Closures `Fn(Complex128) -> Complex128` work directly; their Taylor
    /// coefficients are recovered numerically. The built-ins ([`Exp`], [`Log`],
    /// [`Sqrt`], [`Power`], …) supply exact ones.
    ///
    /// [`Exp`]: mf::Exp
    /// [`Log`]: mf::Log
    /// [`Sqrt`]: mf::Sqrt
    /// [`Power`]: mf::Power
    fn funm<F: ScalarFunction + ?Sized>(&self, a: &Matrix, f: &F) -> Result<Matrix> {
        Ok(mf::funm_impl(self, a, f, Diagnostics::Warn)?.matrix)
    }

    /// [`funm`](Self::funm) with its relative error estimate
    ///
    /// The estimate is `eps / min_sep · ‖strict_upper(T)‖₁` clamped to
    /// `[eps, 1]`, where `min_sep` is the smallest Sylvester denominator.
    fn funm_with_estimate<F: ScalarFunction + ?Sized>(
        &self,
        a: &Matrix,
        f: &F,
    ) -> Result<EstimatedMatrix> {
        mf::funm_impl(self, a, f, Diagnostics::Silent)
    }

    /// Matrix sign function: sign(A)
    ///
    /// S with S² = I whose eigenvalues are the signs of the real parts of
    /// the eigenvalues of A. Undefined (all-NaN) when an eigenvalue lies on
    /// the imaginary axis.
    ///
    /// Evaluated by Schur–Parlett; a poor estimate triggers the Newton
    /// iteration:
    /// ```text
    /// S_0 = A + (0.5/‖A‖₁) I
    /// REPEAT:
    ///   S_{k+1} = (S_k + S_k^{-1}) / 2
    /// UNTIL ‖P² − P‖₁ small, P = (S² + S)/2
    /// ```
    fn signm(&self, a: &Matrix) -> Result<Matrix> {
        Ok(mf::signm_impl(self, a, Diagnostics::Warn)?.matrix)
    }

    /// [`signm`](Self::signm) with its error estimate
    fn signm_with_estimate(&self, a: &Matrix) -> Result<EstimatedMatrix> {
        mf::signm_impl(self, a, Diagnostics::Silent)
    }

    /// Matrix logarithm: log(A) (principal branch)
    ///
    /// Inverse scaling and squaring on the Schur factor (Al-Mohy & Higham
    /// 2012): square roots bring T near I, a Gauss–Legendre Padé form
    /// evaluates log(I + R), and the result is scaled back by 2^s.
    ///
    /// Exactly singular input is perturbed to a tiny diagonal (1e-20), which
    /// gives a finite but inaccurate result and a warning.
    fn logm(&self, a: &Matrix) -> Result<Matrix> {
        Ok(mf::logm_impl(self, a, Diagnostics::Warn)?.matrix)
    }

    /// [`logm`](Self::logm) with the estimate `‖expm(L) − A‖₁ / ‖A‖₁`
    fn logm_with_estimate(&self, a: &Matrix) -> Result<EstimatedMatrix> {
        mf::logm_impl(self, a, Diagnostics::Silent)
    }

    /// Matrix square root: A^{1/2} (principal branch)
    ///
    /// Blocked Schur method (Deadman, Higham & Ralha 2013). The result does
    /// not depend on `options.block_size` beyond rounding. A singular A with
    /// no square root (e.g. a nilpotent Jordan block) yields all-NaN.
    fn sqrtm(&self, a: &Matrix, options: &SqrtmOptions) -> Result<Matrix> {
        Ok(mf::sqrtm_impl(self, a, options, Diagnostics::Warn)?.matrix)
    }

    /// [`sqrtm`](Self::sqrtm) with the estimate `‖X² − A‖_F / ‖A‖_F`
    fn sqrtm_with_estimate(&self, a: &Matrix, options: &SqrtmOptions) -> Result<EstimatedMatrix> {
        mf::sqrtm_impl(self, a, options, Diagnostics::Silent)
    }

    /// Real matrix power A^p (principal branch)
    ///
    /// Integer p is delegated to [`matrix_power`](Self::matrix_power).
    /// Otherwise p = a + b with integer a and |b| < 1 chosen from the
    /// condition number, and A^b uses the Schur–Padé algorithm of Higham &
    /// Lin. For singular A, negative p gives all-NaN and non-negative p
    /// falls back to Schur–Parlett.
    fn fractional_matrix_power(&self, a: &Matrix, p: f64) -> Result<Matrix> {
        mf::fractional_matrix_power_impl(self, a, p)
    }

    /// Integer matrix power A^k by binary powering
    ///
    /// Negative k uses the inverse; a singular A then gives all-NaN.
    fn matrix_power(&self, a: &Matrix, k: i64) -> Result<Matrix> {
        mf::matrix_power_impl(self, a, k)
    }

    /// Matrix exponential: e^A
    ///
    /// Scaling and squaring with a Padé approximant of degree 3, 5, 7, 9 or
    /// 13 (Higham 2005):
    /// ```text
    /// s = max(0, ceil(log2(‖A‖₁ / ℓ₁₃)))
    /// e^A ≈ r_m(2^{-s} A)^{2^s},  r_m = (V − U)^{-1} (V + U)
    /// ```
    ///
    /// # Properties
    ///
    /// - `exp(0) = I` (identity)
    /// - `exp(A + B) = exp(A) @ exp(B)` if `AB = BA`
    /// - `det(exp(A)) = e^{tr(A)}`
    /// - `exp(A)^{-1} = exp(-A)`
    fn expm(&self, a: &Matrix) -> Result<Matrix> {
        mf::expm_impl(self, a)
    }

    /// Fréchet derivative of the exponential: L(A, E)
    ///
    /// `options.method` selects scaling-Padé-squaring (default) or block
    /// enlargement; `options.compute_expm` also returns e^A.
    fn expm_frechet(
        &self,
        a: &Matrix,
        e: &Matrix,
        options: &FrechetOptions,
    ) -> Result<FrechetResult> {
        mf::expm_frechet_impl(self, a, e, options)
    }

    /// Truncated Taylor exponential `Σ_{k<terms} A^k / k!`
    ///
    /// Accurate only for small ‖A‖; intended as a cross-check of
    /// [`expm`](Self::expm).
    fn expm_taylor(&self, a: &Matrix, terms: usize) -> Result<Matrix> {
        mf::expm_taylor_impl(a, terms)
    }

    /// Exponential from the eigendecomposition, `V @ diag(e^λ) @ V^{-1}`
    ///
    /// Much less robust than [`expm`](Self::expm): the error grows with the
    /// condition number of the eigenvector basis, and a defective A yields
    /// all-NaN. Intended as a cross-check.
    fn expm_eig(&self, a: &Matrix) -> Result<Matrix> {
        mf::expm_eig_impl(self, a)
    }

    /// Matrix cosine
    fn cosm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Cos)
    }

    /// Matrix sine
    fn sinm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Sin)
    }

    /// Matrix tangent, `cos(A)^{-1} sin(A)`
    fn tanm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Tan)
    }

    /// Hyperbolic matrix cosine
    fn coshm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Cosh)
    }

    /// Hyperbolic matrix sine
    fn sinhm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Sinh)
    }

    /// Hyperbolic matrix tangent, `cosh(A)^{-1} sinh(A)`
    fn tanhm(&self, a: &Matrix) -> Result<Matrix> {
        mf::trig_impl(self, a, TrigFunction::Tanh)
    }
}

impl<B: LinearAlgebraAlgorithms> MatrixFunctionsAlgorithms for B {}
