//! Core linear algebra algorithm trait
//!
//! Defines the contract the matrix-function layer relies on. The matrix
//! functions never touch a decomposition kernel directly; they only call
//! through this trait, so any back-end that implements it gets every matrix
//! function for free.

use super::super::decompositions::*;
use crate::dtype::{Complex128, Element};
use crate::error::Result;
use crate::matrix::Mat;

/// Algorithmic contract for the linear algebra a matrix function needs
///
/// # Implementation Requirements
///
/// Backends may differ in:
/// - Parallelization strategy
/// - Memory access patterns (blocking, tiling)
///
/// Backends MUST match in:
/// - Pivot selection criteria (partial pivoting for LU)
/// - Special case handling: an exactly zero pivot is [`Error::SingularMatrix`],
///   an exhausted iteration budget is [`Error::NoConvergence`]
///
/// [`Error::SingularMatrix`]: crate::error::Error::SingularMatrix
/// [`Error::NoConvergence`]: crate::error::Error::NoConvergence
pub trait LinearAlgebraAlgorithms: Send + Sync {
    /// Complex Schur decomposition: A = Z @ T @ Z^H
    ///
    /// T must be exactly upper triangular (entries below the diagonal are 0).
    /// An input that is already upper triangular must come back unchanged with
    /// Z = I.
    fn schur_decompose(&self, a: &Mat<Complex128>) -> Result<ComplexSchurDecomposition>;

    /// Eigenvalues in Schur order
    fn eigenvalues(&self, a: &Mat<Complex128>) -> Result<Vec<Complex128>> {
        Ok(self.schur_decompose(a)?.eigenvalues())
    }

    /// LU decomposition with partial pivoting
    fn lu_decompose<T: Element>(&self, a: &Mat<T>) -> Result<LuDecomposition<T>>;

    /// Solve A @ X = B
    fn solve<T: Element>(&self, a: &Mat<T>, b: &Mat<T>) -> Result<Mat<T>> {
        self.lu_decompose(a)?.solve(b)
    }

    /// Inverse via LU
    fn inverse<T: Element>(&self, a: &Mat<T>) -> Result<Mat<T>> {
        self.solve(a, &Mat::identity(a.rows()))
    }

    /// Solve U @ X = B for upper triangular U
    fn solve_triangular_upper<T: Element>(&self, u: &Mat<T>, b: &Mat<T>) -> Result<Mat<T>>;

    /// Matrix 1-norm (maximum absolute column sum)
    fn norm1<T: Element>(&self, a: &Mat<T>) -> f64 {
        a.norm1()
    }
}
