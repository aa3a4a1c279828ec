//! Decomposition result types

use crate::dtype::{Complex128, Element};
use crate::error::{Error, Result};
use crate::matrix::Mat;

/// Complex Schur decomposition result: A = Z @ T @ Z^H
///
/// - Z is unitary
/// - T is upper triangular; its diagonal holds the eigenvalues of A
///
/// Unlike the real Schur form there are no 2×2 blocks, which lets every
/// triangular recurrence in the matrix-function layer work entry by entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSchurDecomposition {
    /// Unitary Schur vectors
    pub z: Mat<Complex128>,
    /// Upper triangular Schur form
    pub t: Mat<Complex128>,
}

impl ComplexSchurDecomposition {
    /// Order of the decomposed matrix
    #[inline]
    pub fn order(&self) -> usize {
        self.t.rows()
    }

    /// Eigenvalues in Schur order
    #[inline]
    pub fn eigenvalues(&self) -> Vec<Complex128> {
        self.t.diagonal()
    }

    /// Map a triangular result back: Z @ F @ Z^H
    pub fn back_transform(&self, f: &Mat<Complex128>) -> Mat<Complex128> {
        self.z.matmul(f).matmul(&self.z.conj_transpose())
    }
}

/// LU decomposition with partial pivoting: P @ A = L @ U
///
/// L (unit lower) and U share the `lu` buffer. `pivots[k]` is the row swapped
/// into position k at step k.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Element> {
    /// Packed L and U factors
    pub lu: Mat<T>,
    /// Row interchanges
    pub pivots: Vec<usize>,
}

impl<T: Element> LuDecomposition<T> {
    /// Solve A @ X = B using the stored factors
    pub fn solve(&self, b: &Mat<T>) -> Result<Mat<T>> {
        let n = self.lu.rows();
        if b.rows() != n {
            return Err(Error::shape_mismatch(&[n, b.cols()], &[b.rows(), b.cols()]));
        }
        let mut x = b.clone();
        let m = x.cols();

        for (k, &p) in self.pivots.iter().enumerate() {
            if p != k {
                for j in 0..m {
                    let tmp = x[(k, j)];
                    x[(k, j)] = x[(p, j)];
                    x[(p, j)] = tmp;
                }
            }
        }

        // Forward substitution with unit-diagonal L
        for i in 0..n {
            for k in 0..i {
                let l = self.lu[(i, k)];
                if l == T::zero() {
                    continue;
                }
                for j in 0..m {
                    x[(i, j)] = x[(i, j)] - l * x[(k, j)];
                }
            }
        }

        // Back substitution with U
        for i in (0..n).rev() {
            for k in (i + 1)..n {
                let u = self.lu[(i, k)];
                if u == T::zero() {
                    continue;
                }
                for j in 0..m {
                    x[(i, j)] = x[(i, j)] - u * x[(k, j)];
                }
            }
            let d = self.lu[(i, i)];
            for j in 0..m {
                x[(i, j)] = x[(i, j)] / d;
            }
        }

        Ok(x)
    }
}
