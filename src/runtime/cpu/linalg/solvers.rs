//! LU factorization and triangular solves

use crate::algorithm::linalg::LuDecomposition;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::matrix::Mat;

/// LU decomposition with partial pivoting
///
/// An exactly zero pivot column reports [`Error::SingularMatrix`]; tiny but
/// nonzero pivots are accepted and left to the caller's error estimate.
pub fn lu_decompose_impl<T: Element>(a: &Mat<T>) -> Result<LuDecomposition<T>> {
    let n = a.rows();
    if !a.is_square() {
        return Err(Error::ShapeMismatch {
            expected: vec![n, n],
            got: vec![n, a.cols()],
        });
    }

    let mut lu = a.clone();
    let mut pivots = Vec::with_capacity(n);

    for k in 0..n {
        let mut max_row = k;
        let mut max_val = lu[(k, k)].magnitude();
        for i in (k + 1)..n {
            let v = lu[(i, k)].magnitude();
            if v > max_val {
                max_val = v;
                max_row = i;
            }
        }

        if max_val == 0.0 || max_val.is_nan() {
            return Err(Error::SingularMatrix);
        }

        if max_row != k {
            for j in 0..n {
                let tmp = lu[(k, j)];
                lu[(k, j)] = lu[(max_row, j)];
                lu[(max_row, j)] = tmp;
            }
        }
        pivots.push(max_row);

        let pivot = lu[(k, k)];
        for i in (k + 1)..n {
            let factor = lu[(i, k)] / pivot;
            lu[(i, k)] = factor;
            if factor == T::zero() {
                continue;
            }
            for j in (k + 1)..n {
                let u = lu[(k, j)];
                lu[(i, j)] = lu[(i, j)] - factor * u;
            }
        }
    }

    Ok(LuDecomposition { lu, pivots })
}

/// Solve U @ X = B by back substitution, U upper triangular
pub fn solve_triangular_upper_impl<T: Element>(u: &Mat<T>, b: &Mat<T>) -> Result<Mat<T>> {
    let n = u.rows();
    if !u.is_square() || b.rows() != n {
        return Err(Error::shape_mismatch(&[n, b.cols()], &[b.rows(), b.cols()]));
    }

    let m = b.cols();
    let mut x = b.clone();
    for i in (0..n).rev() {
        let d = u[(i, i)];
        if d == T::zero() {
            return Err(Error::SingularMatrix);
        }
        for k in (i + 1)..n {
            let uik = u[(i, k)];
            if uik == T::zero() {
                continue;
            }
            for j in 0..m {
                x[(i, j)] = x[(i, j)] - uik * x[(k, j)];
            }
        }
        for j in 0..m {
            x[(i, j)] = x[(i, j)] / d;
        }
    }
    Ok(x)
}
