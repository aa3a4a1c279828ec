//! Helper functions for linear algebra operations
//!
//! Validation utilities and the complex Givens rotation shared by the Schur
//! back-end and the Schur reordering used by the block Parlett recurrence.

use crate::dtype::{Complex128, Element};
use crate::error::{Error, Result};
use crate::matrix::{Mat, Matrix};

/// Validate matrix is 2D
pub fn validate_matrix_2d(shape: &[usize]) -> Result<(usize, usize)> {
    match *shape {
        [m, n] => Ok((m, n)),
        _ => Err(Error::invalid_argument(
            "shape",
            format!(
                "expected 2D matrix, got {}D shape {:?}",
                shape.len(),
                shape
            ),
        )),
    }
}

/// Validate matrix is square
pub fn validate_square_matrix(shape: &[usize]) -> Result<usize> {
    let (m, n) = validate_matrix_2d(shape)?;
    if m != n {
        return Err(Error::ShapeMismatch {
            expected: vec![m, m],
            got: vec![m, n],
        });
    }
    Ok(n)
}

/// Validate that two matrices are square with identical shapes
pub fn validate_same_square(a: &Matrix, b: &Matrix) -> Result<usize> {
    let n = validate_square_matrix(a.shape())?;
    if a.shape() != b.shape() {
        return Err(Error::shape_mismatch(a.shape(), b.shape()));
    }
    Ok(n)
}

/// Plane rotation `G = [c s; -conj(s) c]` with real `c`
///
/// Chosen so that `G·[f; g] = [r; 0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GivensRotation {
    /// Cosine (real, nonnegative)
    pub c: f64,
    /// Sine
    pub s: Complex128,
}

impl GivensRotation {
    /// Rotation annihilating `g` against `f`; also returns `r`
    pub fn new(f: Complex128, g: Complex128) -> (Self, Complex128) {
        if g == Complex128::ZERO {
            return (
                Self {
                    c: 1.0,
                    s: Complex128::ZERO,
                },
                f,
            );
        }
        let g_abs = g.magnitude();
        if f == Complex128::ZERO {
            return (
                Self {
                    c: 0.0,
                    s: g.conj().scale(1.0 / g_abs),
                },
                Complex128::new(g_abs, 0.0),
            );
        }
        let f_abs = f.magnitude();
        let norm = f_abs.hypot(g_abs);
        let phase = f.scale(1.0 / f_abs);
        (
            Self {
                c: f_abs / norm,
                s: phase * g.conj().scale(1.0 / norm),
            },
            phase.scale(norm),
        )
    }

    /// Left-apply to rows `p` and `p+1`, over columns `cols`
    pub fn apply_rows(&self, m: &mut Mat<Complex128>, p: usize, cols: std::ops::Range<usize>) {
        for j in cols {
            let x = m[(p, j)];
            let y = m[(p + 1, j)];
            m[(p, j)] = x.scale(self.c) + self.s * y;
            m[(p + 1, j)] = y.scale(self.c) - self.s.conj() * x;
        }
    }

    /// Right-apply `Gᴴ` to columns `p` and `p+1`, over rows `rows`
    pub fn apply_cols_adjoint(
        &self,
        m: &mut Mat<Complex128>,
        p: usize,
        rows: std::ops::Range<usize>,
    ) {
        for i in rows {
            let x = m[(i, p)];
            let y = m[(i, p + 1)];
            m[(i, p)] = x.scale(self.c) + y * self.s.conj();
            m[(i, p + 1)] = y.scale(self.c) - x * self.s;
        }
    }
}

/// Largest `|a_ij - b_ij|`, used by tests and residual checks
pub fn max_abs_diff<T: Element>(a: &Mat<T>, b: &Mat<T>) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| (x - y).magnitude())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_square() {
        assert_eq!(validate_square_matrix(&[3, 3]).unwrap(), 3);
        assert!(matches!(
            validate_square_matrix(&[2, 3]),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(validate_square_matrix(&[3]).is_err());
    }

    #[test]
    fn test_givens_annihilates() {
        let f = Complex128::new(1.0, 2.0);
        let g = Complex128::new(-3.0, 0.5);
        let (rot, r) = GivensRotation::new(f, g);
        let mut m = Mat::from_vec(2, 1, vec![f, g]);
        rot.apply_rows(&mut m, 0, 0..1);
        assert!((m[(0, 0)] - r).magnitude() < 1e-14);
        assert!(m[(1, 0)].magnitude() < 1e-14);
        assert!((r.magnitude() - (f.magnitude_squared() + g.magnitude_squared()).sqrt()).abs() < 1e-14);
    }

    #[test]
    fn test_givens_is_unitary() {
        let (rot, _) = GivensRotation::new(Complex128::ZERO, Complex128::new(0.0, 2.0));
        let mut m = Mat::<Complex128>::identity(2);
        rot.apply_rows(&mut m, 0, 0..2);
        rot.apply_cols_adjoint(&mut m, 0, 0..2);
        assert!(max_abs_diff(&m, &Mat::identity(2)) < 1e-15);
    }
}
