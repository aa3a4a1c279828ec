//! Triangular Sylvester solver
//!
//! Solves `A·X + sign·X·B = C` for upper triangular A (p×p) and B (q×q) by
//! column-wise back substitution. Shared by the Parlett recurrence
//! (`sign = -1`) and the blocked square root (`sign = +1`).

use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::matrix::Mat;

/// Which triangular Sylvester equation to solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SylvesterSign {
    /// A·X + X·B = C
    Plus,
    /// A·X − X·B = C
    Minus,
}

impl SylvesterSign {
    #[inline]
    fn factor(self) -> f64 {
        match self {
            Self::Plus => 1.0,
            Self::Minus => -1.0,
        }
    }
}

/// Solution of a triangular Sylvester system
#[derive(Debug, Clone)]
pub(crate) struct SylvesterSolution {
    pub x: Mat<Complex128>,
    /// Smallest |a_ii ± b_jj| met during the solve
    pub min_denominator: f64,
}

/// Solve `A·X ± X·B = C` with A and B upper triangular
///
/// A zero denominator `a_ii ± b_jj` with a nonzero right-hand side means the
/// system has no solution and reports [`Error::NoSquareRoot`] for the `Plus`
/// form and [`Error::SingularMatrix`] otherwise.
pub(crate) fn solve_triangular_sylvester(
    a: &Mat<Complex128>,
    b: &Mat<Complex128>,
    c: &Mat<Complex128>,
    sign: SylvesterSign,
) -> Result<SylvesterSolution> {
    let (p, q) = (a.rows(), b.rows());
    if c.rows() != p || c.cols() != q {
        return Err(Error::shape_mismatch(&[p, q], &[c.rows(), c.cols()]));
    }
    let s = sign.factor();
    let mut x = Mat::zeros(p, q);
    let mut min_denominator = f64::INFINITY;

    for j in 0..q {
        // rhs = c_j - s·Σ_{l<j} x_l·b_lj
        let mut rhs: Vec<Complex128> = (0..p).map(|i| c[(i, j)]).collect();
        for l in 0..j {
            let blj = b[(l, j)];
            if blj == Complex128::ZERO {
                continue;
            }
            for (i, r) in rhs.iter_mut().enumerate() {
                *r -= x[(i, l)] * blj.scale(s);
            }
        }

        let bjj = b[(j, j)].scale(s);
        for i in (0..p).rev() {
            let mut acc = rhs[i];
            for k in (i + 1)..p {
                acc -= a[(i, k)] * x[(k, j)];
            }
            let denom = a[(i, i)] + bjj;
            let mag = denom.magnitude();
            if mag == 0.0 {
                // 0·x = 0 is consistent; take the zero solution
                if acc == Complex128::ZERO {
                    continue;
                }
                return Err(match sign {
                    SylvesterSign::Plus => Error::NoSquareRoot,
                    SylvesterSign::Minus => Error::SingularMatrix,
                });
            }
            min_denominator = min_denominator.min(mag);
            x[(i, j)] = acc / denom;
        }
    }

    Ok(SylvesterSolution { x, min_denominator })
}
