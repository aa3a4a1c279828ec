//! Principal matrix square root by the blocked Schur method
//!
//! R with R² = T is built on the Schur factor. Within a diagonal block the
//! classic column recurrence is used; between blocks each off-diagonal block
//! solves R_ii·X + X·R_jj = T_ij − R_i,k·R_k,j.

use super::blocks::{BlockPartition, solve_wavefront};
use super::spectrum::{OutputDomain, SchurForm, tolerate_numerical};
use super::sylvester::{SylvesterSign, solve_triangular_sylvester};
use super::types::{Diagnostics, EstimatedMatrix, SqrtmOptions};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_square_matrix};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::matrix::{Mat, Matrix};
use tracing::warn;

/// Square root of an upper triangular matrix
///
/// Fails with [`Error::NoSquareRoot`] when a zero denominator R_ii + R_jj
/// meets a nonzero right-hand side.
pub(crate) fn sqrtm_triu(t: &Mat<Complex128>, block_size: usize) -> Result<Mat<Complex128>> {
    let n = t.rows();
    let partition = BlockPartition::uniform(n, block_size);
    let mut r = Mat::zeros(n, n);
    for i in 0..n {
        r[(i, i)] = t[(i, i)].sqrt();
    }

    for b in 0..partition.len() {
        let block = partition.range(b);
        for j in block.clone() {
            for i in (block.start..j).rev() {
                let mut s = Complex128::ZERO;
                for k in (i + 1)..j {
                    s += r[(i, k)] * r[(k, j)];
                }
                let num = t[(i, j)] - s;
                let denom = r[(i, i)] + r[(j, j)];
                r[(i, j)] = if denom != Complex128::ZERO {
                    num / denom
                } else if num == Complex128::ZERO {
                    Complex128::ZERO
                } else {
                    return Err(Error::NoSquareRoot);
                };
            }
        }
    }

    solve_wavefront(&partition, &mut r, |i, j, r| {
        let (ri, rj) = (partition.range(i), partition.range(j));
        let mut rhs = t.block(ri.clone(), rj.clone());
        let mid = partition.between(i, j);
        if !mid.is_empty() {
            rhs = &rhs - &r.block(ri.clone(), mid.clone()).matmul(&r.block(mid, rj.clone()));
        }
        let sol = solve_triangular_sylvester(
            &r.block(ri.clone(), ri),
            &r.block(rj.clone(), rj),
            &rhs,
            SylvesterSign::Plus,
        )?;
        Ok((sol.x, sol.min_denominator))
    })?;

    Ok(r)
}

/// ‖X² − A‖_F / ‖A‖_F, or 0 when A = 0
fn relative_residual(x: &Mat<Complex128>, a: &Mat<Complex128>) -> f64 {
    let norm = a.norm_fro();
    let residual = (&x.matmul(x) - a).norm_fro();
    if norm == 0.0 { residual } else { residual / norm }
}

pub(crate) fn sqrtm_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    options: &SqrtmOptions,
    diagnostics: Diagnostics,
) -> Result<EstimatedMatrix> {
    options.validate()?;
    validate_square_matrix(a.shape())?;
    if a.rows() == 0 {
        return Ok(EstimatedMatrix {
            matrix: a.clone(),
            error_estimate: 0.0,
        });
    }

    let Some(form) = tolerate_numerical(SchurForm::new(backend, a))? else {
        return Ok(EstimatedMatrix {
            matrix: Matrix::nan(a.rows(), a.cols(), a.dtype()),
            error_estimate: f64::NAN,
        });
    };
    let domain = OutputDomain::PrincipalBranch;

    if diagnostics.enabled() && form.singular() {
        warn!("Matrix is singular and may not have a square root.");
    }

    let Some(r) = tolerate_numerical(sqrtm_triu(form.t(), options.block_size))? else {
        if diagnostics.enabled() {
            warn!("Failed to find a square root.");
        }
        return Ok(EstimatedMatrix {
            matrix: form.undefined(domain),
            error_estimate: f64::NAN,
        });
    };

    let matrix = form.finish(form.schur.back_transform(&r), domain);
    let error_estimate = relative_residual(&matrix.to_complex_mat(), &a.to_complex_mat());
    Ok(EstimatedMatrix {
        matrix,
        error_estimate,
    })
}
