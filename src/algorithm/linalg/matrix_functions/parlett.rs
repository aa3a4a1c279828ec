//! Block Schur–Parlett evaluation of a general scalar function
//!
//! T is reordered so that clustered eigenvalues form contiguous diagonal
//! blocks. Each diagonal block is evaluated by a Taylor series about the mean
//! of its eigenvalues; the off-diagonal blocks then follow from the
//! commutation F·T = T·F as triangular Sylvester equations.

use super::blocks::{BlockPartition, solve_wavefront};
use super::cluster::{CLUSTER_TOLERANCE, cluster_eigenvalues, reorder_by_cluster};
use super::scalar::ScalarFunction;
use super::spectrum::{OutputDomain, SchurForm, tolerate_numerical};
use super::sylvester::{SylvesterSign, solve_triangular_sylvester};
use super::types::{Diagnostics, EstimatedMatrix};
use crate::algorithm::linalg::{
    ComplexSchurDecomposition, LinearAlgebraAlgorithms, validate_square_matrix,
};
use crate::dtype::Complex128;
use crate::error::Result;
use crate::matrix::{Mat, Matrix};
use tracing::{debug, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Hard cap on Taylor terms for one diagonal block
pub const MAX_TAYLOR_TERMS: usize = 250;

/// Terms requested beyond the block size
const TAYLOR_EXTRA_TERMS: usize = 100;

/// Consecutive negligible terms required to stop the series
const NEGLIGIBLE_TERMS_TO_STOP: usize = 2;

/// f(T) for a triangular T together with its error estimate
#[derive(Debug, Clone)]
pub(crate) struct TriangularFunction {
    pub f: Mat<Complex128>,
    pub error_estimate: f64,
}

/// Evaluate `f` on the Schur form, reordering it in place
pub(crate) fn parlett_schur<F: ScalarFunction + ?Sized>(
    schur: &mut ComplexSchurDecomposition,
    f: &F,
) -> Result<TriangularFunction> {
    let n = schur.order();
    let mut labels = cluster_eigenvalues(&schur.eigenvalues(), f, CLUSTER_TOLERANCE);
    let bounds = reorder_by_cluster(schur, &mut labels)?;
    debug!(n, clusters = bounds.len(), "schur-parlett clustering");

    let partition = BlockPartition::from_bounds(bounds);
    let t = &schur.t;

    let diagonal_block = |b: usize| {
        let r = partition.range(b);
        taylor_block(&t.block(r.clone(), r), f)
    };

    #[cfg(feature = "rayon")]
    let diagonal: Vec<(Mat<Complex128>, bool)> =
        (0..partition.len()).into_par_iter().map(diagonal_block).collect();

    #[cfg(not(feature = "rayon"))]
    let diagonal: Vec<(Mat<Complex128>, bool)> = (0..partition.len()).map(diagonal_block).collect();

    let mut f_t = Mat::zeros(n, n);
    let mut converged = true;
    for (b, (block, ok)) in diagonal.iter().enumerate() {
        let start = partition.range(b).start;
        f_t.set_block(start, start, block);
        converged &= *ok;
    }

    let min_separation = solve_wavefront(&partition, &mut f_t, |i, j, f_t| {
        let (ri, rj) = (partition.range(i), partition.range(j));
        let t_ij = t.block(ri.clone(), rj.clone());
        let f_ii = f_t.block(ri.clone(), ri.clone());
        let f_jj = f_t.block(rj.clone(), rj.clone());

        // F_ii T_ij − T_ij F_jj + Σ_k (F_ik T_kj − T_ik F_kj)
        let mut rhs = &f_ii.matmul(&t_ij) - &t_ij.matmul(&f_jj);
        let mid = partition.between(i, j);
        if !mid.is_empty() {
            let f_ik = f_t.block(ri.clone(), mid.clone());
            let t_kj = t.block(mid.clone(), rj.clone());
            let t_ik = t.block(ri.clone(), mid.clone());
            let f_kj = f_t.block(mid, rj.clone());
            rhs = &(&rhs + &f_ik.matmul(&t_kj)) - &t_ik.matmul(&f_kj);
        }

        let sol = solve_triangular_sylvester(
            &t.block(ri.clone(), ri),
            &t.block(rj.clone(), rj),
            &rhs,
            SylvesterSign::Minus,
        )?;
        Ok((sol.x, sol.min_denominator))
    })?;

    let error_estimate = parlett_error_estimate(&f_t, t, min_separation, converged);
    Ok(TriangularFunction {
        f: f_t,
        error_estimate,
    })
}

/// Relative error estimate eps/min_sep·‖strict_upper(T)‖₁, clamped to
/// [eps, 1]
fn parlett_error_estimate(
    f_t: &Mat<Complex128>,
    t: &Mat<Complex128>,
    min_separation: f64,
    converged: bool,
) -> f64 {
    if !f_t.is_finite() {
        return f64::INFINITY;
    }
    if !converged {
        return 1.0;
    }
    let tol = f64::EPSILON;
    if min_separation.is_infinite() {
        return tol;
    }
    let minden = if min_separation == 0.0 {
        tol
    } else {
        min_separation
    };
    (tol / minden * t.strict_upper_norm1()).max(tol).min(1.0)
}

/// f of one diagonal block by its Taylor series about the mean eigenvalue
///
/// Returns the block value and whether the series converged.
fn taylor_block<F: ScalarFunction + ?Sized>(t: &Mat<Complex128>, f: &F) -> (Mat<Complex128>, bool) {
    let m = t.rows();
    if m == 1 {
        return (Mat::from_vec(1, 1, vec![f.eval(t[(0, 0)])]), true);
    }

    let diag = t.diagonal();
    let mut sigma = Complex128::ZERO;
    for &d in &diag {
        sigma += d;
    }
    sigma = sigma.scale(1.0 / m as f64);
    let spread = diag
        .iter()
        .map(|&d| (d - sigma).magnitude())
        .fold(0.0, f64::max);

    let mut shifted = t.clone();
    shifted.add_diagonal(-sigma);

    let count = (m + TAYLOR_EXTRA_TERMS).min(MAX_TAYLOR_TERMS);
    let coeffs = f.taylor_coefficients(sigma, spread, count);

    let mut value = Mat::identity(m).scale_by(coeffs[0]);
    let mut power = Mat::identity(m);
    let mut negligible = 0;
    for (k, &c) in coeffs.iter().enumerate().skip(1) {
        power = power.matmul(&shifted);
        if power.is_zero() {
            return (value, true);
        }
        let term = power.scale_by(c);
        value = &value + &term;
        if !value.is_finite() {
            return (value, false);
        }
        if k >= m && term.max_abs() <= f64::EPSILON * value.max_abs() {
            negligible += 1;
            if negligible >= NEGLIGIBLE_TERMS_TO_STOP {
                return (value, true);
            }
        } else {
            negligible = 0;
        }
    }
    debug!(block = m, terms = count, "taylor series did not converge");
    (value, false)
}

/// Matrix function of `a` for an arbitrary analytic scalar function
pub(crate) fn funm_impl<B, F>(
    backend: &B,
    a: &Matrix,
    f: &F,
    diagnostics: Diagnostics,
) -> Result<EstimatedMatrix>
where
    B: LinearAlgebraAlgorithms,
    F: ScalarFunction + ?Sized,
{
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
            error_estimate: f64::INFINITY,
        });
    };

    let domain = OutputDomain::RealSpectrum;
    let estimated = match tolerate_numerical(parlett_schur(&mut form.schur, f))? {
        Some(tri) => EstimatedMatrix {
            matrix: form.finish(form.schur.back_transform(&tri.f), domain),
            error_estimate: tri.error_estimate,
        },
        None => EstimatedMatrix {
            matrix: form.undefined(domain),
            error_estimate: f64::INFINITY,
        },
    };

    if diagnostics.enabled() && !(estimated.error_estimate < 1e3 * f64::EPSILON) {
        warn!(
            error_estimate = estimated.error_estimate,
            "funm result may be inaccurate"
        );
    }
    Ok(estimated)
}
