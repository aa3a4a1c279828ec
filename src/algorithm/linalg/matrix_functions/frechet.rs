//! Fréchet derivative of the matrix exponential
//!
//! L(A, E) = d/dt exp(A + tE) at t = 0. Two algorithms:
//! - scaling-Padé-squaring (Al-Mohy & Higham 2009, algorithm 6.4), which
//!   differentiates the Padé approximant and the squaring phase together;
//! - block enlargement, which reads L(A, E) off exp([[A, E], [0, A]]).

use super::expm::expm_mat;
use super::pade::{choose_pade, pade_terms};
use super::types::{FrechetMethod, FrechetOptions, FrechetResult};
use crate::algorithm::linalg::{LinearAlgebraAlgorithms, validate_same_square};
use crate::dtype::{Complex128, Element};
use crate::error::{Error, Result};
use crate::matrix::{Mat, Matrix, MatrixData};
use tracing::debug;

/// exp(A) and L(A, E) by scaling-Padé-squaring
fn frechet_sps<T, B>(backend: &B, a: &Mat<T>, e: &Mat<T>) -> Result<(Mat<T>, Mat<T>)>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let n = a.rows();
    let undefined = || Ok((Mat::nan(n, n), Mat::nan(n, n)));
    if !a.is_finite() || !e.is_finite() {
        return undefined();
    }

    let norm = backend.norm1(a);
    let Some(choice) = choose_pade(norm) else {
        debug!(norm, "expm_frechet: norm out of range");
        return undefined();
    };
    debug!(
        degree = choice.entry.degree,
        squarings = choice.squarings,
        "expm_frechet pade selection"
    );

    let (a, e) = if choice.squarings > 0 {
        let factor = (-(choice.squarings as f64)).exp2();
        (a.scale(factor), e.scale(factor))
    } else {
        (a.clone(), e.clone())
    };
    let terms = pade_terms(&a, Some(&e), &choice.entry);
    let (Some(lu_term), Some(lv_term)) = (terms.lu, terms.lv) else {
        return Err(Error::Internal(
            "pade terms built without derivative parts".to_string(),
        ));
    };

    // Factor once, solve twice
    let lu = match backend.lu_decompose(&(&terms.v - &terms.u)) {
        Ok(lu) => lu,
        Err(Error::SingularMatrix) => return undefined(),
        Err(err) => return Err(err),
    };
    let mut r = lu.solve(&(&terms.u + &terms.v))?;
    let rhs = &(&lu_term + &lv_term) + &(&lu_term - &lv_term).matmul(&r);
    let mut l = lu.solve(&rhs)?;

    for _ in 0..choice.squarings {
        l = &r.matmul(&l) + &l.matmul(&r);
        r = r.matmul(&r);
    }

    if !r.is_finite() || !l.is_finite() {
        return undefined();
    }
    Ok((r, l))
}

/// exp(A) and L(A, E) from the exponential of [[A, E], [0, A]]
fn frechet_block_enlarge<T, B>(backend: &B, a: &Mat<T>, e: &Mat<T>) -> Result<(Mat<T>, Mat<T>)>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    let n = a.rows();
    let mut big = Mat::zeros(2 * n, 2 * n);
    big.set_block(0, 0, a);
    big.set_block(0, n, e);
    big.set_block(n, n, a);
    let big_exp = expm_mat(backend, &big)?;
    Ok((big_exp.block(0..n, 0..n), big_exp.block(0..n, n..2 * n)))
}

fn frechet_typed<T, B>(
    backend: &B,
    a: &Mat<T>,
    e: &Mat<T>,
    method: FrechetMethod,
) -> Result<(Mat<T>, Mat<T>)>
where
    T: Element,
    B: LinearAlgebraAlgorithms,
{
    match method {
        FrechetMethod::Sps => frechet_sps(backend, a, e),
        FrechetMethod::BlockEnlarge => frechet_block_enlarge(backend, a, e),
    }
}

pub(crate) fn expm_frechet_impl<B: LinearAlgebraAlgorithms>(
    backend: &B,
    a: &Matrix,
    e: &Matrix,
    options: &FrechetOptions,
) -> Result<FrechetResult> {
    validate_same_square(a, e)?;

    let (expm, frechet): (Matrix, Matrix) = match (a.data(), e.data()) {
        (MatrixData::F64(a), MatrixData::F64(e)) => {
            let (x, l) = frechet_typed(backend, a, e, options.method)?;
            (x.into(), l.into())
        }
        _ => {
            let (a, e): (Mat<Complex128>, Mat<Complex128>) =
                (a.to_complex_mat(), e.to_complex_mat());
            let (x, l) = frechet_typed(backend, &a, &e, options.method)?;
            (x.into(), l.into())
        }
    };

    Ok(FrechetResult {
        expm: options.compute_expm.then_some(expm),
        frechet,
    })
}
