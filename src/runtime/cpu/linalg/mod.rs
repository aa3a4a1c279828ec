//! CPU implementation of linear algebra algorithms
//!
//! This module implements the [`LinearAlgebraAlgorithms`] trait for CPU.

mod schur;
mod solvers;

use super::CpuClient;
use crate::algorithm::linalg::{
    ComplexSchurDecomposition, LinearAlgebraAlgorithms, LuDecomposition, validate_square_matrix,
};
use crate::dtype::{Complex128, Element};
use crate::error::Result;
use crate::matrix::Mat;

impl LinearAlgebraAlgorithms for CpuClient {
    fn schur_decompose(&self, a: &Mat<Complex128>) -> Result<ComplexSchurDecomposition> {
        validate_square_matrix(&[a.rows(), a.cols()])?;
        schur::schur_decompose_impl(a)
    }

    fn lu_decompose<T: Element>(&self, a: &Mat<T>) -> Result<LuDecomposition<T>> {
        solvers::lu_decompose_impl(a)
    }

    fn solve_triangular_upper<T: Element>(&self, u: &Mat<T>, b: &Mat<T>) -> Result<Mat<T>> {
        solvers::solve_triangular_upper_impl(u, b)
    }
}
