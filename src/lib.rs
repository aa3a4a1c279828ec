//! # matfun
//!
//! **Dense matrix functions for Rust: exp, log, square root, sign, powers and
//! general analytic f(A).**
//!
//! matfun evaluates functions of square real or complex matrices with the
//! algorithms used by established numerical libraries: block Schur–Parlett for
//! general analytic functions, scaling and squaring with Padé approximants for
//! the exponential and its Fréchet derivative, inverse scaling and squaring for
//! the logarithm and real powers, and the blocked Schur method for the square
//! root.
//!
//! ## Features
//!
//! - **funm**: f(A) for any analytic scalar function, closures included
//! - **expm / expm_frechet**: Exponential and its directional derivative
//! - **logm / sqrtm / fractional_matrix_power**: Principal-branch functions
//! - **signm**: Matrix sign with Newton fallback
//! - **cosm, sinm, tanm, coshm, sinhm, tanhm**: Built on the exponential
//! - **Error estimates**: every Schur-based function has a `_with_estimate` form
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matfun::prelude::*;
//!
//! let client = CpuClient::new();
//! let a = Matrix::from_slice(&[1.0f64, 2.0, 0.0, 3.0], &[2, 2]);
//!
//! let e = client.expm(&a)?;
//! let l = client.logm(&e)?;
//! let r = client.sqrtm(&a, &SqrtmOptions::default())?;
//! let f = client.funm(&a, &|z: Complex128| z.exp())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Parallel matrix products and block wavefronts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod dtype;
pub mod error;
pub mod matrix;
pub mod runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::linalg::matrix_functions::{
        Cos, Cosh, EstimatedMatrix, Exp, FrechetMethod, FrechetOptions, FrechetResult, Log,
        Power, ScalarFunction, Sin, Sinh, Sqrt, SqrtmOptions,
    };
    pub use crate::algorithm::linalg::{LinearAlgebraAlgorithms, MatrixFunctionsAlgorithms};
    pub use crate::dtype::{Complex128, DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{Mat, Matrix, MatrixData};
    pub use crate::runtime::CpuClient;
}
