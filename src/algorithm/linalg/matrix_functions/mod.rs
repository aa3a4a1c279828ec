//! Matrix function algorithms
//!
//! Every function here is expressed over [`LinearAlgebraAlgorithms`]: the
//! Schur decomposition, LU solves and triangular solves come from the
//! back-end, everything else (clustering, Parlett recurrences, Padé
//! approximants, scaling and squaring) is shared code.
//!
//! # Module Structure
//!
//! - `scalar`, `cluster`, `sylvester`, `blocks`, `parlett`: block Schur–Parlett
//! - `sign`: matrix sign with Newton fallback
//! - `sqrt`: blocked Schur square root
//! - `inverse_ssq`, `quadrature`, `log`: inverse scaling and squaring logarithm
//! - `power`: integer and real powers
//! - `pade`, `expm`, `frechet`: scaling and squaring exponential and its
//!   Fréchet derivative
//! - `trig`: trigonometric and hyperbolic functions from the exponential
//!
//! [`LinearAlgebraAlgorithms`]: crate::algorithm::linalg::LinearAlgebraAlgorithms

mod blocks;
mod cluster;
mod expm;
mod frechet;
mod inverse_ssq;
mod log;
mod pade;
mod parlett;
mod power;
mod quadrature;
mod scalar;
mod sign;
mod spectrum;
mod sqrt;
mod sylvester;
mod trig;
mod types;

pub use cluster::{CLUSTER_TOLERANCE, cluster_eigenvalues};
pub use expm::DEFAULT_TAYLOR_TERMS;
pub use inverse_ssq::{
    MAX_INVERSE_SQUARING_ROOTS, briggs_helper, fractional_power_superdiag_entry,
    logm_superdiag_entry,
};
pub use pade::{
    EXPM_PADE_TABLE, MAX_SQUARINGS, PADE_TABLE_VERSION, PadeChoice, PadeEntry, choose_pade,
    choose_pade_for,
};
pub use parlett::MAX_TAYLOR_TERMS;
pub use quadrature::{gauss_legendre, gauss_legendre_unit};
pub use scalar::{
    Cos, Cosh, Exp, Log, Power, ScalarFunction, Sin, Sinh, Sqrt, cauchy_taylor_coefficients,
};
pub use sign::MAX_SIGN_NEWTON_ITERATIONS;
pub use types::{
    DEFAULT_SQRTM_BLOCK_SIZE, EstimatedMatrix, FrechetMethod, FrechetOptions, FrechetResult,
    SqrtmOptions,
};

pub(crate) use expm::{expm_eig_impl, expm_impl, expm_taylor_impl};
pub(crate) use frechet::expm_frechet_impl;
pub(crate) use log::logm_impl;
pub(crate) use parlett::funm_impl;
pub(crate) use power::{fractional_matrix_power_impl, matrix_power_impl};
pub(crate) use sign::signm_impl;
pub(crate) use sqrt::sqrtm_impl;
pub(crate) use trig::{TrigFunction, trig_impl};
pub(crate) use types::Diagnostics;
