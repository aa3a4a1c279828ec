//! Linear algebra algorithm trait definitions
//!
//! `LinearAlgebraAlgorithms` is the contract a back-end implements;
//! `MatrixFunctionsAlgorithms` is the public matrix-function surface, provided
//! for every back-end through a blanket implementation.

pub mod linear_algebra;
pub mod matrix_functions;

pub use linear_algebra::LinearAlgebraAlgorithms;
pub use matrix_functions::MatrixFunctionsAlgorithms;
