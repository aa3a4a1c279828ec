//! Linear algebra algorithm contracts and matrix functions
//!
//! This module defines the back-end contract ([`LinearAlgebraAlgorithms`]) and
//! the matrix-function surface built on it ([`MatrixFunctionsAlgorithms`]).
//!
//! # Design Principles
//!
//! 1. **Small contract**: a back-end supplies the complex Schur decomposition,
//!    LU factorization and upper triangular solves; everything else is shared
//! 2. **Backend Parity**: all back-ends run the same matrix-function code, so
//!    results agree to rounding
//! 3. **Explicit Contracts**: missing implementations cause compile errors
//!
//! # Module Structure
//!
//! - `decompositions`: Result types (ComplexSchurDecomposition, LuDecomposition)
//! - `traits`: LinearAlgebraAlgorithms and MatrixFunctionsAlgorithms traits
//! - `helpers`: Validation utilities
//! - `matrix_functions`: Schur–Parlett, Padé and inverse scaling-squaring algorithms

pub mod decompositions;
pub mod helpers;
pub mod matrix_functions;
pub mod traits;

// Re-export all public types for convenient access
pub use decompositions::*;
pub use helpers::*;
pub use traits::*;
