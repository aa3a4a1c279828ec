//! Algorithm contracts for runtime backends
//!
//! Every algorithm is defined as a trait FIRST, then implemented per backend:
//!
//! 1. **Define trait here** - Specifies the exact algorithm
//! 2. **Implement for each backend** - the back-end supplies the primitives
//! 3. **Compile-time enforcement** - Missing implementations cause errors
//!
//! # Available Algorithm Contracts
//!
//! - [`LinearAlgebraAlgorithms`](linalg::LinearAlgebraAlgorithms) - Schur, LU, triangular solves
//! - [`MatrixFunctionsAlgorithms`](linalg::MatrixFunctionsAlgorithms) - funm, expm, logm, sqrtm, signm, powers

pub mod linalg;
