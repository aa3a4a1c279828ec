//! Compute back-ends
//!
//! A back-end is anything implementing
//! [`LinearAlgebraAlgorithms`](crate::algorithm::linalg::LinearAlgebraAlgorithms).
//! The crate ships the CPU one.

pub mod cpu;

pub use cpu::CpuClient;
