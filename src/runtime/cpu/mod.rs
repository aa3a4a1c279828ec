//! CPU runtime implementation
//!
//! Reference implementation of the linear-algebra back-end. Kernels are
//! written against [`Element`](crate::dtype::Element) and run on `f64` and
//! `Complex128`. With the `rayon` feature, large matrix products are
//! row-parallel.

mod client;
mod linalg;

pub use client::CpuClient;
