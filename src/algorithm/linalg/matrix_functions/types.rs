//! Option and result types for matrix functions

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Default diagonal block size of the blocked square root
pub const DEFAULT_SQRTM_BLOCK_SIZE: usize = 64;

/// A matrix function value together with its error estimate
///
/// Returned by the `*_with_estimate` entry points. An undefined or
/// non-convergent evaluation yields an all-NaN `matrix` and a NaN or large
/// `error_estimate`.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedMatrix {
    /// The computed function value
    pub matrix: Matrix,
    /// Approximate error; its meaning depends on the function
    pub error_estimate: f64,
}

/// Options for `sqrtm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqrtmOptions {
    /// Target size of the diagonal blocks of the Schur factor
    pub block_size: usize,
}

impl Default for SqrtmOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_SQRTM_BLOCK_SIZE,
        }
    }
}

impl SqrtmOptions {
    /// Options with a specific block size
    pub fn with_block_size(block_size: usize) -> Self {
        Self { block_size }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::invalid_argument(
                "block_size",
                "block size must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Algorithm used for the Fréchet derivative of the exponential
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrechetMethod {
    /// Scaling-Padé-squaring on A and E simultaneously
    #[default]
    Sps,
    /// Exponential of the 2n×2n block matrix [[A, E], [0, A]]
    BlockEnlarge,
}

/// Options for `expm_frechet`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrechetOptions {
    /// Algorithm selection
    pub method: FrechetMethod,
    /// Also return exp(A)
    pub compute_expm: bool,
}

impl Default for FrechetOptions {
    fn default() -> Self {
        Self {
            method: FrechetMethod::Sps,
            compute_expm: true,
        }
    }
}

impl FrechetOptions {
    /// Options using the given method, returning exp(A) as well
    pub fn with_method(method: FrechetMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }
}

/// Result of `expm_frechet`
#[derive(Debug, Clone, PartialEq)]
pub struct FrechetResult {
    /// exp(A), when requested
    pub expm: Option<Matrix>,
    /// Fréchet derivative L(A, E)
    pub frechet: Matrix,
}

/// Whether an evaluation reports suspicious results through `tracing::warn!`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Diagnostics {
    /// Warn when the estimate is large (plain entry points)
    Warn,
    /// Return the estimate only (`*_with_estimate` entry points)
    Silent,
}

impl Diagnostics {
    #[inline]
    pub fn enabled(self) -> bool {
        matches!(self, Self::Warn)
    }
}
