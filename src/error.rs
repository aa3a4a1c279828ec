//! Error types for matfun

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using matfun's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matfun operations
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// DType mismatch between a matrix and the requested element type
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Stored dtype
        lhs: DType,
        /// Requested dtype
        rhs: DType,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A linear system had an exactly zero pivot
    #[error("Matrix is singular")]
    SingularMatrix,

    /// A triangular Sylvester system met a zero denominator while taking a square root
    #[error("Failed to find a square root")]
    NoSquareRoot,

    /// An iteration hit its hard cap
    #[error("{op} did not converge within {iterations} iterations")]
    NoConvergence {
        /// The operation that failed
        op: &'static str,
        /// Iteration budget that was exhausted
        iterations: usize,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a non-convergence error
    pub fn no_convergence(op: &'static str, iterations: usize) -> Self {
        Self::NoConvergence { op, iterations }
    }

    /// True for failures that mean "the function value is undefined or could
    /// not be computed" rather than "the call was malformed".
    ///
    /// Public matrix-function entry points turn these into an all-NaN result.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::SingularMatrix | Self::NoSquareRoot | Self::NoConvergence { .. }
        )
    }
}
