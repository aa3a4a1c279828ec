//! Data type system for matfun matrices
//!
//! Matrices hold either real (`f64`) or complex (`Complex128`) elements. The
//! `DType` enum carries that choice at runtime so the public `Matrix` type can
//! stay dtype-erased while the kernels are written once against [`Element`].

pub mod complex;
mod element;

pub use complex::{Complex128, unwinding_number};
pub use element::Element;

use std::fmt;

/// Element types supported by matfun matrices
///
/// # Discriminant Values (Serialization Stability)
///
/// F64 = 0 and Complex128 = 41 are kept stable. New types will use reserved
/// ranges, existing values are never changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// Complex with f64 real and imaginary parts
    Complex128 = 41,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Returns true for complex dtypes
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex128)
    }

    /// The dtype both operands can be represented in without loss
    #[inline]
    pub const fn promote(self, other: Self) -> Self {
        if self.is_complex() || other.is_complex() {
            Self::Complex128
        } else {
            Self::F64
        }
    }

    /// Short display name
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::Complex128 => "c128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
