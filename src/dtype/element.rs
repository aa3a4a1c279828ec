//! Element trait for mapping Rust types to DType

use super::{Complex128, DType};
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for types that can be elements of a matrix
///
/// This trait connects Rust's type system to matfun's runtime dtype system.
/// The dense kernels (matmul, LU, Padé evaluation) are written once against
/// it and instantiated for `f64` and `Complex128`.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck)
/// - `Add + Sub + Mul + Div + Neg` - Field arithmetic (Output = Self)
pub trait Element:
    Copy
    + Clone
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert from f64 to this type
    ///
    /// For complex types, this creates a **real number** (imaginary part = 0).
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// NaN value
    fn nan() -> Self;

    /// Absolute value (magnitude for complex types)
    fn magnitude(self) -> f64;

    /// Complex conjugate (identity for real types)
    fn conjugate(self) -> Self;

    /// Multiply by a real scalar
    fn scale(self, s: f64) -> Self;

    /// Widen to a complex value
    fn to_complex(self) -> Complex128;

    /// Narrow a complex value, dropping the imaginary part for real types
    fn from_complex(z: Complex128) -> Self;

    /// True when the value is neither infinite nor NaN
    fn finite(self) -> bool;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn nan() -> Self {
        f64::NAN
    }

    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn conjugate(self) -> Self {
        self
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s
    }

    #[inline]
    fn to_complex(self) -> Complex128 {
        Complex128::new(self, 0.0)
    }

    #[inline]
    fn from_complex(z: Complex128) -> Self {
        z.re
    }

    #[inline]
    fn finite(self) -> bool {
        self.is_finite()
    }
}

impl Element for Complex128 {
    const DTYPE: DType = DType::Complex128;

    #[inline]
    fn from_f64(v: f64) -> Self {
        Complex128::new(v, 0.0)
    }

    #[inline]
    fn zero() -> Self {
        Complex128::ZERO
    }

    #[inline]
    fn one() -> Self {
        Complex128::ONE
    }

    #[inline]
    fn nan() -> Self {
        Complex128::NAN
    }

    #[inline]
    fn magnitude(self) -> f64 {
        Complex128::magnitude(self)
    }

    #[inline]
    fn conjugate(self) -> Self {
        self.conj()
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        Complex128::scale(self, s)
    }

    #[inline]
    fn to_complex(self) -> Complex128 {
        self
    }

    #[inline]
    fn from_complex(z: Complex128) -> Self {
        z
    }

    #[inline]
    fn finite(self) -> bool {
        self.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Element>(v: f64) -> f64 {
        T::from_f64(v).to_complex().re
    }

    #[test]
    fn test_element_dtype() {
        assert_eq!(<f64 as Element>::DTYPE, DType::F64);
        assert_eq!(<Complex128 as Element>::DTYPE, DType::Complex128);
    }

    #[test]
    fn test_element_conversions() {
        assert_eq!(roundtrip::<f64>(2.5), 2.5);
        assert_eq!(roundtrip::<Complex128>(-1.5), -1.5);
        assert_eq!(<f64 as Element>::from_complex(Complex128::new(3.0, 4.0)), 3.0);
        assert_eq!(Element::magnitude(Complex128::new(3.0, 4.0)), 5.0);
        assert_eq!(Element::conjugate(Complex128::I), -Complex128::I);
        assert!(!<f64 as Element>::nan().finite());
        assert!(!<Complex128 as Element>::nan().finite());
    }
}
