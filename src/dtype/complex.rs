//! Double-precision complex scalar
//!
//! `Complex128` is the working scalar of every Schur-based matrix function:
//! the Schur factor of a real matrix is complex in general, so triangular
//! recurrences, branch decisions and Taylor coefficients are all expressed in
//! terms of this type.
//!
//! # Branch conventions
//!
//! `ln`, `sqrt`, `powf` and `atanh` return principal values with the branch cut
//! on the negative real axis. A signed zero imaginary part is treated as `+0`,
//! so `sqrt(-1 - 0i) = i` and `arg(-1 - 0i) = π`. Eigenvalues snapped to the
//! real axis therefore always land on the upper side of the cut.

use bytemuck::{Pod, Zeroable};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 128-bit complex number with f64 real and imaginary parts
///
/// Memory layout: Complex128 is f64 × 2, interleaved format.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Complex128 {
    /// Real part
    pub re: f64,
    /// Imaginary part
    pub im: f64,
}

impl Complex128 {
    /// Zero complex number
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// One (real unit)
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Imaginary unit i
    pub const I: Self = Self { re: 0.0, im: 1.0 };

    /// NaN in both parts
    pub const NAN: Self = Self {
        re: f64::NAN,
        im: f64::NAN,
    };

    /// Create a new complex number
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Create a complex number from polar form: r * e^(iθ)
    #[inline]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self {
            re: r * theta.cos(),
            im: r * theta.sin(),
        }
    }

    /// Magnitude |z|, computed without intermediate overflow
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Squared magnitude: |z|² = re² + im²
    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Principal argument in (-π, π]
    #[inline]
    pub fn phase(self) -> f64 {
        if self.im == 0.0 {
            0.0f64.atan2(self.re)
        } else {
            self.im.atan2(self.re)
        }
    }

    /// Complex conjugate: conj(a + bi) = a - bi
    #[inline]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Multiply by a real scalar
    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }

    /// Reciprocal 1/z
    #[inline]
    pub fn recip(self) -> Self {
        Self::ONE / self
    }

    /// True when both parts are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    /// True when either part is NaN
    #[inline]
    pub fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    /// Complex exponential: e^z = e^re * (cos(im) + i*sin(im))
    #[inline]
    pub fn exp(self) -> Self {
        let exp_re = self.re.exp();
        if self.im == 0.0 {
            return Self::new(exp_re, 0.0);
        }
        Self {
            re: exp_re * self.im.cos(),
            im: exp_re * self.im.sin(),
        }
    }

    /// Principal natural logarithm: ln(z) = ln(|z|) + i*arg(z)
    #[inline]
    pub fn ln(self) -> Self {
        Self {
            re: self.magnitude().ln(),
            im: self.phase(),
        }
    }

    /// Principal square root
    ///
    /// Uses the half-angle form on whichever side of the imaginary axis avoids
    /// cancellation, so `sqrt(1 + δi)` keeps its tiny imaginary part.
    pub fn sqrt(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Self::ZERO;
        }
        if self.re >= 0.0 {
            let t = ((mag + self.re) / 2.0).sqrt();
            Self::new(t, self.im / (2.0 * t))
        } else {
            let t = ((mag - self.re) / 2.0).sqrt();
            let sign = if self.im < 0.0 { -1.0 } else { 1.0 };
            Self::new(self.im.abs() / (2.0 * t), sign * t)
        }
    }

    /// Principal real power z^p = exp(p ln z)
    ///
    /// `0^p` is 0 for p > 0, 1 for p = 0 and infinite for p < 0.
    pub fn powf(self, p: f64) -> Self {
        if self == Self::ZERO {
            return if p > 0.0 {
                Self::ZERO
            } else if p == 0.0 {
                Self::ONE
            } else {
                Self::new(f64::INFINITY, 0.0)
            };
        }
        if self.im == 0.0 && self.re > 0.0 {
            return Self::new(self.re.powf(p), 0.0);
        }
        self.ln().scale(p).exp()
    }

    /// Integer power by repeated squaring
    pub fn powi(self, k: i32) -> Self {
        let mut base = if k < 0 { self.recip() } else { self };
        let mut exp = k.unsigned_abs();
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        acc
    }

    /// Complex sine
    #[inline]
    pub fn sin(self) -> Self {
        Self::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    /// Complex cosine
    #[inline]
    pub fn cos(self) -> Self {
        Self::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    /// Complex hyperbolic sine
    #[inline]
    pub fn sinh(self) -> Self {
        Self::new(
            self.re.sinh() * self.im.cos(),
            self.re.cosh() * self.im.sin(),
        )
    }

    /// Complex hyperbolic cosine
    #[inline]
    pub fn cosh(self) -> Self {
        Self::new(
            self.re.cosh() * self.im.cos(),
            self.re.sinh() * self.im.sin(),
        )
    }

    /// Principal inverse hyperbolic tangent: ½(ln(1+z) − ln(1−z))
    #[inline]
    pub fn atanh(self) -> Self {
        ((Self::ONE + self).ln() - (Self::ONE - self).ln()).scale(0.5)
    }
}

/// Unwinding number U(z) = ⌈(Im z − π) / 2π⌉
///
/// It counts how many multiples of 2πi separate `z` from the principal
/// strip, so that `ln(e^z) = z − 2πi·U(z)`.
#[inline]
pub fn unwinding_number(z: Complex128) -> f64 {
    ((z.im - PI) / (2.0 * PI)).ceil()
}

impl Add for Complex128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for Complex128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for Complex128 {
    type Output = Self;

    /// Complex multiplication: (a+bi)(c+di) = (ac-bd) + (ad+bc)i
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl Div for Complex128 {
    type Output = Self;

    /// Smith's algorithm, which avoids overflow in |c+di|²
    #[inline]
    fn div(self, rhs: Self) -> Self {
        if rhs.re == 0.0 && rhs.im == 0.0 {
            return Self::NAN;
        }
        if rhs.re.abs() >= rhs.im.abs() {
            let r = rhs.im / rhs.re;
            let d = rhs.re + rhs.im * r;
            Self::new((self.re + self.im * r) / d, (self.im - self.re * r) / d)
        } else {
            let r = rhs.re / rhs.im;
            let d = rhs.re * r + rhs.im;
            Self::new((self.re * r + self.im) / d, (self.im * r - self.re) / d)
        }
    }
}

impl Neg for Complex128 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl AddAssign for Complex128 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl SubAssign for Complex128 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

impl MulAssign for Complex128 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Complex128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{}+{}i", self.re, self.im)
        } else {
            write!(f, "{}{}i", self.re, self.im)
        }
    }
}

impl From<f64> for Complex128 {
    #[inline]
    fn from(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl From<(f64, f64)> for Complex128 {
    #[inline]
    fn from((re, im): (f64, f64)) -> Self {
        Self { re, im }
    }
}
