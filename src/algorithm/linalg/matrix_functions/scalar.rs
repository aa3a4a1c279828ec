//! Scalar functions lifted to matrices
//!
//! The block Schur–Parlett evaluator needs two things from a scalar function:
//! its value at an eigenvalue and the Taylor coefficients about the centre of
//! an eigenvalue cluster. [`ScalarFunction`] provides both. Any
//! `Fn(Complex128) -> Complex128 + Sync` closure implements it, with Taylor
//! coefficients recovered from a Cauchy integral on a small circle; the
//! built-in functions override that with exact coefficients.

use crate::dtype::Complex128;
use std::f64::consts::PI;

/// Contour points used by the default Taylor coefficients
const MIN_CONTOUR_POINTS: usize = 64;

/// Analytic scalar function usable by `funm`
pub trait ScalarFunction: Sync {
    /// Value at `z`
    fn eval(&self, z: Complex128) -> Complex128;

    /// First `count` Taylor coefficients `f⁽ᵏ⁾(center) / k!`
    ///
    /// `radius` is the spread of the eigenvalues around `center`; the default
    /// uses a contour of at least that radius, which assumes `f` is analytic
    /// on it.
    fn taylor_coefficients(
        &self,
        center: Complex128,
        radius: f64,
        count: usize,
    ) -> Vec<Complex128> {
        cauchy_taylor_coefficients(|z| self.eval(z), center, radius, count)
    }

    /// Whether two eigenvalues may be expanded about a common centre
    fn shares_cluster(&self, _a: Complex128, _b: Complex128) -> bool {
        true
    }
}

impl<F> ScalarFunction for F
where
    F: Fn(Complex128) -> Complex128 + Sync,
{
    #[inline]
    fn eval(&self, z: Complex128) -> Complex128 {
        self(z)
    }
}

/// Taylor coefficients from the trapezoid rule on a circle about `center`
pub fn cauchy_taylor_coefficients(
    f: impl Fn(Complex128) -> Complex128,
    center: Complex128,
    spread: f64,
    count: usize,
) -> Vec<Complex128> {
    let r = (2.0 * spread)
        .max(0.5 * center.magnitude().min(1.0))
        .max(1e-6);
    let points = MIN_CONTOUR_POINTS.max((2 * count).next_power_of_two());
    let samples: Vec<Complex128> = (0..points)
        .map(|j| {
            let w = Complex128::from_polar(1.0, 2.0 * PI * j as f64 / points as f64);
            f(center + w.scale(r))
        })
        .collect();

    (0..count)
        .map(|k| {
            let mut acc = Complex128::ZERO;
            for (j, &fz) in samples.iter().enumerate() {
                let angle = -2.0 * PI * ((j * k) % points) as f64 / points as f64;
                acc += fz * Complex128::from_polar(1.0, angle);
            }
            acc.scale(1.0 / (points as f64 * r.powi(k as i32)))
        })
        .collect()
}

// ============================================================================
// Built-in functions with exact Taylor coefficients
// ============================================================================

/// Exponential
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl ScalarFunction for Exp {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.exp()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let mut c = Vec::with_capacity(count);
        let mut term = center.exp();
        for k in 0..count {
            if k > 0 {
                term = term.scale(1.0 / k as f64);
            }
            c.push(term);
        }
        c
    }
}

/// Principal logarithm
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

impl ScalarFunction for Log {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.ln()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let inv = center.recip();
        let mut c = Vec::with_capacity(count);
        let mut pow = Complex128::ONE;
        for k in 0..count {
            if k == 0 {
                c.push(center.ln());
                continue;
            }
            pow = pow * inv;
            let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
            c.push(pow.scale(sign / k as f64));
        }
        c
    }
}

/// Principal real power `z^p`
#[derive(Debug, Clone, Copy)]
pub struct Power(pub f64);

impl ScalarFunction for Power {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.powf(self.0)
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let p = self.0;
        let inv = center.recip();
        let mut c = Vec::with_capacity(count);
        let mut term = center.powf(p);
        for k in 0..count {
            if k > 0 {
                // binom(p, k)·σ^(p-k) from binom(p, k-1)·σ^(p-k+1)
                let factor = (p - (k as f64 - 1.0)) / k as f64;
                term = if factor == 0.0 {
                    Complex128::ZERO
                } else {
                    term * inv.scale(factor)
                };
            }
            c.push(term);
        }
        c
    }
}

/// Principal square root
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqrt;

impl ScalarFunction for Sqrt {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.sqrt()
    }

    fn taylor_coefficients(&self, center: Complex128, spread: f64, count: usize) -> Vec<Complex128> {
        let mut c = Power(0.5).taylor_coefficients(center, spread, count);
        if let Some(c0) = c.first_mut() {
            *c0 = center.sqrt();
        }
        c
    }
}

/// Coefficients of a function whose derivatives cycle with period four
/// through `values` (f, f', f'', f''').
fn cyclic_coefficients(values: [Complex128; 4], count: usize) -> Vec<Complex128> {
    let mut c = Vec::with_capacity(count);
    let mut inv_fact = 1.0;
    for k in 0..count {
        if k > 0 {
            inv_fact /= k as f64;
        }
        c.push(values[k % 4].scale(inv_fact));
    }
    c
}

/// Sine
#[derive(Debug, Clone, Copy, Default)]
pub struct Sin;

impl ScalarFunction for Sin {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.sin()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let (s, c) = (center.sin(), center.cos());
        cyclic_coefficients([s, c, -s, -c], count)
    }
}

/// Cosine
#[derive(Debug, Clone, Copy, Default)]
pub struct Cos;

impl ScalarFunction for Cos {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.cos()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let (s, c) = (center.sin(), center.cos());
        cyclic_coefficients([c, -s, -c, s], count)
    }
}

/// Hyperbolic sine
#[derive(Debug, Clone, Copy, Default)]
pub struct Sinh;

impl ScalarFunction for Sinh {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.sinh()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let (s, c) = (center.sinh(), center.cosh());
        cyclic_coefficients([s, c, s, c], count)
    }
}

/// Hyperbolic cosine
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosh;

impl ScalarFunction for Cosh {
    fn eval(&self, z: Complex128) -> Complex128 {
        z.cosh()
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let (s, c) = (center.sinh(), center.cosh());
        cyclic_coefficients([c, s, c, s], count)
    }
}

/// sign(Re z), undefined (NaN) within `threshold` of the imaginary axis
///
/// Clusters never straddle the imaginary axis, so every Taylor expansion is
/// the constant ±1.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sign {
    pub threshold: f64,
}

impl Sign {
    fn side(&self, z: Complex128) -> Option<f64> {
        if z.re > self.threshold {
            Some(1.0)
        } else if z.re < -self.threshold {
            Some(-1.0)
        } else {
            None
        }
    }
}

impl ScalarFunction for Sign {
    fn eval(&self, z: Complex128) -> Complex128 {
        self.side(z)
            .map_or(Complex128::NAN, |s| Complex128::new(s, 0.0))
    }

    fn taylor_coefficients(&self, center: Complex128, _: f64, count: usize) -> Vec<Complex128> {
        let mut c = vec![Complex128::ZERO; count];
        if let Some(c0) = c.first_mut() {
            *c0 = self.eval(center);
        }
        c
    }

    fn shares_cluster(&self, a: Complex128, b: Complex128) -> bool {
        self.side(a) == self.side(b)
    }
}
