//! Padé approximants of the exponential and of its Fréchet derivative
//!
//! One versioned table drives both `expm` and `expm_frechet`: the degree is
//! the smallest m whose bound ℓ_m is at least ‖A‖₁, and above ℓ₁₃ the matrix
//! is scaled by 2⁻ˢ so that degree 13 applies.

use crate::dtype::Element;
use crate::matrix::Mat;

/// Revision of [`EXPM_PADE_TABLE`]; bump when bounds or coefficients change
pub const PADE_TABLE_VERSION: u32 = 1;

/// One row of the Padé table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadeEntry {
    /// Degree of numerator and denominator
    pub degree: usize,
    /// Largest ‖A‖₁ for which this degree is accurate to unit roundoff
    pub ell: f64,
    /// Coefficients b_0..=b_m of the numerator p_m(x)
    pub coefficients: &'static [f64],
}

const B3: [f64; 4] = [120.0, 60.0, 12.0, 1.0];
const B5: [f64; 6] = [30240.0, 15120.0, 3360.0, 420.0, 30.0, 1.0];
const B7: [f64; 8] = [
    17297280.0, 8648640.0, 1995840.0, 277200.0, 25200.0, 1512.0, 56.0, 1.0,
];
const B9: [f64; 10] = [
    17643225600.0,
    8821612800.0,
    2075673600.0,
    302702400.0,
    30270240.0,
    2162160.0,
    110880.0,
    3960.0,
    90.0,
    1.0,
];
const B13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

/// Degrees 3, 5, 7, 9 and 13 with their ℓ bounds
pub const EXPM_PADE_TABLE: [PadeEntry; 5] = [
    PadeEntry {
        degree: 3,
        ell: 1.08e-2,
        coefficients: &B3,
    },
    PadeEntry {
        degree: 5,
        ell: 2.00e-1,
        coefficients: &B5,
    },
    PadeEntry {
        degree: 7,
        ell: 7.83e-1,
        coefficients: &B7,
    },
    PadeEntry {
        degree: 9,
        ell: 1.78e0,
        coefficients: &B9,
    },
    PadeEntry {
        degree: 13,
        ell: 4.74e0,
        coefficients: &B13,
    },
];

/// Upper bound on the number of squarings
pub const MAX_SQUARINGS: u32 = 1024;

/// Degree and scaling chosen for a given ‖A‖₁
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadeChoice {
    /// Selected table row
    pub entry: PadeEntry,
    /// A is scaled by 2⁻ˢ and the result squared s times
    pub squarings: u32,
}

/// Pick the Padé degree and scaling for ‖A‖₁ = `norm`
///
/// Returns `None` when the norm is not finite or would need more than
/// [`MAX_SQUARINGS`] squarings.
pub fn choose_pade(norm: f64) -> Option<PadeChoice> {
    if !norm.is_finite() {
        return None;
    }
    let (last, lower) = EXPM_PADE_TABLE.split_last()?;
    if let Some(entry) = lower.iter().find(|e| norm <= e.ell) {
        return Some(PadeChoice {
            entry: *entry,
            squarings: 0,
        });
    }
    let s = (norm / last.ell).log2().ceil().max(0.0);
    if s > MAX_SQUARINGS as f64 {
        return None;
    }
    Some(PadeChoice {
        entry: *last,
        squarings: s as u32,
    })
}

/// Unit roundoff of IEEE double precision
const UNIT_ROUNDOFF: f64 = 1.0 / 9007199254740992.0;

/// 1/|c_{2m+1}|, the leading coefficient of the degree-m backward error series
fn error_coefficient_recip(degree: usize) -> f64 {
    match degree {
        3 => 100800.0,
        5 => 10059033600.0,
        7 => 4487938430976000.0,
        9 => 5914384781877411840000.0,
        _ => 113250775606021113483283660800000000.0,
    }
}

/// ‖Bᵖ‖₁ for an entrywise nonnegative B, by binary powering
fn nonnegative_power_norm(b: &Mat<f64>, p: usize) -> f64 {
    let mut result: Option<Mat<f64>> = None;
    let mut base = b.clone();
    let mut k = p;
    while k > 0 {
        if k & 1 == 1 {
            result = Some(match result {
                Some(r) => r.matmul(&base),
                None => base.clone(),
            });
        }
        k >>= 1;
        if k > 0 {
            base = base.matmul(&base);
        }
    }
    result.map_or(0.0, |r| r.norm1())
}

/// Extra squarings the degree-m approximant needs to keep its backward error
/// at unit roundoff (Al-Mohy & Higham 2009, eq. 5.1)
///
/// Zero for most matrices; positive for strongly nonnormal ones, where the
/// power-norm estimates below understate the truncation error.
pub(crate) fn backward_error_squarings<T: Element>(a: &Mat<T>, degree: usize) -> u32 {
    let abs = a.map(|x| x.magnitude());
    let norm = abs.norm1();
    if norm == 0.0 {
        return 0;
    }
    let alpha = nonnegative_power_norm(&abs, 2 * degree + 1) / (norm * error_coefficient_recip(degree));
    let value = ((alpha / UNIT_ROUNDOFF).log2() / (2 * degree) as f64).ceil();
    // NaN and negative values clamp to zero
    value.max(0.0) as u32
}

/// Pick the Padé degree and scaling for exp(A)
///
/// Uses d_p = ‖Aᵖ‖₁^{1/p} for p = 4, 6, 8, 10 in place of ‖A‖₁. For a
/// nonnormal A these can be far smaller, which avoids the overscaling that
/// ruins the squaring phase. A degree below 13 is only taken when it needs
/// no extra squarings; at degree 13 the extra squarings are added to s.
///
/// Returns `None` for non-finite input or when more than [`MAX_SQUARINGS`]
/// squarings would be needed.
pub fn choose_pade_for<T: Element>(a: &Mat<T>) -> Option<PadeChoice> {
    let a2 = a.matmul(a);
    let a4 = a2.matmul(&a2);
    let a6 = a4.matmul(&a2);
    let a8 = a4.matmul(&a4);
    let a10 = a8.matmul(&a2);
    let d4 = a4.norm1().powf(1.0 / 4.0);
    let d6 = a6.norm1().powf(1.0 / 6.0);
    let d8 = a8.norm1().powf(1.0 / 8.0);
    let d10 = a10.norm1().powf(1.0 / 10.0);
    if ![d4, d6, d8, d10].iter().all(|d| d.is_finite()) {
        return None;
    }

    let (last, lower) = EXPM_PADE_TABLE.split_last()?;
    let eta_low = d4.max(d6);
    let eta_mid = d6.max(d8);
    for entry in lower {
        let eta = if entry.degree <= 5 { eta_low } else { eta_mid };
        if eta <= entry.ell && backward_error_squarings(a, entry.degree) == 0 {
            return Some(PadeChoice {
                entry: *entry,
                squarings: 0,
            });
        }
    }

    let eta = eta_mid.min(d8.max(d10));
    let s = (eta / last.ell).log2().ceil().max(0.0);
    if s > MAX_SQUARINGS as f64 {
        return None;
    }
    let scaled = a.scale((-s).exp2());
    let squarings = (s as u32).saturating_add(backward_error_squarings(&scaled, last.degree));
    if squarings > MAX_SQUARINGS {
        return None;
    }
    Some(PadeChoice {
        entry: *last,
        squarings,
    })
}

/// Odd/even parts of the Padé numerator and, optionally, their directional
/// derivatives
///
/// exp(A) ≈ (V − U)⁻¹(V + U); with a direction E, L(A, E) follows from
/// `lu`, `lv` (see `frechet`).
#[derive(Debug, Clone)]
pub(crate) struct PadeTerms<T: Element> {
    pub u: Mat<T>,
    pub v: Mat<T>,
    pub lu: Option<Mat<T>>,
    pub lv: Option<Mat<T>>,
}

/// Even powers A², A⁴, … and their derivatives M₂ₖ = L(A²ᵏ, E)
struct EvenPowers<T: Element> {
    powers: Vec<Mat<T>>,
    derivatives: Vec<Mat<T>>,
}

impl<T: Element> EvenPowers<T> {
    /// A^(2k) for k = 0..=count, with derivatives when `e` is given
    fn new(a: &Mat<T>, e: Option<&Mat<T>>, count: usize) -> Self {
        let n = a.rows();
        let a2 = a.matmul(a);
        let mut powers = vec![Mat::identity(n), a2.clone()];
        let mut derivatives = Vec::new();
        if let Some(e) = e {
            derivatives.push(Mat::zeros(n, n));
            derivatives.push(&a.matmul(e) + &e.matmul(a));
        }
        for k in 2..=count {
            let next = powers[k - 1].matmul(&a2);
            if e.is_some() {
                // M_2k = M_2k−2·A² + A^(2k−2)·M₂
                let m = &derivatives[k - 1].matmul(&a2) + &powers[k - 1].matmul(&derivatives[1]);
                derivatives.push(m);
            }
            powers.push(next);
        }
        Self {
            powers,
            derivatives,
        }
    }
}

/// Padé terms of degree 3, 5, 7 or 9 (direct evaluation)
fn direct_terms<T: Element>(a: &Mat<T>, e: Option<&Mat<T>>, b: &[f64]) -> PadeTerms<T> {
    let half = (b.len() - 1) / 2;
    let even = EvenPowers::new(a, e, half);

    let odd_sum: Vec<(f64, &Mat<T>)> = (0..=half).map(|k| (b[2 * k + 1], &even.powers[k])).collect();
    let even_sum: Vec<(f64, &Mat<T>)> = (0..=half).map(|k| (b[2 * k], &even.powers[k])).collect();
    let w = Mat::linear_combination(&odd_sum);
    let u = a.matmul(&w);
    let v = Mat::linear_combination(&even_sum);

    let (lu, lv) = match e {
        Some(e) => {
            let lw_terms: Vec<(f64, &Mat<T>)> = (1..=half)
                .map(|k| (b[2 * k + 1], &even.derivatives[k]))
                .collect();
            let lv_terms: Vec<(f64, &Mat<T>)> =
                (1..=half).map(|k| (b[2 * k], &even.derivatives[k])).collect();
            let lw = Mat::linear_combination(&lw_terms);
            let lu = &a.matmul(&lw) + &e.matmul(&w);
            (Some(lu), Some(Mat::linear_combination(&lv_terms)))
        }
        None => (None, None),
    };
    PadeTerms { u, v, lu, lv }
}

/// Padé terms of degree 13, factored to use only A², A⁴ and A⁶
fn degree13_terms<T: Element>(a: &Mat<T>, e: Option<&Mat<T>>) -> PadeTerms<T> {
    let b = &B13;
    let n = a.rows();
    let ident = Mat::identity(n);
    let even = EvenPowers::new(a, e, 3);
    let (a2, a4, a6) = (&even.powers[1], &even.powers[2], &even.powers[3]);

    let w1 = Mat::linear_combination(&[(b[13], a6), (b[11], a4), (b[9], a2)]);
    let w2 = Mat::linear_combination(&[(b[7], a6), (b[5], a4), (b[3], a2), (b[1], &ident)]);
    let z1 = Mat::linear_combination(&[(b[12], a6), (b[10], a4), (b[8], a2)]);
    let z2 = Mat::linear_combination(&[(b[6], a6), (b[4], a4), (b[2], a2), (b[0], &ident)]);
    let w = &a6.matmul(&w1) + &w2;
    let u = a.matmul(&w);
    let v = &a6.matmul(&z1) + &z2;

    let (lu, lv) = match e {
        Some(e) => {
            let (m2, m4, m6) = (
                &even.derivatives[1],
                &even.derivatives[2],
                &even.derivatives[3],
            );
            let lw1 = Mat::linear_combination(&[(b[13], m6), (b[11], m4), (b[9], m2)]);
            let lw2 = Mat::linear_combination(&[(b[7], m6), (b[5], m4), (b[3], m2)]);
            let lz1 = Mat::linear_combination(&[(b[12], m6), (b[10], m4), (b[8], m2)]);
            let lz2 = Mat::linear_combination(&[(b[6], m6), (b[4], m4), (b[2], m2)]);
            let lw = &(&a6.matmul(&lw1) + &m6.matmul(&w1)) + &lw2;
            let lu = &a.matmul(&lw) + &e.matmul(&w);
            let lv = &(&a6.matmul(&lz1) + &m6.matmul(&z1)) + &lz2;
            (Some(lu), Some(lv))
        }
        None => (None, None),
    };
    PadeTerms { u, v, lu, lv }
}

/// Padé terms for an (already scaled) A and optional direction E
pub(crate) fn pade_terms<T: Element>(
    a: &Mat<T>,
    e: Option<&Mat<T>>,
    entry: &PadeEntry,
) -> PadeTerms<T> {
    if entry.degree == 13 {
        degree13_terms(a, e)
    } else {
        direct_terms(a, e, entry.coefficients)
    }
}
