//! Gauss–Legendre quadrature rules
//!
//! The logarithm evaluates its Padé approximant through the partial fraction
//! form r_m(X) = Σ w_j X (I + x_j X)⁻¹, where (x_j, w_j) is the degree-m
//! Gauss–Legendre rule on [0, 1].
//!
//! # Algorithm
//! Nodes are roots of P_m found by Newton's method from the Chebyshev-like
//! guess cos(π(i − 1/4)/(m + 1/2)); P_m and P_m' come from the three-term
//! recurrence (k+1)P_{k+1}(x) = (2k+1)xP_k(x) − kP_{k−1}(x).

use std::f64::consts::PI;

/// Newton iterations per node
const MAX_NEWTON_ITERATIONS: usize = 100;

/// P_m(x) and P_m'(x)
fn legendre_with_derivative(m: usize, x: f64) -> (f64, f64) {
    let mut p_prev = 1.0;
    let mut p_curr = x;
    if m == 0 {
        return (1.0, 0.0);
    }
    for k in 1..m {
        let k_f = k as f64;
        let p_next = ((2.0 * k_f + 1.0) * x * p_curr - k_f * p_prev) / (k_f + 1.0);
        p_prev = p_curr;
        p_curr = p_next;
    }
    let dp = m as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

/// Degree-m Gauss–Legendre nodes and weights on [−1, 1], nodes ascending
pub fn gauss_legendre(m: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; m];
    let mut weights = vec![0.0; m];
    let mf = m as f64;

    for i in 0..m.div_ceil(2) {
        let mut x = (PI * (i as f64 + 0.75) / (mf + 0.5)).cos();
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let (p, dp) = legendre_with_derivative(m, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() <= 1e-15 * x.abs().max(1.0) {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(m, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        nodes[i] = -x;
        nodes[m - 1 - i] = x;
        weights[i] = w;
        weights[m - 1 - i] = w;
    }
    // Odd m: the middle root is exactly 0
    if m % 2 == 1 {
        nodes[m / 2] = 0.0;
    }
    (nodes, weights)
}

/// Degree-m Gauss–Legendre rule mapped to [0, 1]
pub fn gauss_legendre_unit(m: usize) -> Vec<(f64, f64)> {
    let (nodes, weights) = gauss_legendre(m);
    nodes
        .into_iter()
        .zip(weights)
        .map(|(x, w)| (0.5 + 0.5 * x, 0.5 * w))
        .collect()
}
