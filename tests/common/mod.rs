//! Common test utilities
#![allow(dead_code)]

use matfun::dtype::Complex128;
use matfun::matrix::Matrix;
use matfun::runtime::CpuClient;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Create a CPU client for testing
///
/// Also installs the test subscriber, so `RUST_LOG=matfun=debug` shows the
/// algorithm choices of any failing test.
pub fn create_cpu_client() -> CpuClient {
    init_tracing();
    CpuClient::new()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two complex slices are close within tolerance
pub fn assert_allclose_c128(
    a: &[Complex128],
    b: &[Complex128],
    rtol: f64,
    atol: f64,
    msg: &str,
) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (*x - *y).magnitude();
        let tol = atol + rtol * y.magnitude();
        assert!(
            diff <= tol,
            "{}: element {} differs: {:?} vs {:?} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two matrices of any dtype are elementwise close
pub fn assert_matrix_close(a: &Matrix, b: &Matrix, rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape mismatch", msg);
    assert_allclose_c128(&a.to_complex_vec(), &b.to_complex_vec(), rtol, atol, msg);
}

/// Relative 1-norm distance ‖a − b‖₁ / ‖b‖₁
pub fn relative_error(a: &Matrix, b: &Matrix) -> f64 {
    let diff = a.sub(b).expect("shapes must match").norm1();
    let scale = b.norm1();
    if scale == 0.0 { diff } else { diff / scale }
}

/// Real n×n matrix from row-major data
pub fn real_matrix(data: &[f64], n: usize) -> Matrix {
    Matrix::from_slice(data, &[n, n])
}

/// Complex n×n matrix from row-major (re, im) pairs
pub fn complex_matrix(data: &[(f64, f64)], n: usize) -> Matrix {
    let values: Vec<Complex128> = data.iter().map(|&(re, im)| Complex128::new(re, im)).collect();
    Matrix::from_slice(&values, &[n, n])
}

/// Seeded generator so failures reproduce
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// n×n matrix with standard normal entries
pub fn random_normal_matrix(rng: &mut StdRng, n: usize) -> Matrix {
    let data: Vec<f64> = (0..n * n).map(|_| rng.sample(StandardNormal)).collect();
    Matrix::from_slice(&data, &[n, n])
}

/// n×n matrix with uniform entries in [0, 1)
pub fn random_uniform_matrix(rng: &mut StdRng, n: usize) -> Matrix {
    let data: Vec<f64> = (0..n * n).map(|_| rng.random::<f64>()).collect();
    Matrix::from_slice(&data, &[n, n])
}

/// n×n complex matrix with standard normal real and imaginary parts
pub fn random_complex_matrix(rng: &mut StdRng, n: usize) -> Matrix {
    let data: Vec<Complex128> = (0..n * n)
        .map(|_| Complex128::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
        .collect();
    Matrix::from_slice(&data, &[n, n])
}

/// n×n upper triangular matrix with uniform entries and positive diagonal
pub fn random_upper_triangular(rng: &mut StdRng, n: usize) -> Matrix {
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        for j in i..n {
            data[i * n + j] = rng.random::<f64>() + if i == j { 0.5 } else { 0.0 };
        }
    }
    Matrix::from_slice(&data, &[n, n])
}

/// Shift the diagonal of a real matrix
pub fn add_to_diagonal(a: &Matrix, shift: f64) -> Matrix {
    let n = a.rows();
    let mut data: Vec<f64> = a.to_vec();
    for i in 0..n {
        data[i * n + i] += shift;
    }
    Matrix::from_slice(&data, &[n, n])
}

/// Install the `tracing` test subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
