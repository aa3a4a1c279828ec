//! Integration tests for the matrix square root (sqrtm)

mod common;

use common::{
    assert_allclose_f64, assert_matrix_close, create_cpu_client, random_complex_matrix,
    random_normal_matrix, random_uniform_matrix, real_matrix, seeded_rng,
};
use matfun::algorithm::linalg::MatrixFunctionsAlgorithms;
use matfun::algorithm::linalg::matrix_functions::{DEFAULT_SQRTM_BLOCK_SIZE, SqrtmOptions};
use matfun::dtype::{Complex128, DType};
use matfun::error::Error;
use matfun::matrix::Matrix;

fn square(a: &Matrix) -> Matrix {
    a.matmul(a).unwrap()
}

/// Elementwise check that `root`² reproduces `a`
///
/// The absolute floor is the rounding level of the product, ‖X‖₁²·1e-12.
fn assert_square_root(root: &Matrix, a: &Matrix, msg: &str) {
    let floor = 1e-12 * root.norm1().powi(2);
    assert_matrix_close(&square(root), a, 1e-7, floor, msg);
}

#[test]
fn test_sqrtm_options_default() {
    assert_eq!(SqrtmOptions::default().block_size, DEFAULT_SQRTM_BLOCK_SIZE);
    assert_eq!(SqrtmOptions::with_block_size(3).block_size, 3);
}

#[test]
fn test_sqrtm_zero_block_size_rejected() {
    let client = create_cpu_client();
    let a = Matrix::identity(2, DType::F64);
    let result = client.sqrtm(&a, &SqrtmOptions::with_block_size(0));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_sqrtm_diagonal() {
    let client = create_cpu_client();
    let a = real_matrix(&[4.0, 0.0, 0.0, 9.0], 2);
    let result = client.sqrtm(&a, &SqrtmOptions::default()).unwrap();
    assert_eq!(result.dtype(), DType::F64);
    assert_allclose_f64(&result.to_vec::<f64>(), &[2.0, 0.0, 0.0, 3.0], 1e-15, 0.0, "sqrt(diag)");
}

#[test]
fn test_sqrtm_round_trip_random_float() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(1234);
    for n in 1..6 {
        let unscaled = random_normal_matrix(&mut rng, n);
        for k in -4..=4 {
            let m = unscaled.scale(10f64.powi(k));
            let root = client.sqrtm(&m, &SqrtmOptions::default()).unwrap();
            assert_square_root(&root, &m, &format!("n={n} scale=1e{k}"));
        }
    }
}

#[test]
fn test_sqrtm_round_trip_random_complex() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(1234);
    for n in 1..6 {
        let unscaled = random_complex_matrix(&mut rng, n);
        for k in -4..=4 {
            let m = unscaled.scale(10f64.powi(k));
            let root = client.sqrtm(&m, &SqrtmOptions::default()).unwrap();
            assert_eq!(root.dtype(), DType::Complex128);
            assert_square_root(&root, &m, &format!("n={n} scale=1e{k}"));
        }
    }
}

#[test]
fn test_sqrtm_bad() {
    // Higham's example where naive methods lose accuracy
    let client = create_cpu_client();
    let e = 2f64.powi(-5);
    let se = e.sqrt();
    let a = real_matrix(
        &[
            1.0, 0.0, 0.0, 1.0, //
            0.0, e, 0.0, 0.0, //
            0.0, 0.0, e, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
        4,
    );
    let expected = real_matrix(
        &[
            1.0, 0.0, 0.0, 0.5, //
            0.0, se, 0.0, 0.0, //
            0.0, 0.0, se, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
        4,
    );
    for block_size in [4, 2] {
        let root = client
            .sqrtm(&a, &SqrtmOptions::with_block_size(block_size))
            .unwrap();
        assert_matrix_close(&root, &expected, 1e-12, 1e-12, "sqrtm(bad)");
        assert_matrix_close(&square(&root), &a, 1e-12, 1e-12, "sqrtm(bad)^2");
    }
}

#[test]
fn test_sqrtm_type_preservation_and_conversion() {
    let client = create_cpu_client();
    let cases: [[f64; 4]; 5] = [
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0, 1.0],
        [2.0, 1.0, 1.0, 1.0],
        [2.0, 3.0, 1.0, 2.0],
        [1.0, 1.0, 1.0, 1.0],
    ];
    let options = SqrtmOptions::default();
    for data in cases.iter() {
        let a = real_matrix(data, 2);
        let root = client.sqrtm(&a, &options).unwrap();
        assert_eq!(root.dtype(), DType::F64, "{data:?}");
        assert_matrix_close(&square(&root), &a, 1e-12, 1e-12, "real sqrt");

        let root = client.sqrtm(&a.to_complex(), &options).unwrap();
        assert_eq!(root.dtype(), DType::Complex128, "{data:?}");

        let neg = a.scale(-1.0);
        let root = client.sqrtm(&neg, &options).unwrap();
        assert_eq!(root.dtype(), DType::Complex128, "{data:?}");
    }
}

#[test]
fn test_sqrtm_type_conversion_mixed_sign_or_complex_spectrum() {
    let client = create_cpu_client();
    let options = SqrtmOptions::default();
    let cases: [(&[f64], usize); 3] = [
        (&[1.0, 0.0, 0.0, -1.0], 2),
        (&[0.0, 1.0, 1.0, 0.0], 2),
        (&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0], 3),
    ];
    for (data, n) in cases {
        let a = real_matrix(data, n);
        let root = client.sqrtm(&a, &options).unwrap();
        assert_eq!(root.dtype(), DType::Complex128, "{data:?}");
        assert_matrix_close(&square(&root), &a.to_complex(), 1e-12, 1e-12, "mixed spectrum");

        let root = client.sqrtm(&a.to_complex(), &options).unwrap();
        assert_eq!(root.dtype(), DType::Complex128);
    }
}

#[test]
fn test_sqrtm_block_sizes() {
    // Block sizes that do not divide n give the same root
    let client = create_cpu_client();
    let mut rng = seeded_rng(1234);
    for n in 1..8 {
        let re = random_uniform_matrix(&mut rng, n);
        let im = random_normal_matrix(&mut rng, n);
        let data: Vec<Complex128> = re
            .to_vec::<f64>()
            .iter()
            .zip(im.to_vec::<f64>())
            .map(|(&x, y)| Complex128::new(x, y))
            .collect();
        let a = Matrix::from_slice(&data, &[n, n]);

        let reference = client.sqrtm(&a, &SqrtmOptions::with_block_size(n)).unwrap();
        assert_square_root(&reference, &a, "unblocked");
        for block_size in 1..10 {
            let root = client
                .sqrtm(&a, &SqrtmOptions::with_block_size(block_size))
                .unwrap();
            assert_matrix_close(&root, &reference, 1e-9, 1e-12, "block size invariance");
        }
    }
}

#[test]
fn test_sqrtm_al_mohy_higham_experiment_1() {
    let client = create_cpu_client();
    let a = real_matrix(
        &[
            3.2346e-1, 3e4, 3e4, 3e4, //
            0.0, 3.0089e-1, 3e4, 3e4, //
            0.0, 0.0, 3.2210e-1, 3e4, //
            0.0, 0.0, 0.0, 3.0744e-1,
        ],
        4,
    );
    let root = client.sqrtm(&a, &SqrtmOptions::default()).unwrap();
    let round_trip = square(&root).to_vec::<f64>();
    assert_allclose_f64(&round_trip, &a.to_vec::<f64>(), 1e-5, 0.0, "experiment 1");
    // Lower triangle stays exact
    for i in 0..4 {
        for j in 0..i {
            assert_eq!(round_trip[i * 4 + j], 0.0);
        }
    }
}

#[test]
fn test_sqrtm_strict_upper_triangular_has_no_root() {
    let client = create_cpu_client();
    let a = real_matrix(
        &[
            0.0, 3.0, 0.0, 0.0, //
            0.0, 0.0, 3.0, 0.0, //
            0.0, 0.0, 0.0, 3.0, //
            0.0, 0.0, 0.0, 0.0,
        ],
        4,
    );
    let estimated = client
        .sqrtm_with_estimate(&a, &SqrtmOptions::default())
        .unwrap();
    assert!(estimated.matrix.is_all_nan());
    assert!(estimated.error_estimate.is_nan());
}

#[test]
fn test_sqrtm_weird_matrix() {
    // B = A² has a square root, but not one reachable from its Schur form
    let client = create_cpu_client();
    let a = real_matrix(&[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3);
    let b = real_matrix(&[0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 3);
    assert_eq!(square(&a), b);
    let root = client.sqrtm(&b, &SqrtmOptions::default()).unwrap();
    assert!(root.is_all_nan());
}

#[test]
fn test_sqrtm_zero_matrix() {
    let client = create_cpu_client();
    let a = Matrix::zeros(3, 3, DType::F64);
    let root = client.sqrtm(&a, &SqrtmOptions::default()).unwrap();
    assert_eq!(root.to_vec::<f64>(), vec![0.0; 9]);
}

#[test]
fn test_sqrtm_error_estimate() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(42);
    let a = random_uniform_matrix(&mut rng, 3);
    let estimated = client
        .sqrtm_with_estimate(&a, &SqrtmOptions::default())
        .unwrap();
    assert!(estimated.error_estimate < 1e-10);
    assert_square_root(&estimated.matrix, &a, "estimated root");
}
