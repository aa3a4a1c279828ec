//! Integration tests for trigonometric and hyperbolic matrix functions

mod common;

use common::{
    assert_allclose_f64, assert_matrix_close, complex_matrix, create_cpu_client,
    random_complex_matrix, random_normal_matrix, real_matrix, seeded_rng,
};
use matfun::algorithm::linalg::MatrixFunctionsAlgorithms;
use matfun::algorithm::linalg::matrix_functions::{Cosh, Sin, Sinh};
use matfun::dtype::DType;
use matfun::matrix::Matrix;

#[test]
fn test_trig_diagonal() {
    let client = create_cpu_client();
    let a = real_matrix(&[0.3, 0.0, 0.0, -1.2], 2);

    let cases: [(Matrix, fn(f64) -> f64, &str); 6] = [
        (client.cosm(&a).unwrap(), f64::cos, "cos"),
        (client.sinm(&a).unwrap(), f64::sin, "sin"),
        (client.tanm(&a).unwrap(), f64::tan, "tan"),
        (client.coshm(&a).unwrap(), f64::cosh, "cosh"),
        (client.sinhm(&a).unwrap(), f64::sinh, "sinh"),
        (client.tanhm(&a).unwrap(), f64::tanh, "tanh"),
    ];
    for (result, f, name) in cases {
        assert_eq!(result.dtype(), DType::F64, "{name}");
        let expected = [f(0.3), 0.0, 0.0, f(-1.2)];
        assert_allclose_f64(&result.to_vec::<f64>(), &expected, 1e-13, 1e-14, name);
    }
}

#[test]
fn test_trig_identities_random() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(2024);
    for n in 1..6 {
        for a in [
            random_normal_matrix(&mut rng, n),
            random_complex_matrix(&mut rng, n),
        ] {
            let identity = Matrix::identity(n, DType::F64);

            let cos = client.cosm(&a).unwrap();
            let sin = client.sinm(&a).unwrap();
            assert_eq!(cos.dtype(), a.dtype());
            let sum = cos
                .matmul(&cos)
                .unwrap()
                .sub(&sin.matmul(&sin).unwrap().scale(-1.0))
                .unwrap();
            assert_matrix_close(&sum, &identity, 1e-9, 1e-9, "cos² + sin² = I");

            let cosh = client.coshm(&a).unwrap();
            let sinh = client.sinhm(&a).unwrap();
            let diff = cosh
                .matmul(&cosh)
                .unwrap()
                .sub(&sinh.matmul(&sinh).unwrap())
                .unwrap();
            assert_matrix_close(&diff, &identity, 1e-9, 1e-9, "cosh² − sinh² = I");

            // cos·tan = sin, up to the conditioning of cos
            let tan = client.tanm(&a).unwrap();
            let residual = cos.matmul(&tan).unwrap().sub(&sin).unwrap().norm1();
            assert!(residual <= 1e-10 * cos.norm1() * tan.norm1().max(1.0));
        }
    }
}

#[test]
fn test_trig_matches_funm() {
    let client = create_cpu_client();
    let a = real_matrix(&[0.5, 1.0, 0.0, -0.3, 0.2, 0.7, 0.1, 0.0, -0.6], 3);
    assert_matrix_close(
        &client.sinm(&a).unwrap(),
        &client.funm(&a, &Sin).unwrap(),
        1e-12,
        1e-13,
        "sinm vs funm",
    );
    assert_matrix_close(
        &client.coshm(&a).unwrap(),
        &client.funm(&a, &Cosh).unwrap(),
        1e-12,
        1e-13,
        "coshm vs funm",
    );
    assert_matrix_close(
        &client.sinhm(&a).unwrap(),
        &client.funm(&a, &Sinh).unwrap(),
        1e-12,
        1e-13,
        "sinhm vs funm",
    );
}

#[test]
fn test_trig_complex_input() {
    // cos(iB) = cosh(B) for real B
    let client = create_cpu_client();
    let b = real_matrix(&[0.4, 1.0, -0.2, 0.3], 2);
    let ib = complex_matrix(&[(0.0, 0.4), (0.0, 1.0), (0.0, -0.2), (0.0, 0.3)], 2);
    let cos_ib = client.cosm(&ib).unwrap();
    assert_eq!(cos_ib.dtype(), DType::Complex128);
    let cosh_b = client.coshm(&b).unwrap();
    assert_matrix_close(&cos_ib, &cosh_b, 1e-13, 1e-14, "cos(iB) = cosh(B)");
}

#[test]
fn test_tanm_singular_cosine_is_nan() {
    // cos(π/2) = 0, so tan is undefined
    let client = create_cpu_client();
    let a = real_matrix(&[std::f64::consts::FRAC_PI_2], 1);
    let tan = client.tanm(&a).unwrap();
    assert!(tan.is_all_nan() || tan.to_vec::<f64>()[0].abs() > 1e15);
}
