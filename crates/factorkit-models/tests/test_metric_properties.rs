//! Property tests for the loss functions.
//!
//! Checks that both losses vanish on exact reconstructions, stay
//! non-negative, and agree between dense and sparse storage of the same
//! target.

use approx::assert_relative_eq;
use factorkit_core::{
    matrix::Matrix,
    metric::{euclidean, kl_divergence, Metric},
    model::reconstruct,
    sparse::CsrMatrix,
    test_utils::{exact_factors, random_positive, random_sparse},
    types::DMatrix,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn euclidean_vanishes_on_exact_factors(
        m in 1usize..8,
        k in 1usize..4,
        n in 1usize..8,
        seed in 0u64..1000,
    ) {
        let f = exact_factors::<f64>(m, k, n, seed);
        let estimate = reconstruct(&f.basis, &f.coef).unwrap();
        let v = Matrix::from(f.target);
        prop_assert!(euclidean(&v, &estimate).unwrap().abs() < 1e-20);
    }

    #[test]
    fn kl_vanishes_on_exact_positive_factors(
        m in 1usize..8,
        k in 1usize..4,
        n in 1usize..8,
        seed in 0u64..1000,
    ) {
        let f = exact_factors::<f64>(m, k, n, seed);
        let estimate = reconstruct(&f.basis, &f.coef).unwrap();
        let v = Matrix::from(f.target);
        prop_assert!(kl_divergence(&v, &estimate).unwrap().abs() < 1e-12);
    }

    #[test]
    fn losses_are_non_negative(
        m in 1usize..6,
        n in 1usize..6,
        seed in 0u64..1000,
    ) {
        let v = Matrix::from(random_positive::<f64>(m, n, seed));
        let estimate = random_positive::<f64>(m, n, seed + 17);
        prop_assert!(Metric::Euclidean.evaluate(&v, &estimate).unwrap() >= 0.0);
        // Generalized KL is non-negative up to rounding
        prop_assert!(Metric::Kl.evaluate(&v, &estimate).unwrap() >= -1e-12);
    }

    #[test]
    fn sparse_and_dense_storage_agree(
        m in 1usize..10,
        n in 1usize..10,
        density in 0.0f64..1.0,
        seed in 0u64..1000,
    ) {
        let sparse = random_sparse::<f64>(m, n, density, seed);
        let dense = sparse.to_dense();
        let estimate = random_positive::<f64>(m, n, seed + 3);

        let sparse = Matrix::from(sparse);
        let dense = Matrix::from(dense);
        for metric in [Metric::Euclidean, Metric::Kl] {
            let a = metric.evaluate(&sparse, &estimate).unwrap();
            let b = metric.evaluate(&dense, &estimate).unwrap();
            prop_assert!((a - b).abs() <= 1e-10 * (1.0 + b.abs()));
        }
    }
}

#[test]
fn test_kl_is_not_symmetric() {
    let a = DMatrix::<f64>::from_row_slice(1, 2, &[1.0, 4.0]);
    let b = DMatrix::from_row_slice(1, 2, &[2.0, 1.0]);
    let ab = kl_divergence(&Matrix::from(a.clone()), &b).unwrap();
    let ba = kl_divergence(&Matrix::from(b), &a).unwrap();
    assert!((ab - ba).abs() > 1e-3);
}

#[test]
fn test_euclidean_on_f32_sparse_target() {
    let dense = DMatrix::from_row_slice(2, 2, &[0.0f32, 2.0, 0.0, 0.0]);
    let v = Matrix::from(CsrMatrix::from_dense(&dense, 0.0));
    let estimate = DMatrix::from_element(2, 2, 1.0f32);
    // (0-1)² + (2-1)² + (0-1)² + (0-1)²
    assert_relative_eq!(euclidean(&v, &estimate).unwrap(), 4.0);
}
