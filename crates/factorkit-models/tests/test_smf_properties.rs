//! Property tests for the single factor pair model.
//!
//! Covers construction from dense and sparse targets, rejection of fixed
//! factors, and the relations between fitted values, residuals and losses.

use approx::assert_relative_eq;
use factorkit_core::{
    config::ModelConfig,
    error::MfError,
    matrix::Matrix,
    metric::Metric,
    model::{BasisProvider, CoefProvider, FactorModel, TargetProvider},
    sparse::CsrMatrix,
    test_utils::{exact_factors, random_positive, random_sparse, random_uniform},
    types::DMatrix,
};
use factorkit_models::Smf;
use proptest::prelude::*;

fn populated(target: impl Into<Matrix<f64>>, w: DMatrix<f64>, h: DMatrix<f64>) -> Smf<f64> {
    let mut model = Smf::new(ModelConfig::new(target)).unwrap();
    model.set_basis(w).unwrap();
    model.set_coef(h).unwrap();
    model
}

proptest! {
    #[test]
    fn dense_target_round_trips(
        m in 1usize..10,
        n in 1usize..10,
        seed in 0u64..1000,
    ) {
        let v = random_uniform::<f64>(m, n, -5.0, 5.0, seed);
        let model = Smf::new(ModelConfig::new(v.clone())).unwrap();
        prop_assert_eq!(model.target().to_dense().into_owned(), v);
    }

    #[test]
    fn sparse_target_round_trips(
        m in 1usize..10,
        n in 1usize..10,
        density in 0.0f64..1.0,
        seed in 0u64..1000,
    ) {
        let v = random_sparse::<f64>(m, n, density, seed);
        let expected = v.to_dense();
        let model = Smf::new(ModelConfig::new(v)).unwrap();
        prop_assert!(model.target().is_sparse());
        prop_assert_eq!(model.target().to_dense().into_owned(), expected);
    }

    #[test]
    fn residuals_are_target_minus_fitted(
        m in 1usize..8,
        k in 1usize..4,
        n in 1usize..8,
        seed in 0u64..1000,
    ) {
        let v = random_positive::<f64>(m, n, seed);
        let w = random_positive::<f64>(m, k, seed + 1);
        let h = random_positive::<f64>(k, n, seed + 2);
        let model = populated(v.clone(), w.clone(), h.clone());

        let fitted = model.fitted().unwrap();
        prop_assert_eq!(&fitted, &(&w * &h));
        prop_assert_eq!(model.residuals().unwrap(), &v - &fitted);
        prop_assert_eq!(model.basis(), Some(&w));
        prop_assert_eq!(model.coef(), Some(&h));
    }

    #[test]
    fn euclidean_distance_is_squared_residual_norm(
        m in 1usize..8,
        k in 1usize..4,
        n in 1usize..8,
        seed in 0u64..1000,
    ) {
        let v = random_positive::<f64>(m, n, seed);
        let w = random_positive::<f64>(m, k, seed + 5);
        let h = random_positive::<f64>(k, n, seed + 6);
        let model = populated(v, w, h);

        let expected = model.residuals().unwrap().norm_squared();
        let got = model.distance(Metric::Euclidean).unwrap();
        prop_assert!((got - expected).abs() <= 1e-9 * (1.0 + expected));
        prop_assert_eq!(model.rss().unwrap(), got);
    }

    #[test]
    fn exact_factors_have_zero_loss(
        m in 1usize..8,
        k in 1usize..4,
        n in 1usize..8,
        seed in 0u64..1000,
    ) {
        let f = exact_factors::<f64>(m, k, n, seed);
        let model = populated(f.target, f.basis, f.coef);
        prop_assert!(model.distance(Metric::Euclidean).unwrap().abs() < 1e-20);
        prop_assert!(model.distance(Metric::Kl).unwrap().abs() < 1e-12);
    }
}

#[test]
fn test_every_fixed_factor_combination_is_rejected() {
    for mask in 1u8..8 {
        let mut builder = ModelConfig::builder().target(DMatrix::<f64>::from_element(2, 2, 1.0));
        if mask & 1 != 0 {
            builder = builder.basis(DMatrix::zeros(2, 1));
        }
        if mask & 2 != 0 {
            builder = builder.coef(DMatrix::zeros(1, 2));
        }
        if mask & 4 != 0 {
            builder = builder.secondary_coef(DMatrix::zeros(1, 2));
        }

        let result = Smf::new(builder.build());
        assert!(
            matches!(result, Err(MfError::Configuration { .. })),
            "mask {:03b} was accepted",
            mask
        );
    }
}

#[test]
fn test_metric_name_case_is_ignored() {
    let f = exact_factors::<f64>(4, 2, 3, 9);
    let mut noisy = f.target.clone();
    noisy[(0, 0)] += 0.5;
    let model = populated(noisy, f.basis, f.coef);

    let lower = model.distance_named("euclidean").unwrap();
    let upper = model.distance_named("EUCLIDEAN").unwrap();
    assert_eq!(lower, upper);
    assert_relative_eq!(lower, 0.25, epsilon = 1e-12);
    assert_eq!(model.distance_named("Kl").unwrap(), model.distance(Metric::Kl).unwrap());
}

#[test]
fn test_unknown_metric_is_rejected() {
    let f = exact_factors::<f64>(3, 1, 3, 1);
    let model = populated(f.target, f.basis, f.coef);
    for name in ["manhattan", "cosine", "", "euclid"] {
        assert_eq!(
            model.distance_named(name).unwrap_err(),
            MfError::unsupported_metric(name)
        );
    }
}

#[test]
fn test_sparse_and_dense_models_agree() {
    let w = random_positive::<f64>(6, 2, 4);
    let h = random_positive::<f64>(2, 5, 5);
    let v = random_sparse::<f64>(6, 5, 0.4, 6);
    let dense_v = v.to_dense();

    let sparse_model = populated(v, w.clone(), h.clone());
    let dense_model = populated(dense_v, w, h);

    assert_eq!(sparse_model.residuals().unwrap(), dense_model.residuals().unwrap());
    for metric in [Metric::Euclidean, Metric::Kl] {
        assert_relative_eq!(
            sparse_model.distance(metric).unwrap(),
            dense_model.distance(metric).unwrap(),
            max_relative = 1e-10
        );
    }
}

#[test]
fn test_integer_target_is_converted() {
    let counts = DMatrix::from_row_slice(2, 2, &[1u32, 0, 3, 7]);
    let target = Matrix::<f64>::from_dense_cast(&counts).unwrap();
    let model = Smf::new(ModelConfig::new(target)).unwrap();
    assert_eq!(
        model.target().as_dense().unwrap(),
        &DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 3.0, 7.0])
    );

    let sparse = CsrMatrix::<f32>::from_parts_cast(1, 3, vec![0, 2], vec![0, 2], vec![2u8, 5]).unwrap();
    let model = Smf::new(ModelConfig::new(sparse)).unwrap();
    assert_eq!(model.target().to_dense()[(0, 2)], 5.0f32);
}

#[test]
fn test_unpopulated_factors() {
    let model = Smf::new(ModelConfig::new(DMatrix::<f64>::identity(3, 3))).unwrap();
    assert_eq!(model.fitted().unwrap_err(), MfError::missing_factor("basis"));
    assert!(model.distance(Metric::Euclidean).is_err());
    assert!(model.residuals().is_err());
}
