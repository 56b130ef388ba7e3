//! Capability traits shared by factorization models.
//!
//! A model exposes its target, basis and coefficient matrices through small
//! provider traits. Single-pair models (one target, one coefficient matrix)
//! implement [`TargetProvider`] and [`CoefProvider`]; multi-pair models hold
//! an indexed collection and implement [`IndexedTargetProvider`] and
//! [`IndexedCoefProvider`] instead. Both kinds share a basis through
//! [`BasisProvider`].
//!
//! Quality measures come for free: [`FactorModel`] and [`IndexedFactorModel`]
//! are blanket-implemented on top of the providers.
//!
//! # Example
//!
//! ```
//! use factorkit_core::prelude::*;
//!
//! struct Pair {
//!     v: Matrix<f64>,
//!     w: Option<DMatrix<f64>>,
//!     h: Option<DMatrix<f64>>,
//! }
//!
//! impl TargetProvider<f64> for Pair {
//!     fn target(&self) -> &Matrix<f64> { &self.v }
//! }
//! impl BasisProvider<f64> for Pair {
//!     fn basis(&self) -> Option<&DMatrix<f64>> { self.w.as_ref() }
//! }
//! impl CoefProvider<f64> for Pair {
//!     fn coef(&self) -> Option<&DMatrix<f64>> { self.h.as_ref() }
//! }
//!
//! let pair = Pair {
//!     v: DMatrix::from_element(2, 2, 2.0).into(),
//!     w: Some(DMatrix::from_element(2, 1, 1.0)),
//!     h: Some(DMatrix::from_element(1, 2, 2.0)),
//! };
//! assert_eq!(pair.distance(Metric::Euclidean).unwrap(), 0.0);
//! ```

use crate::{
    config::Params,
    error::{MfError, Result},
    matrix::Matrix,
    metric::Metric,
    types::{shape_string, DMatrix, Scalar},
};
use num_traits::Float;

/// Access to the matrix a model approximates.
pub trait TargetProvider<T: Scalar> {
    /// The normalized target matrix V.
    fn target(&self) -> &Matrix<T>;
}

/// Access to the basis matrix W.
pub trait BasisProvider<T: Scalar> {
    /// Current basis, `None` until an algorithm has populated it.
    fn basis(&self) -> Option<&DMatrix<T>>;
}

/// Access to the coefficient matrix H of a single-pair model.
pub trait CoefProvider<T: Scalar> {
    /// Current coefficients, `None` until an algorithm has populated them.
    fn coef(&self) -> Option<&DMatrix<T>>;
}

/// Access to the targets of a multi-pair model.
pub trait IndexedTargetProvider<T: Scalar> {
    /// Number of target / coefficient pairs.
    fn n_targets(&self) -> usize;

    /// Target `idx`. Fails with `IndexOutOfRange` past the last target.
    fn target(&self, idx: usize) -> Result<&Matrix<T>>;
}

/// Access to the coefficient matrices of a multi-pair model.
pub trait IndexedCoefProvider<T: Scalar> {
    /// Coefficients paired with target `idx`, `None` until populated.
    fn coef(&self, idx: usize) -> Result<Option<&DMatrix<T>>>;
}

/// Reconstruction `W·H`.
///
/// Fails with `DimensionMismatch` if the inner dimensions disagree.
pub fn reconstruct<T: Scalar>(basis: &DMatrix<T>, coef: &DMatrix<T>) -> Result<DMatrix<T>> {
    if basis.ncols() != coef.nrows() {
        return Err(MfError::dimension_mismatch(
            format!("coef with {} rows", basis.ncols()),
            format!("coef of shape {}", shape_string(coef.shape())),
        ));
    }
    Ok(basis * coef)
}

/// Explained variance `1 - rss / Σ V²`.
///
/// Fails with `NumericalError` for an all-zero target, where the ratio is
/// undefined.
pub fn explained_variance<T: Scalar>(target: &Matrix<T>, rss: T) -> Result<T> {
    let total = target.sum_squares();
    if total == T::zero() {
        return Err(MfError::numerical_error(
            "explained variance is undefined for an all-zero target",
        ));
    }
    Ok(T::one() - rss / total)
}

fn factors<'a, T: Scalar>(
    basis: Option<&'a DMatrix<T>>,
    coef: Option<&'a DMatrix<T>>,
) -> Result<(&'a DMatrix<T>, &'a DMatrix<T>)> {
    let basis = basis.ok_or_else(|| MfError::missing_factor("basis"))?;
    let coef = coef.ok_or_else(|| MfError::missing_factor("coef"))?;
    Ok((basis, coef))
}

/// Quality measures of a single-pair model.
pub trait FactorModel<T: Scalar>: TargetProvider<T> + BasisProvider<T> + CoefProvider<T> {
    /// Estimated target `W·H`, same shape as the target.
    fn fitted(&self) -> Result<DMatrix<T>> {
        let (w, h) = factors(self.basis(), self.coef())?;
        reconstruct(w, h)
    }

    /// Loss between target and estimate.
    fn distance(&self, metric: Metric) -> Result<T> {
        metric.evaluate(self.target(), &self.fitted()?)
    }

    /// Loss selected by name, ignoring case.
    ///
    /// Fails with `UnsupportedMetric` for names other than
    /// `"euclidean"` and `"kl"`.
    fn distance_named(&self, metric: &str) -> Result<T> {
        self.distance(metric.parse()?)
    }

    /// Residuals `V - W·H`.
    fn residuals(&self) -> Result<DMatrix<T>> {
        self.target().sub_dense(&self.fitted()?)
    }

    /// Residual sum of squares.
    fn rss(&self) -> Result<T> {
        self.distance(Metric::Euclidean)
    }

    /// Explained variance `1 - rss / Σ V²`. See [`explained_variance`].
    fn evar(&self) -> Result<T> {
        explained_variance(self.target(), self.rss()?)
    }

    /// Root mean square of the residuals.
    ///
    /// Fails with `NumericalError` for a target without entries.
    fn rmse(&self) -> Result<T> {
        let (m, n) = self.target().shape();
        let count = match T::from_usize(m * n) {
            Some(count) if m * n > 0 => count,
            _ => {
                return Err(MfError::numerical_error(format!(
                    "root mean square error is undefined for a {} target",
                    shape_string((m, n))
                )))
            }
        };
        Ok(Float::sqrt(self.rss()? / count))
    }
}

impl<T, M> FactorModel<T> for M
where
    T: Scalar,
    M: TargetProvider<T> + BasisProvider<T> + CoefProvider<T> + ?Sized,
{
}

/// Quality measures of a multi-pair model, one per target index.
pub trait IndexedFactorModel<T: Scalar>:
    IndexedTargetProvider<T> + BasisProvider<T> + IndexedCoefProvider<T>
{
    /// Estimated target `W·H_idx`.
    fn fitted(&self, idx: usize) -> Result<DMatrix<T>> {
        let coef = self.coef(idx)?;
        let (w, h) = factors(self.basis(), coef)
            .map_err(|e| match e {
                MfError::MissingFactor { factor } if factor == "coef" => {
                    MfError::missing_factor(format!("coef[{}]", idx))
                }
                other => other,
            })?;
        reconstruct(w, h)
    }

    /// Loss between target `idx` and its estimate.
    fn distance(&self, metric: Metric, idx: usize) -> Result<T> {
        metric.evaluate(self.target(idx)?, &self.fitted(idx)?)
    }

    /// Loss selected by name, ignoring case.
    fn distance_named(&self, metric: &str, idx: usize) -> Result<T> {
        self.distance(metric.parse()?, idx)
    }

    /// Residuals `V_idx - W·H_idx`.
    fn residuals(&self, idx: usize) -> Result<DMatrix<T>> {
        self.target(idx)?.sub_dense(&self.fitted(idx)?)
    }

    /// Residual sum of squares for pair `idx`.
    fn rss(&self, idx: usize) -> Result<T> {
        self.distance(Metric::Euclidean, idx)
    }

    /// Explained variance for pair `idx`.
    fn evar(&self, idx: usize) -> Result<T> {
        explained_variance(self.target(idx)?, self.rss(idx)?)
    }
}

impl<T, M> IndexedFactorModel<T> for M
where
    T: Scalar,
    M: IndexedTargetProvider<T> + BasisProvider<T> + IndexedCoefProvider<T> + ?Sized,
{
}

/// Entry point of a concrete factorization algorithm.
///
/// The algorithm reads the model's target and parameters and populates its
/// factors.
pub trait Factorize<M: ?Sized> {
    /// What the algorithm reports when it finishes.
    type Output;

    /// Runs the algorithm on `model`.
    fn factorize(&mut self, model: &mut M) -> Result<Self::Output>;
}

/// Common surface of every factorization model.
pub trait Model {
    /// Identifier of the model variant.
    fn model_name(&self) -> &'static str;

    /// Parameters handed over at construction.
    fn params(&self) -> &Params;

    /// Runs `algorithm` on this model.
    fn run<A>(&mut self, algorithm: &mut A) -> Result<A::Output>
    where
        A: Factorize<Self>,
        Self: Sized,
    {
        algorithm.factorize(self)
    }
}
