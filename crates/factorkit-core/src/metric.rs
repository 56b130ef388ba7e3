//! Loss functions between a target matrix and its factorization estimate.
//!
//! Two losses are supported:
//!
//! - **Euclidean**: the squared Frobenius norm of the residuals,
//!   `Σ (V - WH)²`.
//! - **Kullback-Leibler**: the generalized KL divergence
//!   `Σ [V ln(V / WH) - V + WH]`. It is not symmetric and strictly is not
//!   a metric.

use crate::{
    error::{MfError, Result},
    matrix::Matrix,
    types::{DMatrix, Scalar},
};
use log::{trace, warn};
use num_traits::Float;
use std::fmt;
use std::str::FromStr;

/// Loss used to compare a target with its estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Squared Euclidean distance (squared Frobenius norm of the residuals).
    #[default]
    Euclidean,
    /// Generalized Kullback-Leibler divergence.
    Kl,
}

impl Metric {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Kl => "kl",
        }
    }

    /// Evaluates the loss between `target` and `estimate`.
    ///
    /// Fails with `DimensionMismatch` if the shapes differ.
    pub fn evaluate<T: Scalar>(&self, target: &Matrix<T>, estimate: &DMatrix<T>) -> Result<T> {
        let value = match self {
            Metric::Euclidean => euclidean(target, estimate)?,
            Metric::Kl => kl_divergence(target, estimate)?,
        };
        trace!(
            "{} distance over {}x{} target: {}",
            self.name(),
            target.nrows(),
            target.ncols(),
            value
        );
        Ok(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = MfError;

    /// Parses a metric name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "kl" => Ok(Metric::Kl),
            _ => Err(MfError::unsupported_metric(s)),
        }
    }
}

/// Squared Euclidean distance `Σ (V - WH)²`.
pub fn euclidean<T: Scalar>(target: &Matrix<T>, estimate: &DMatrix<T>) -> Result<T> {
    target.fold_with_dense(estimate, T::zero(), |acc, v, wh| {
        let r = v - wh;
        acc + r * r
    })
}

/// Generalized Kullback-Leibler divergence `Σ [V ln(V / WH) - V + WH]`.
///
/// Entries with `V = 0` contribute `WH` (the `0 ln 0 = 0` limit). Entries
/// with `V > 0` and `WH = 0` make the divergence infinite.
pub fn kl_divergence<T: Scalar>(target: &Matrix<T>, estimate: &DMatrix<T>) -> Result<T> {
    let mut degenerate = 0usize;
    let value = target.fold_with_dense(estimate, T::zero(), |acc, v, wh| {
        if v == T::zero() {
            return acc + wh;
        }
        if wh == T::zero() {
            degenerate += 1;
        }
        acc + v * Float::ln(v / wh) - v + wh
    })?;

    if degenerate > 0 {
        warn!(
            "KL divergence: {} positive target entries have a zero estimate",
            degenerate
        );
    }
    Ok(value)
}
