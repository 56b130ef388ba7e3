//! Error types for matrix factorization models.
//!
//! This module defines the single error type used throughout the library
//! for model construction, factor bookkeeping and quality measures.

use thiserror::Error;

/// Errors that can occur while building or evaluating a factorization model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MfError {
    /// Invalid model configuration.
    ///
    /// Raised at construction time, e.g. when the target matrix is missing
    /// or when fixed initialized factors are passed to a model that computes
    /// its factors itself.
    #[error("Invalid model configuration: {reason}")]
    Configuration {
        /// Description of the configuration error
        reason: String,
    },

    /// Distance metric name not recognized.
    #[error("Unknown distance metric: {metric}")]
    UnsupportedMetric {
        /// The name that was requested
        metric: String,
    },

    /// Dimension mismatch between matrices.
    ///
    /// This error occurs when factor shapes are incompatible with each other
    /// or with the target matrix.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A factor matrix has not been populated yet.
    #[error("Factor matrix `{factor}` has not been populated")]
    MissingFactor {
        /// Name of the missing factor
        factor: String,
    },

    /// Factor pair index out of range for a multi-pair model.
    #[error("Index {index} out of range for a model with {len} factor pairs")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of factor pairs held by the model
        len: usize,
    },

    /// Numerical problem, such as a value that cannot be represented
    /// in the model's scalar type.
    #[error("Numerical error: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Failure reported by a factorization algorithm run on the model.
    #[error("Factorization failed: {reason}")]
    Factorization {
        /// Description of the failure
        reason: String,
    },
}

impl MfError {
    /// Create a Configuration error with a custom reason.
    pub fn configuration<S: Into<String>>(reason: S) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedMetric error for the given name.
    pub fn unsupported_metric<S: Into<String>>(metric: S) -> Self {
        Self::UnsupportedMetric {
            metric: metric.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a MissingFactor error.
    pub fn missing_factor<S: Into<String>>(factor: S) -> Self {
        Self::MissingFactor {
            factor: factor.into(),
        }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create a Factorization error with a custom reason.
    pub fn factorization<S: Into<String>>(reason: S) -> Self {
        Self::Factorization {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce MfError.
pub type Result<T> = std::result::Result<T, MfError>;
