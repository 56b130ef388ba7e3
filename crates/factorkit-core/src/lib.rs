//! Core traits and types for matrix factorization models.
//!
//! This crate provides the pieces every factorization model is built from:
//! a real-valued target matrix in dense or sparse storage, the configuration
//! a model is constructed from, the loss functions comparing a target with
//! its estimate, and the capability traits through which algorithms and
//! callers reach a model's factors.
//!
//! # Key Concepts
//!
//! - **Target (V)**: the matrix being approximated
//! - **Basis (W)** and **coefficients (H)**: the two factors, `V ≈ W·H`
//! - **Fitted estimate**: the reconstruction `W·H`
//! - **Loss**: squared Euclidean distance or generalized KL divergence
//!
//! # Modules
//!
//! - [`config`]: Model configuration and algorithm parameters
//! - [`error`]: Error type for model operations
//! - [`matrix`]: Dense / sparse target representation
//! - [`metric`]: Loss functions
//! - [`model`]: Capability traits and quality measures
//! - [`sparse`]: CSR and COO sparse matrices
//! - [`types`]: Scalar trait and type aliases

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod error;
pub mod matrix;
pub mod metric;
pub mod model;
pub mod sparse;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used items at the crate root
pub use error::{MfError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use factorkit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ModelConfig, ModelConfigBuilder, ParamValue, Params};
    pub use crate::error::{MfError, Result};
    pub use crate::matrix::Matrix;
    pub use crate::metric::Metric;
    pub use crate::model::{
        BasisProvider, CoefProvider, FactorModel, Factorize, IndexedCoefProvider,
        IndexedFactorModel, IndexedTargetProvider, Model, TargetProvider,
    };
    pub use crate::sparse::{CooMatrix, CsrMatrix};
    pub use crate::types::{DMatrix, DVector, Scalar};
}
