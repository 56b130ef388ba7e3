//! # factorkit
//!
//! A common interface for matrix factorization models in Rust.
//!
//! A model wraps a target matrix `V` (dense or sparse) and the factors
//! `W`, `H` a factorization algorithm computes for it, and exposes the
//! estimate `W·H`, the residuals and the loss (squared Euclidean distance
//! or generalized Kullback-Leibler divergence).
//!
//! ## Quick Start
//!
//! ```rust
//! use factorkit::prelude::*;
//!
//! let v = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 6.0]);
//! let config = ModelConfig::builder().target(v).param("rank", 1).build();
//! let mut model = Smf::new(config)?;
//!
//! model.set_basis(DMatrix::from_row_slice(2, 1, &[1.0, 2.0]))?;
//! model.set_coef(DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]))?;
//!
//! assert_eq!(model.distance(Metric::Euclidean)?, 0.0);
//! assert_eq!(model.evar()?, 1.0);
//! # Ok::<(), factorkit::MfError>(())
//! ```
//!
//! ## Crate organization
//!
//! - `factorkit-core`: matrices, configuration, losses and capability traits
//! - `factorkit-models`: the single and multiple factor pair models

// Re-export core functionality
pub use factorkit_core::*;

// Linear algebra backend, so callers match its version
pub use nalgebra;

// Re-export models
pub use factorkit_models as models;
pub use factorkit_models::{Mmf, Smf};

/// Prelude module for convenient imports
pub mod prelude {
    pub use factorkit_core::prelude::*;
    pub use factorkit_models::{Mmf, Smf};
}
