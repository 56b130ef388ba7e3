//! Standard (single factor pair) matrix factorization model.
//!
//! [`Smf`] holds one target `V` and one factor pair `(W, H)` with
//! `V ≈ W·H`. It is the model standard NMF-style algorithms run on: the
//! algorithm reads the target and the parameters, then stores the factors it
//! computes with [`Smf::set_basis`] and [`Smf::set_coef`].
//!
//! # Example
//!
//! ```
//! use factorkit_core::prelude::*;
//! use factorkit_models::Smf;
//!
//! let v = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
//! let mut model = Smf::new(ModelConfig::new(v)).unwrap();
//!
//! model.set_basis(DMatrix::from_row_slice(2, 1, &[1.0, 2.0])).unwrap();
//! model.set_coef(DMatrix::from_row_slice(1, 2, &[1.0, 2.0])).unwrap();
//!
//! assert_eq!(model.distance(Metric::Euclidean).unwrap(), 0.0);
//! assert_eq!(model.distance_named("KL").unwrap(), 0.0);
//! ```

use factorkit_core::{
    config::{ModelConfig, Params},
    error::{MfError, Result},
    matrix::Matrix,
    model::{BasisProvider, CoefProvider, Model, TargetProvider},
    types::{shape_string, DMatrix, Scalar},
};
use log::debug;

/// Identifier of the single factor pair model.
pub const SMF_MODEL_NAME: &str = "smf";

/// Single factor pair model: one target, one basis, one coefficient matrix.
#[derive(Debug, Clone)]
pub struct Smf<T: Scalar> {
    target: Matrix<T>,
    basis: Option<DMatrix<T>>,
    coef: Option<DMatrix<T>>,
    params: Params,
}

impl<T: Scalar> Smf<T> {
    /// Builds the model from a configuration.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` when the target is missing, when any of
    /// `basis`, `coef` or `secondary_coef` is set (fixed initialized factors
    /// are not supported), or when secondary targets are given.
    pub fn new(config: ModelConfig<T>) -> Result<Self> {
        let fixed = config.fixed_factors();
        if !fixed.is_empty() {
            return Err(MfError::configuration(format!(
                "passing fixed initialized factors ({}) is not supported in the SMF model",
                fixed.join(", ")
            )));
        }

        if !config.secondary_targets.is_empty() {
            return Err(MfError::configuration(format!(
                "the SMF model holds a single target, got {} secondary targets",
                config.secondary_targets.len()
            )));
        }

        let target = config
            .target
            .ok_or_else(|| MfError::configuration("target matrix is required"))?
            .normalize();

        debug!(
            "smf model: {} target {}, {} parameters",
            if target.is_sparse() { "sparse" } else { "dense" },
            shape_string(target.shape()),
            config.params.len()
        );

        Ok(Self {
            target,
            basis: None,
            coef: None,
            params: config.params,
        })
    }

    /// Stores the basis matrix W.
    ///
    /// Fails with `DimensionMismatch` if W does not have one row per target row.
    pub fn set_basis(&mut self, basis: DMatrix<T>) -> Result<()> {
        if basis.nrows() != self.target.nrows() {
            return Err(MfError::dimension_mismatch(
                format!("basis with {} rows", self.target.nrows()),
                format!("basis of shape {}", shape_string(basis.shape())),
            ));
        }
        debug!("smf model: basis set to {}", shape_string(basis.shape()));
        self.basis = Some(basis);
        Ok(())
    }

    /// Stores the coefficient matrix H.
    ///
    /// Fails with `DimensionMismatch` if H does not have one column per
    /// target column.
    pub fn set_coef(&mut self, coef: DMatrix<T>) -> Result<()> {
        if coef.ncols() != self.target.ncols() {
            return Err(MfError::dimension_mismatch(
                format!("coef with {} columns", self.target.ncols()),
                format!("coef of shape {}", shape_string(coef.shape())),
            ));
        }
        debug!("smf model: coef set to {}", shape_string(coef.shape()));
        self.coef = Some(coef);
        Ok(())
    }

    /// Mutable access to the basis, for in-place updates.
    pub fn basis_mut(&mut self) -> Option<&mut DMatrix<T>> {
        self.basis.as_mut()
    }

    /// Mutable access to the coefficients, for in-place updates.
    pub fn coef_mut(&mut self) -> Option<&mut DMatrix<T>> {
        self.coef.as_mut()
    }

    /// Factorization rank, once the basis is known.
    pub fn rank(&self) -> Option<usize> {
        self.basis.as_ref().map(|w| w.ncols())
    }

    /// Consumes the model, returning `(W, H)`.
    pub fn into_factors(self) -> (Option<DMatrix<T>>, Option<DMatrix<T>>) {
        (self.basis, self.coef)
    }
}

impl<T: Scalar> TargetProvider<T> for Smf<T> {
    fn target(&self) -> &Matrix<T> {
        &self.target
    }
}

impl<T: Scalar> BasisProvider<T> for Smf<T> {
    fn basis(&self) -> Option<&DMatrix<T>> {
        self.basis.as_ref()
    }
}

impl<T: Scalar> CoefProvider<T> for Smf<T> {
    fn coef(&self) -> Option<&DMatrix<T>> {
        self.coef.as_ref()
    }
}

impl<T: Scalar> Model for Smf<T> {
    fn model_name(&self) -> &'static str {
        SMF_MODEL_NAME
    }

    fn params(&self) -> &Params {
        &self.params
    }
}
