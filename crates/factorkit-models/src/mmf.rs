//! Multiple factor pair matrix factorization model.
//!
//! [`Mmf`] holds several targets `V_0 .. V_{p-1}` sharing one basis `W`,
//! each with its own coefficient matrix: `V_i ≈ W·H_i`. Every accessor
//! takes the index of the pair it works on.

use factorkit_core::{
    config::{ModelConfig, Params},
    error::{MfError, Result},
    matrix::Matrix,
    model::{BasisProvider, IndexedCoefProvider, IndexedTargetProvider, Model},
    types::{shape_string, DMatrix, Scalar},
};
use log::debug;

/// Identifier of the multiple factor pair model.
pub const MMF_MODEL_NAME: &str = "mmf";

/// Multiple factor pair model: shared basis, one coefficient matrix per target.
#[derive(Debug, Clone)]
pub struct Mmf<T: Scalar> {
    targets: Vec<Matrix<T>>,
    basis: Option<DMatrix<T>>,
    coefs: Vec<Option<DMatrix<T>>>,
    params: Params,
}

impl<T: Scalar> Mmf<T> {
    /// Builds the model from a configuration. The targets are `target`
    /// followed by `secondary_targets`.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` when the target is missing, when fixed
    /// factors are set, or when the targets do not share a row count.
    pub fn new(config: ModelConfig<T>) -> Result<Self> {
        let fixed = config.fixed_factors();
        if !fixed.is_empty() {
            return Err(MfError::configuration(format!(
                "passing fixed initialized factors ({}) is not supported in the MMF model",
                fixed.join(", ")
            )));
        }

        let first = config
            .target
            .ok_or_else(|| MfError::configuration("target matrix is required"))?;

        let targets: Vec<Matrix<T>> = std::iter::once(first)
            .chain(config.secondary_targets)
            .map(Matrix::normalize)
            .collect();

        let nrows = targets[0].nrows();
        if let Some((idx, t)) = targets.iter().enumerate().find(|(_, t)| t.nrows() != nrows) {
            return Err(MfError::configuration(format!(
                "targets share the basis and need {} rows, target {} has shape {}",
                nrows,
                idx,
                shape_string(t.shape())
            )));
        }

        debug!(
            "mmf model: {} targets with {} rows, {} parameters",
            targets.len(),
            nrows,
            config.params.len()
        );

        let coefs = vec![None; targets.len()];
        Ok(Self {
            targets,
            basis: None,
            coefs,
            params: config.params,
        })
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx >= self.targets.len() {
            return Err(MfError::index_out_of_range(idx, self.targets.len()));
        }
        Ok(())
    }

    /// Stores the shared basis matrix W.
    pub fn set_basis(&mut self, basis: DMatrix<T>) -> Result<()> {
        let nrows = self.targets[0].nrows();
        if basis.nrows() != nrows {
            return Err(MfError::dimension_mismatch(
                format!("basis with {} rows", nrows),
                format!("basis of shape {}", shape_string(basis.shape())),
            ));
        }
        debug!("mmf model: basis set to {}", shape_string(basis.shape()));
        self.basis = Some(basis);
        Ok(())
    }

    /// Stores the coefficient matrix paired with target `idx`.
    pub fn set_coef(&mut self, idx: usize, coef: DMatrix<T>) -> Result<()> {
        self.check_index(idx)?;
        let ncols = self.targets[idx].ncols();
        if coef.ncols() != ncols {
            return Err(MfError::dimension_mismatch(
                format!("coef[{}] with {} columns", idx, ncols),
                format!("coef of shape {}", shape_string(coef.shape())),
            ));
        }
        debug!("mmf model: coef[{}] set to {}", idx, shape_string(coef.shape()));
        self.coefs[idx] = Some(coef);
        Ok(())
    }

    /// Mutable access to the shared basis.
    pub fn basis_mut(&mut self) -> Option<&mut DMatrix<T>> {
        self.basis.as_mut()
    }

    /// Mutable access to coefficient matrix `idx`.
    pub fn coef_mut(&mut self, idx: usize) -> Result<Option<&mut DMatrix<T>>> {
        self.check_index(idx)?;
        Ok(self.coefs[idx].as_mut())
    }

    /// Consumes the model, returning `(W, [H_0, .., H_{p-1}])`.
    pub fn into_factors(self) -> (Option<DMatrix<T>>, Vec<Option<DMatrix<T>>>) {
        (self.basis, self.coefs)
    }
}

impl<T: Scalar> IndexedTargetProvider<T> for Mmf<T> {
    fn n_targets(&self) -> usize {
        self.targets.len()
    }

    fn target(&self, idx: usize) -> Result<&Matrix<T>> {
        self.check_index(idx)?;
        Ok(&self.targets[idx])
    }
}

impl<T: Scalar> BasisProvider<T> for Mmf<T> {
    fn basis(&self) -> Option<&DMatrix<T>> {
        self.basis.as_ref()
    }
}

impl<T: Scalar> IndexedCoefProvider<T> for Mmf<T> {
    fn coef(&self, idx: usize) -> Result<Option<&DMatrix<T>>> {
        self.check_index(idx)?;
        Ok(self.coefs[idx].as_ref())
    }
}

impl<T: Scalar> Model for Mmf<T> {
    fn model_name(&self) -> &'static str {
        MMF_MODEL_NAME
    }

    fn params(&self) -> &Params {
        &self.params
    }
}
