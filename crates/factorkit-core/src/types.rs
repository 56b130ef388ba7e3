//! Type definitions and aliases for factorization models.
//!
//! This module provides the scalar trait shared by every matrix in the
//! library, the dense matrix aliases and a few numerical constants.

use crate::error::{MfError, Result};
use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types stored in target and factor matrices (f32 or f64).
///
/// Element types are always real floating point, whatever the type of the
/// data a model was built from.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default tolerance for elementwise comparisons.
    const DEFAULT_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_from_f64` for a non-panicking version.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Try to convert from f64.
    ///
    /// Returns None if the conversion fails.
    fn try_from_f64(v: f64) -> Option<Self> {
        <Self as FromPrimitive>::from_f64(v)
    }

    /// Convert to f64 (for logging/display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails. Use `try_to_f64` for a non-panicking version.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Try to convert to f64.
    ///
    /// Returns None if the conversion fails.
    fn try_to_f64(self) -> Option<f64> {
        num_traits::cast(self)
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-4;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-10;
}

/// Type alias for a dynamically-sized dense matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// Converts a value of any primitive numeric type to a real scalar.
///
/// Fails with `NumericalError` when the value has no finite
/// representation in `T` (e.g. `f64::MAX` narrowed to `f32`).
pub fn cast_scalar<T, U>(v: U) -> Result<T>
where
    T: Scalar,
    U: ToPrimitive + Debug,
{
    let wide = v.to_f64().ok_or_else(|| {
        MfError::numerical_error(format!("cannot represent {:?} as a real value", v))
    })?;
    match T::try_from_f64(wide) {
        Some(x) if Float::is_finite(x) || !wide.is_finite() => Ok(x),
        _ => Err(MfError::numerical_error(format!(
            "{:?} is out of range for the target scalar type",
            v
        ))),
    }
}

/// Formats a `(rows, cols)` shape the way error messages report it.
pub fn shape_string(shape: (usize, usize)) -> String {
    format!("{}x{}", shape.0, shape.1)
}

/// Numerical constants for different precision levels.
pub mod constants {
    use super::Scalar;

    /// Get machine epsilon for the given scalar type.
    pub fn epsilon<T: Scalar>() -> T {
        T::EPSILON
    }

    /// Get default elementwise comparison tolerance.
    pub fn default_tolerance<T: Scalar>() -> T {
        T::DEFAULT_TOLERANCE
    }
}
