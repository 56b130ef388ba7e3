//! Model configuration.
//!
//! A [`ModelConfig`] carries the target matrix a model is built around, the
//! factor matrices a caller may try to fix up front, and a free-form
//! parameter store read by the factorization algorithm run on the model.

use crate::{
    matrix::Matrix,
    types::{DMatrix, Scalar},
};
use std::collections::BTreeMap;
use std::fmt;

/// Value of an algorithm-specific parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value (ranks, iteration counts, seeds)
    Int(i64),
    /// Real value (tolerances, regularization weights)
    Float(f64),
    /// Free text (method names)
    Text(String),
}

impl ParamValue {
    /// Returns the value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(x) => Some(*x),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Ordered key-value store of algorithm parameters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one under the same key.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<ParamValue>
    where
        K: Into<String>,
        V: Into<ParamValue>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Looks up `key` as a boolean. Missing keys and other types give `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }

    /// Looks up `key` as an integer. Missing keys and other types give `None`.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_int)
    }

    /// Looks up `key` as a float; integers are widened.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_float)
    }

    /// Looks up `key` as text. Missing keys and other types give `None`.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_text)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Configuration a model is constructed from.
///
/// Models that compute their factors themselves reject `basis`, `coef` and
/// `secondary_coef` when set.
#[derive(Debug, Clone)]
pub struct ModelConfig<T: Scalar> {
    /// Matrix to approximate (V). Required.
    pub target: Option<Matrix<T>>,
    /// Further targets for multi-pair models (V1, V2, ...).
    pub secondary_targets: Vec<Matrix<T>>,
    /// Fixed basis matrix (W).
    pub basis: Option<DMatrix<T>>,
    /// Fixed coefficient matrix (H).
    pub coef: Option<DMatrix<T>>,
    /// Fixed secondary coefficient matrix (H1).
    pub secondary_coef: Option<DMatrix<T>>,
    /// Algorithm-specific parameters.
    pub params: Params,
}

impl<T: Scalar> Default for ModelConfig<T> {
    fn default() -> Self {
        Self {
            target: None,
            secondary_targets: Vec::new(),
            basis: None,
            coef: None,
            secondary_coef: None,
            params: Params::new(),
        }
    }
}

impl<T: Scalar> ModelConfig<T> {
    /// Configuration holding only a target.
    pub fn new(target: impl Into<Matrix<T>>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Create a new builder.
    pub fn builder() -> ModelConfigBuilder<T> {
        ModelConfigBuilder::new()
    }

    /// Names of the fixed factors that are set, in declaration order.
    pub fn fixed_factors(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.basis.is_some() {
            names.push("basis");
        }
        if self.coef.is_some() {
            names.push("coef");
        }
        if self.secondary_coef.is_some() {
            names.push("secondary_coef");
        }
        names
    }
}

/// Builder for creating a model configuration.
pub struct ModelConfigBuilder<T: Scalar> {
    config: ModelConfig<T>,
}

impl<T: Scalar> ModelConfigBuilder<T> {
    /// Create a new builder with an empty configuration.
    pub fn new() -> Self {
        Self {
            config: ModelConfig::default(),
        }
    }

    /// Set the target matrix.
    pub fn target(mut self, target: impl Into<Matrix<T>>) -> Self {
        self.config.target = Some(target.into());
        self
    }

    /// Append a secondary target.
    pub fn secondary_target(mut self, target: impl Into<Matrix<T>>) -> Self {
        self.config.secondary_targets.push(target.into());
        self
    }

    /// Set a fixed basis matrix.
    pub fn basis(mut self, basis: DMatrix<T>) -> Self {
        self.config.basis = Some(basis);
        self
    }

    /// Set a fixed coefficient matrix.
    pub fn coef(mut self, coef: DMatrix<T>) -> Self {
        self.config.coef = Some(coef);
        self
    }

    /// Set a fixed secondary coefficient matrix.
    pub fn secondary_coef(mut self, coef: DMatrix<T>) -> Self {
        self.config.secondary_coef = Some(coef);
        self
    }

    /// Set an algorithm parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.config.params.insert(key, value);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ModelConfig<T> {
        self.config
    }
}

impl<T: Scalar> Default for ModelConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
