use crate::utils::error::{Result, ServeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Sepal length, sepal width, petal length, petal width.
pub const N_FEATURES: usize = 4;

pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// A single Iris measurement. Values are not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    pub fn new(values: [f64; N_FEATURES]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = ServeError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        let values: [f64; N_FEATURES] = values
            .try_into()
            .map_err(|_| ServeError::validation("expected 4 features for Iris"))?;
        Ok(Self(values))
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(features: FeatureVector) -> Self {
        features.0.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Logreg,
    Kmeans,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Logreg => "logreg",
            ModelType::Kmeans => "kmeans",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ServeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "logreg" => Ok(ModelType::Logreg),
            "kmeans" => Ok(ModelType::Kmeans),
            other => Err(ServeError::UnsupportedModelError {
                model_type: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Accepts both `setosa` and the UCI-style `Iris-setosa`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix("Iris-").unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .find(|species| species.name().eq_ignore_ascii_case(name))
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        }
    }
}

/// A validated `/predict` body.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub model_type: ModelType,
    pub features: FeatureVector,
    /// `features` exactly as the client sent it, echoed in the response.
    pub raw_features: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub model_type: ModelType,
    pub features: Value,
    pub prediction: usize,
    pub label: Option<String>,
}

impl Prediction {
    pub fn new(model_type: ModelType, features: &FeatureVector, class_id: usize) -> Self {
        Self {
            model_type,
            features: Value::from(features.as_slice().to_vec()),
            prediction: class_id,
            label: Species::from_index(class_id).map(|s| s.name().to_string()),
        }
    }

    /// Replaces the echoed features with the client's original value.
    pub fn echoing(mut self, raw_features: Value) -> Self {
        self.features = raw_features;
        self
    }
}
