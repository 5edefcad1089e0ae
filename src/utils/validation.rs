use crate::domain::model::{FeatureVector, ModelType, PredictRequest, N_FEATURES};
use crate::utils::error::{Result, ServeError};
use serde_json::Value;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ServeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ServeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ServeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ServeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Converts the `features` field of a request into a [`FeatureVector`].
///
/// Items may be JSON numbers or strings holding a number (`"5.1"`).
pub fn validate_features(value: &Value) -> Result<FeatureVector> {
    let items = value
        .as_array()
        .ok_or_else(|| ServeError::validation("features must be an array of numbers"))?;

    let values = items
        .iter()
        .map(|item| {
            feature_value(item).ok_or_else(|| ServeError::validation("features must be numeric"))
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != N_FEATURES {
        return Err(ServeError::validation("expected 4 features for Iris"));
    }

    FeatureVector::try_from(values)
}

/// Parses a `/predict` body.
///
/// Bodies that are not a JSON object are treated like an empty object, so
/// they fail on the required-field check. Checks run in order: required
/// fields, feature vector, model type.
pub fn parse_predict_request(body: &[u8]) -> Result<PredictRequest> {
    let data = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };

    let model_type = data.get("model_type").filter(|v| is_truthy(v));
    let features = data.get("features").filter(|v| !v.is_null());

    let (model_type, features) = match (model_type, features) {
        (Some(m), Some(f)) => (m, f),
        _ => {
            return Err(ServeError::validation(
                "model_type and features are required",
            ))
        }
    };

    let raw_features = features.clone();
    let features = validate_features(features)?;

    let model_type = match model_type.as_str() {
        Some(name) => name.parse::<ModelType>()?,
        None => {
            return Err(ServeError::UnsupportedModelError {
                model_type: model_type.to_string(),
            })
        }
    };

    Ok(PredictRequest {
        model_type,
        features,
        raw_features,
    })
}

fn feature_value(item: &Value) -> Option<f64> {
    match item {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `null`, `false`, `0`, `""`, `[]` and `{}` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
    }
}
