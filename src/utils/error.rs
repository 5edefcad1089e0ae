use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {reason} (got '{value}')")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Invalid model_type. Use 'logreg' or 'kmeans'.")]
    UnsupportedModelError { model_type: String },

    #[error("Failed to load model artifact '{path}': {message}")]
    ModelLoadError { path: String, message: String },

    #[error("{message}")]
    InferenceError { message: String },

    #[error("Training error: {message}")]
    TrainingError { message: String },

    #[error("{message}")]
    NotFoundError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    NotFound,
    Configuration,
    Model,
    Internal,
}

impl ServeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceError {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::TrainingError {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::UnsupportedModelError { .. } => {
                ErrorCategory::Client
            }
            Self::NotFoundError { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::ModelLoadError { .. } | Self::TrainingError { .. } => ErrorCategory::Model,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::InferenceError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Client => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Client => "Send {\"model_type\": \"logreg\"|\"kmeans\", \"features\": [4 numbers]}",
            ErrorCategory::NotFound => "Check the requested path and the static_files.dir setting",
            ErrorCategory::Configuration => "Check the TOML file and command-line flags",
            ErrorCategory::Model => "Run `train_models` to (re)generate the model artifacts",
            ErrorCategory::Internal => "Check the logs for details",
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request ({}): {}", status.as_u16(), self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServeError>;
