use crate::app::server::AppState;
use crate::domain::model::Prediction;
use crate::utils::error::Result;
use crate::utils::validation::parse_predict_request;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: String,
    pub version: String,
    pub started: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub app: String,
    pub version: String,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.app_info();
    Json(HealthResponse {
        status: "ok",
        app: info.name.clone(),
        version: info.version.clone(),
        started: info.started.to_rfc3339(),
    })
}

pub async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    let info = state.app_info();
    Json(VersionResponse {
        app: info.name.clone(),
        version: info.version.clone(),
    })
}

/// `POST /predict`. The body is parsed by hand so malformed JSON gets the
/// same `{"error": ...}` 400 as a missing field.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<Prediction>> {
    let request = parse_predict_request(&body)?;
    let prediction = state
        .registry()
        .predict(request.model_type, &request.features)?
        .echoing(request.raw_features);

    tracing::debug!(
        "predict model_type={} prediction={} label={:?}",
        prediction.model_type,
        prediction.prediction,
        prediction.label
    );
    Ok(Json(prediction))
}

pub async fn index(State(state): State<AppState>) -> Response {
    state.static_files().serve_index().await
}

pub async fn static_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    state.static_files().serve_asset(&path).await
}
