mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use iris_serve::app::{AppState, StaticFiles};
use iris_serve::config::StaticFilesConfig;
use iris_serve::build_router;
use tower::ServiceExt;

async fn get(state: &AppState, uri: &str) -> axum::response::Response {
    build_router(state.clone())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_serves_index_without_caching() {
    let test_app = common::spawn_state().await;
    let response = get(&test_app.state, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(body_text(response).await.contains("<title>iris</title>"));
}

#[tokio::test]
async fn test_assets_are_cached() {
    let test_app = common::spawn_state().await;

    let response = get(&test_app.state, "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=3600"
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/javascript; charset=utf-8"
    );

    let response = get(&test_app.state, "/css/site.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
}

#[tokio::test]
async fn test_html_assets_use_index_cache_policy() {
    let test_app = common::spawn_state().await;
    let response = get(&test_app.state, "/index.html").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
}

#[tokio::test]
async fn test_uppercase_html_extension_is_not_cached() {
    let test_app = common::spawn_state().await;
    let ui = test_app.static_dir.path().join("ui");
    std::fs::write(ui.join("PAGE.HTML"), "<p>upper</p>").unwrap();

    let response = get(&test_app.state, "/PAGE.HTML").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_missing_asset_is_json_404() {
    let test_app = common::spawn_state().await;
    let response = get(&test_app.state, "/missing.png").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "Asset not found");
}

#[tokio::test]
async fn test_directory_is_not_served() {
    let test_app = common::spawn_state().await;
    let response = get(&test_app.state, "/css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let test_app = common::spawn_state().await;

    for uri in ["/%2e%2e/secret.txt", "/css/%2e%2e/%2e%2e/secret.txt", "/..%2fsecret.txt"] {
        let response = get(&test_app.state, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
        assert!(!body_text(response).await.contains("do not serve"));
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_rejected() {
    let test_app = common::spawn_state().await;
    let ui = test_app.static_dir.path().join("ui");
    std::os::unix::fs::symlink(test_app.static_dir.path().join("secret.txt"), ui.join("leak.txt"))
        .unwrap();

    let response = get(&test_app.state, "/leak.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_index_is_json_404() {
    let test_app = common::spawn_state().await;
    let empty_dir = tempfile::TempDir::new().unwrap();
    let state = AppState::new(
        test_app.state.registry().clone(),
        StaticFiles::new(&StaticFilesConfig {
            dir: empty_dir.path().to_path_buf(),
            ..StaticFilesConfig::default()
        }),
        test_app.state.app_info().clone(),
    );

    let response = get(&state, "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "UI not found");
}

#[tokio::test]
async fn test_api_routes_take_precedence_over_assets() {
    let test_app = common::spawn_state().await;
    let response = get(&test_app.state, "/api/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}
