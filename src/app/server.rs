use crate::adapters::LocalStorage;
use crate::app::handlers;
use crate::app::static_files::StaticFiles;
use crate::config::ServiceConfig;
use crate::core::registry::ModelRegistry;
use crate::utils::error::{Result, ServeError};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub started: DateTime<Utc>,
}

impl AppInfo {
    /// Package name and version of this build, started now.
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started: Utc::now(),
        }
    }
}

/// Everything a handler needs; cloned per request, shared through `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    registry: ModelRegistry,
    static_files: StaticFiles,
    app_info: AppInfo,
}

impl AppState {
    pub fn new(registry: ModelRegistry, static_files: StaticFiles, app_info: AppInfo) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                static_files,
                app_info,
            }),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.inner.registry
    }

    pub fn static_files(&self) -> &StaticFiles {
        &self.inner.static_files
    }

    pub fn app_info(&self) -> &AppInfo {
        &self.inner.app_info
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/healthz", get(handlers::healthz))
        .route("/api/version", get(handlers::version))
        .route("/predict", post(handlers::predict))
        .route("/", get(handlers::index))
        .route("/{*path}", get(handlers::static_asset))
        .with_state(state)
}

/// Loads the models named by `config` and builds the application state.
pub async fn load_state(config: &ServiceConfig) -> Result<AppState> {
    let store = LocalStorage::new(config.models.dir.clone());
    let registry =
        ModelRegistry::load(&store, &config.models.logistic_file, &config.models.kmeans_file)
            .await?;

    let static_files = StaticFiles::new(&config.static_files);
    if !static_files.root().join("index.html").exists() {
        tracing::warn!(
            "No index.html under {}; GET / will answer 404",
            static_files.root().display()
        );
    }

    Ok(AppState::new(registry, static_files, AppInfo::current()))
}

/// Binds `config.server` and serves until Ctrl+C.
pub async fn serve(config: &ServiceConfig, state: AppState) -> Result<()> {
    let bind_addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| ServeError::ConfigError {
            message: format!("failed to bind {}: {}", bind_addr, e),
        })?;

    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
