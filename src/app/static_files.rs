use crate::config::StaticFilesConfig;
use crate::utils::error::{Result, ServeError};
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};

const INDEX_FILE: &str = "index.html";

/// Front-end files under one root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_cache_control: String,
    asset_cache_control: String,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.dir.clone(),
            index_cache_control: config.index_cache_control.clone(),
            asset_cache_control: config.asset_cache_control.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path onto the static root.
    ///
    /// Returns `None` for anything that could leave the root: `..`, absolute
    /// or prefixed components, NUL bytes, or an empty path.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        if request_path.contains('\0') {
            return None;
        }

        let mut relative = PathBuf::new();
        for component in Path::new(request_path).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if relative.as_os_str().is_empty() {
            return None;
        }

        Some(self.root.join(relative))
    }

    pub async fn serve_index(&self) -> Response {
        match self.read(&self.root.join(INDEX_FILE)).await {
            Some(data) => self.file_response(INDEX_FILE, data, &self.index_cache_control),
            None => ServeError::not_found("UI not found").into_response(),
        }
    }

    pub async fn serve_asset(&self, request_path: &str) -> Response {
        let Some(path) = self.resolve(request_path) else {
            tracing::warn!("Rejected static path outside root: {:?}", request_path);
            return ServeError::not_found("Asset not found").into_response();
        };

        match self.read(&path).await {
            Some(data) => {
                let cache_control = if is_html(&path) {
                    &self.index_cache_control
                } else {
                    &self.asset_cache_control
                };
                self.file_response(request_path, data, cache_control)
            }
            None => ServeError::not_found("Asset not found").into_response(),
        }
    }

    /// Reads a regular file, refusing symlinks that point outside the root.
    async fn read(&self, path: &Path) -> Option<Vec<u8>> {
        match self.read_checked(path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Static file {} not served: {}", path.display(), e);
                None
            }
        }
    }

    async fn read_checked(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let root = tokio::fs::canonicalize(&self.root).await?;
        let target = tokio::fs::canonicalize(path).await?;

        if !target.starts_with(&root) {
            tracing::warn!("Static file {} resolves outside {}", path.display(), root.display());
            return Ok(None);
        }
        if !tokio::fs::metadata(&target).await?.is_file() {
            return Ok(None);
        }

        Ok(Some(tokio::fs::read(&target).await?))
    }

    fn file_response(&self, name: &str, data: Vec<u8>, cache_control: &str) -> Response {
        let mut response = Response::new(Body::from(data));
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type(Path::new(name))),
        );
        if let Ok(value) = HeaderValue::from_str(cache_control) {
            headers.insert(header::CACHE_CONTROL, value);
        }

        response
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
