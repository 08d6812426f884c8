use std::path::{Component, Path, PathBuf};

use axum::handler::HandlerWithoutStateExt;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use log::debug;
use tower_http::services::ServeDir;

/// Serve the output directory.
///
/// `/` and directories map to `index.html`; a missing path without an
/// extension falls back to `<path>.html`; anything else is a 404.
pub fn static_files_router<S>(out_dir: PathBuf) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let fallback_dir = out_dir.clone();
    let fallback = move |uri: Uri| {
        let out_dir = fallback_dir.clone();
        async move { serve_html_fallback(&out_dir, uri.path()).await }
    };

    let serve_dir = ServeDir::new(&out_dir)
        .append_index_html_on_directories(true)
        .fallback(fallback.into_service());

    Router::new().fallback_service(serve_dir)
}

async fn serve_html_fallback(out_dir: &Path, request_path: &str) -> Response {
    if let Some(candidate) = html_candidate(out_dir, request_path) {
        if let Ok(body) = tokio::fs::read(&candidate).await {
            debug!("Serving {} for {}", candidate.display(), request_path);
            return Html(body).into_response();
        }
    }
    handle_not_found(out_dir).await
}

/// `<out_dir>/<path>.html` for extensionless request paths that stay
/// inside `out_dir`
fn html_candidate(out_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_matches('/'));
    if relative.as_os_str().is_empty() || relative.extension().is_some() {
        return None;
    }
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return None;
    }

    let mut candidate = out_dir.join(relative);
    candidate.set_extension("html");
    Some(candidate)
}

/// Respond with `404.html` from the output directory when there is one
pub async fn handle_not_found(out_dir: &Path) -> Response {
    let custom_404 = out_dir.join("404.html");
    match tokio::fs::read(&custom_404).await {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, Html("<h1>404</h1><p>Page not found</p>")).into_response(),
    }
}
