//! Frontend pages
//!
//! `/` serves `index.html`; `/{name}.html` serves any other page that
//! exists in the frontend directory. Assets live under `/static`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::io::ErrorKind;
use std::path::PathBuf;

/// GET / - Landing page
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    serve_html(PathBuf::from(&state.config().frontend.dir).join("index.html")).await
}

/// GET /:page - Other HTML pages such as chat.html
pub async fn page(State(state): State<AppState>, Path(page): Path<String>) -> Result<Response, ApiError> {
    if !is_page_name(&page) {
        return Err(page_not_found());
    }
    serve_html(PathBuf::from(&state.config().frontend.dir).join(page)).await
}

/// A bare `*.html` file name with no path components
fn is_page_name(name: &str) -> bool {
    name.len() > ".html".len()
        && name.ends_with(".html")
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

async fn serve_html(path: PathBuf) -> Result<Response, ApiError> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], bytes).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(page_not_found()),
        Err(e) => Err(ApiError::Internal(e.into())),
    }
}

fn page_not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
