//! Landing page and health check.

use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

use super::super::templates;

/// `GET /`
pub async fn index() -> Html<String> {
    Html(templates::help_page())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
