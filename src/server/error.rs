//! Mapping of service errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::services::{AlbumError, FetchError};

/// Terms suggested when nothing was found.
const SUGGESTED_TERMS: &str = r#"Try "Mia Nanasawa" or "LinXingLan"."#;

/// Errors returned by JSON handlers.
#[derive(Debug)]
pub enum ApiError {
    Album(AlbumError),
    Fetch(FetchError),
    Unauthorized,
    /// Index segment that is not a number.
    BadIndex(String),
    NotCached(String),
    ImageNotFound { term: String, id: String },
    NoDownloads(String),
    Internal(String),
}

impl From<AlbumError> for ApiError {
    fn from(e: AlbumError) -> Self {
        ApiError::Album(e)
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        ApiError::Fetch(e)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

fn not_cached_message(term: &str) -> String {
    format!(
        "No cached images for {}. Call /api/album/{} first.",
        term, term
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Album(AlbumError::NotFound {
                term,
                attempts,
                search_url,
                last_error,
            }) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": format!("No images found for \"{}\".", term),
                    "suggestion": format!("{} Visit {} to confirm.", SUGGESTED_TERMS, search_url),
                    "attempts_made": attempts,
                    "search_url": search_url,
                    "last_error": last_error,
                }),
            ),
            ApiError::Album(AlbumError::InvalidIndex { index, links }) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!(
                        "Invalid gallery index {}. Choose between 1 and {}.",
                        index,
                        links.len()
                    ),
                    "index": index,
                    "total_links": links.len(),
                    "links": links,
                }),
            ),
            ApiError::Album(e) => {
                error!("Album lookup failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Server error: {}", e) }),
                )
            }
            ApiError::Fetch(e @ FetchError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, json!({ "error": e.to_string() }))
            }
            ApiError::Fetch(e) => {
                warn!("Upstream image fetch failed: {}", e);
                (StatusCode::BAD_GATEWAY, json!({ "error": e.to_string() }))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or missing API key. Pass it as ?apikey=" }),
            ),
            ApiError::BadIndex(raw) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": format!("Gallery index must be a positive number, got \"{}\".", raw),
                    "index": raw,
                    "total_links": 0,
                    "links": [],
                }),
            ),
            ApiError::NotCached(term) => (
                StatusCode::NOT_FOUND,
                json!({ "error": not_cached_message(&term) }),
            ),
            ApiError::ImageNotFound { term, id } => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Image ID {} not found for {}", id, term) }),
            ),
            ApiError::NoDownloads(term) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": format!(
                        "No downloaded images for {}. Call /bulk-download/{} first.",
                        term, term
                    )
                }),
            ),
            ApiError::Internal(message) => {
                error!("Request failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Server error: {}", message) }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_content_type_is_bad_gateway() {
        let (status, json) = body(ApiError::Fetch(FetchError::BadContentType {
            url: "https://a.imgbox.com/x.jpg".to_string(),
            content_type: "text/html".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"].as_str().unwrap().contains("text/html"));
    }

    #[tokio::test]
    async fn non_numeric_index_has_empty_links() {
        let (status, json) = body(ApiError::BadIndex("abc".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["links"], serde_json::json!([]));
        assert_eq!(json["total_links"], 0);
    }

    #[tokio::test]
    async fn cache_failures_are_internal_errors() {
        let err = AlbumError::Io(std::io::Error::other("disk full"));
        let (status, json) = body(ApiError::Album(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("disk full"));
    }
}
