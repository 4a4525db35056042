//! Random image proxy and cached gallery page.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use super::super::{templates, AppState};
use crate::scraper::GallerySelection;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ApiKeyQuery {
    pub apikey: Option<String>,
}

/// `GET /api/nsfw/:model?apikey=`
///
/// The key is checked before anything else, so an unauthorized caller never
/// triggers a scrape or learns whether an album is cached.
pub async fn random_image(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(query): Query<ApiKeyQuery>,
) -> Result<Response, ApiError> {
    if !state.accepts_key(query.apikey.as_deref()) {
        return Err(ApiError::Unauthorized);
    }

    let found = state.albums.lookup(&model, GallerySelection::All).await?;
    if found.album.is_empty() {
        return Err(ApiError::NotCached(model));
    }
    let pick = rand::rng().random_range(0..found.album.len());
    let record = &found.album[pick];
    info!("Serving random image {} for {}", record.id, model);

    let image = state.fetcher.fetch(&record.url).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}

/// `GET /api/nsfw/:model/:index`: cached album rendered as HTML.
pub async fn gallery(
    State(state): State<AppState>,
    Path((model, index)): Path<(String, String)>,
) -> Response {
    let not_found = |message: String| {
        (
            StatusCode::NOT_FOUND,
            Html(templates::error_page("Gallery not found", &message)),
        )
            .into_response()
    };

    let Ok(index) = index.trim().parse::<u32>() else {
        return not_found(format!("\"{}\" is not a gallery number.", index));
    };

    match state.albums.cached(&model, Some(index)).await {
        Ok(Some(album)) if !album.is_empty() => {
            Html(templates::gallery_page(&model, index, &album)).into_response()
        }
        Ok(_) => not_found(format!(
            "No cached images for {} gallery {}. Call /api/album/{}/{} first.",
            model, index, model, index
        )),
        Err(e) => {
            warn!("Cache read failed for {}: {}", model, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(templates::error_page("Server error", &e.to_string())),
            )
                .into_response()
        }
    }
}
