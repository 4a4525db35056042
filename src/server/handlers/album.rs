//! Album lookup endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::super::AppState;
use super::parse_index;
use crate::models::ImageRecord;
use crate::scraper::GallerySelection;
use crate::server::error::ApiError;

#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    pub model: String,
    pub album: Vec<ImageRecord>,
    pub total: usize,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct IndexedAlbumResponse {
    pub model: String,
    pub index: i64,
    pub album: Vec<ImageRecord>,
    pub total: usize,
    pub source: String,
    pub gallery_url: Option<String>,
    pub search_url: String,
}

/// `GET /api/album/:model`
pub async fn album(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<AlbumResponse>, ApiError> {
    let found = state.albums.lookup(&model, GallerySelection::All).await?;

    Ok(Json(AlbumResponse {
        model,
        total: found.album.len(),
        album: found.album,
        source: found.source,
    }))
}

/// `GET /api/album/:model/:index`
pub async fn album_indexed(
    State(state): State<AppState>,
    Path((model, index)): Path<(String, String)>,
) -> Result<Json<IndexedAlbumResponse>, ApiError> {
    let index = parse_index(&index)?;
    let found = state
        .albums
        .lookup(&model, GallerySelection::Index(index))
        .await?;

    Ok(Json(IndexedAlbumResponse {
        model,
        index,
        total: found.album.len(),
        album: found.album,
        source: found.source,
        gallery_url: found.gallery_url,
        search_url: found.search_url,
    }))
}
