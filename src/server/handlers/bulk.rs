//! Bulk download of a cached album to the downloads directory.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::super::AppState;
use crate::server::error::ApiError;
use crate::services::{album_dir, BulkDownloadReport};

#[derive(Debug, Serialize)]
pub struct BulkDownloadResponse {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub total: usize,
    #[serde(flatten)]
    pub report: BulkDownloadReport,
    /// Listing of the saved files.
    pub listing: String,
}

/// `GET /bulk-download/:model`
pub async fn bulk_download(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<BulkDownloadResponse>, ApiError> {
    run(&state, model, None).await
}

/// `GET /bulk-download/:model/:index`
pub async fn bulk_download_indexed(
    State(state): State<AppState>,
    Path((model, index)): Path<(String, String)>,
) -> Result<Json<BulkDownloadResponse>, ApiError> {
    let index = index
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::NotCached(format!("{}/{}", model, index)))?;
    run(&state, model, Some(index)).await
}

async fn run(
    state: &AppState,
    model: String,
    index: Option<u32>,
) -> Result<Json<BulkDownloadResponse>, ApiError> {
    let album = match state.albums.cached(&model, index).await? {
        Some(album) if !album.is_empty() => album,
        _ => return Err(ApiError::NotCached(model)),
    };

    let dir = album_dir(&state.downloads_dir, &model);
    let report = state.downloader.run(&album, &dir).await?;

    Ok(Json(BulkDownloadResponse {
        listing: format!(
            "{}/downloads/{}",
            state.public_url,
            urlencoding::encode(&model)
        ),
        model,
        index,
        total: album.len(),
        report,
    }))
}
