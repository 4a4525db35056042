//! Listing of downloaded files.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::super::AppState;
use crate::server::error::ApiError;
use crate::services::album_dir;
use crate::utils::storage_segment;

#[derive(Debug, Serialize)]
pub struct DownloadedFile {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct DownloadsResponse {
    pub model: String,
    pub files: Vec<DownloadedFile>,
    pub total: usize,
}

/// `GET /downloads/:model`
pub async fn list_downloads(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<DownloadsResponse>, ApiError> {
    let dir = album_dir(&state.downloads_dir, &model);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NoDownloads(model));
        }
        Err(e) => return Err(e.into()),
    };

    // The directory name is already percent-encoded; encode it again so the
    // static route decodes it back to the on-disk name.
    let segment = urlencoding::encode(&storage_segment(&model)).into_owned();
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        // In-flight temp files from a concurrent bulk download.
        if name.starts_with('.') {
            continue;
        }
        files.push(DownloadedFile {
            url: format!(
                "{}/files/{}/{}",
                state.public_url,
                segment,
                urlencoding::encode(&name)
            ),
            content_type: mime_guess::from_path(&name)
                .first_or_octet_stream()
                .to_string(),
            size: metadata.len(),
            name,
        });
    }

    if files.is_empty() {
        return Err(ApiError::NoDownloads(model));
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(DownloadsResponse {
        model,
        total: files.len(),
        files,
    }))
}
