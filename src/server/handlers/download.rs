//! Single image download by id.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use super::super::AppState;
use crate::server::error::ApiError;

/// `GET /download/:model/:image_id`
pub async fn download_image(
    State(state): State<AppState>,
    Path((model, image_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    send_image(&state, model, None, image_id).await
}

/// `GET /download/:model/:index/:image_id`
pub async fn download_image_indexed(
    State(state): State<AppState>,
    Path((model, index, image_id)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let index = match index.trim().parse::<u32>() {
        Ok(index) => index,
        Err(_) => return Err(ApiError::NotCached(format!("{}/{}", model, index))),
    };
    send_image(&state, model, Some(index), image_id).await
}

async fn send_image(
    state: &AppState,
    model: String,
    index: Option<u32>,
    image_id: String,
) -> Result<Response, ApiError> {
    let album = match state.albums.cached(&model, index).await? {
        Some(album) if !album.is_empty() => album,
        _ => return Err(ApiError::NotCached(model)),
    };

    let record = image_id
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|id| album.iter().find(|r| r.id == id))
        .ok_or_else(|| ApiError::ImageNotFound {
            term: model.clone(),
            id: image_id.clone(),
        })?;

    let image = state.fetcher.fetch(&record.url).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        record.name.replace(['"', '\\'], "_")
    );

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        image.bytes,
    )
        .into_response())
}
