//! HTTP request handlers.

mod album;
mod bulk;
mod download;
mod listing;
mod nsfw;
mod pages;

pub use album::{album, album_indexed};
pub use bulk::{bulk_download, bulk_download_indexed};
pub use download::{download_image, download_image_indexed};
pub use listing::list_downloads;
pub use nsfw::{gallery, random_image};
pub use pages::{health, index};

use super::error::ApiError;

/// Parse a gallery index path segment.
fn parse_index(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadIndex(raw.to_string()))
}
