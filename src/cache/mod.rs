//! Persistent album cache.
//!
//! Read-through on every album request, write-through after every scrape.
//! An empty list records a prior "no images" result; callers treat it as a
//! reason to scrape again rather than as a permanent negative.

mod file;

pub use file::FileAlbumCache;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AlbumKey, ImageRecord};

/// Errors writing to the cache. Unreadable entries are reported as misses.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage for scraped albums.
#[async_trait]
pub trait AlbumCache: Send + Sync {
    /// `None` when nothing was ever stored for `key` (or the entry is unreadable).
    async fn get(&self, key: &AlbumKey) -> Result<Option<Vec<ImageRecord>>, CacheError>;

    async fn put(&self, key: &AlbumKey, records: &[ImageRecord]) -> Result<(), CacheError>;

    /// Record that a scrape for `key` found nothing.
    async fn put_empty(&self, key: &AlbumKey) -> Result<(), CacheError> {
        self.put(key, &[]).await
    }
}
