//! One JSON file per album under a cache root.
//!
//! Layout: `<root>/<term>/images.json` for term-only albums and
//! `<root>/<term>/gallery_<index>.json` for indexed ones.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{AlbumCache, CacheError};
use crate::models::{AlbumKey, ImageRecord};
use crate::utils::{storage_segment, write_atomic};

/// File-backed album cache.
#[derive(Debug, Clone)]
pub struct FileAlbumCache {
    root: PathBuf,
}

impl FileAlbumCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &AlbumKey) -> PathBuf {
        let file = match key.index {
            Some(index) => format!("gallery_{}.json", index),
            None => "images.json".to_string(),
        };
        self.root.join(storage_segment(&key.term)).join(file)
    }
}

#[async_trait]
impl AlbumCache for FileAlbumCache {
    async fn get(&self, key: &AlbumKey) -> Result<Option<Vec<ImageRecord>>, CacheError> {
        let path = self.entry_path(key);

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss for {}", key);
                return Ok(None);
            }
            Err(e) => {
                warn!("Unreadable cache entry {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_slice::<Vec<ImageRecord>>(&data) {
            Ok(records) => {
                debug!("Cache hit for {} ({} records)", key, records.len());
                Ok(Some(records))
            }
            Err(e) => {
                warn!("Corrupt cache entry {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &AlbumKey, records: &[ImageRecord]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let json = serde_json::to_vec_pretty(records)?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &json))
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))??;

        info!(
            "Cached {} records for {} at {}",
            records.len(),
            key,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::build_album;
    use tempfile::tempdir;

    fn album(key: &AlbumKey, n: usize) -> Vec<ImageRecord> {
        let urls: Vec<String> = (1..=n)
            .map(|i| format!("https://images2.imgbox.com/x/{}.jpg", i))
            .collect();
        build_album(key, &urls)
    }

    #[tokio::test]
    async fn missing_entry_is_none_and_empty_entry_is_some() {
        let dir = tempdir().unwrap();
        let cache = FileAlbumCache::new(dir.path());
        let key = AlbumKey::term("Mia Nanasawa");

        assert_eq!(cache.get(&key).await.unwrap(), None);

        cache.put_empty(&key).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn stored_album_reads_back_in_order() {
        let dir = tempdir().unwrap();
        let cache = FileAlbumCache::new(dir.path());
        let key = AlbumKey::indexed("testterm", 2);
        let records = album(&key, 5);

        cache.put(&key, &records).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(records));
        assert!(dir.path().join("testterm").join("gallery_2.json").exists());
        // Indexed and term-only keys are stored separately.
        assert_eq!(cache.get(&AlbumKey::term("testterm")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_entry_is_treated_as_miss() {
        let dir = tempdir().unwrap();
        let cache = FileAlbumCache::new(dir.path());
        let key = AlbumKey::term("broken");
        let path = cache.entry_path(&key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ not json").unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[test]
    fn entry_paths_stay_under_root() {
        let cache = FileAlbumCache::new("/srv/cache");
        let path = cache.entry_path(&AlbumKey::term("../../etc"));
        assert!(path.starts_with("/srv/cache"));
        assert_eq!(path.components().count(), 5);
    }

    #[tokio::test]
    async fn cache_file_is_formatted_json() {
        let dir = tempdir().unwrap();
        let cache = FileAlbumCache::new(dir.path());
        let key = AlbumKey::term("pretty");

        cache.put(&key, &album(&key, 1)).await.unwrap();

        let text = std::fs::read_to_string(cache.entry_path(&key)).unwrap();
        assert!(text.contains("\n  {"));
        assert!(text.contains("\"thumb\""));
    }
}
