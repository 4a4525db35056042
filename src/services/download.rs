//! Bulk download of a cached album to disk.
//!
//! Records are fetched one at a time with a fixed pause between fetches.
//! Files already on disk are skipped, so repeated runs only fetch what is
//! missing. A failed record is noted in the report and the run continues.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::album::AlbumError;
use super::fetch::ImageFetcher;
use crate::models::ImageRecord;
use crate::utils::{storage_segment, write_atomic};

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Downloaded,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub id: u32,
    pub name: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one bulk download.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDownloadReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

impl BulkDownloadReport {
    fn record(&mut self, record: &ImageRecord, status: FileStatus, error: Option<String>) {
        match status {
            FileStatus::Downloaded => self.downloaded += 1,
            FileStatus::Skipped => self.skipped += 1,
            FileStatus::Failed => self.failed += 1,
        }
        self.files.push(FileOutcome {
            id: record.id,
            name: record.name.clone(),
            status,
            error,
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }
}

/// Directory holding the downloaded files of one term.
pub fn album_dir(downloads_root: &Path, term: &str) -> PathBuf {
    downloads_root.join(storage_segment(term))
}

pub struct BulkDownloader {
    fetcher: Arc<dyn ImageFetcher>,
    delay: Duration,
}

impl BulkDownloader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    /// Fetch every record of `album` missing from `dir`.
    pub async fn run(
        &self,
        album: &[ImageRecord],
        dir: &Path,
    ) -> Result<BulkDownloadReport, AlbumError> {
        tokio::fs::create_dir_all(dir).await?;
        info!("Downloading {} images to {}", album.len(), dir.display());

        let mut report = BulkDownloadReport::default();
        let mut fetched_any = false;

        for record in album {
            let target = dir.join(&record.name);
            if tokio::fs::try_exists(&target).await.unwrap_or(false) {
                debug!("Skipping existing {}", record.name);
                report.record(record, FileStatus::Skipped, None);
                continue;
            }

            if fetched_any && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            fetched_any = true;

            let image = match self.fetcher.fetch(&record.url).await {
                Ok(image) => image,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", record.name, e);
                    report.record(record, FileStatus::Failed, Some(e.to_string()));
                    continue;
                }
            };

            let size = image.bytes.len();
            let path = target.clone();
            let written = tokio::task::spawn_blocking(move || write_atomic(&path, &image.bytes))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))
                .and_then(|r| r);

            match written {
                Ok(()) => {
                    info!("Downloaded {} ({} bytes)", record.name, size);
                    report.record(record, FileStatus::Downloaded, None);
                }
                Err(e) => {
                    warn!("Failed to write {}: {}", target.display(), e);
                    report.record(record, FileStatus::Failed, Some(e.to_string()));
                }
            }
        }

        info!(
            "Bulk download finished: {} downloaded, {} skipped, {} failed",
            report.downloaded, report.skipped, report.failed
        );
        Ok(report)
    }
}
