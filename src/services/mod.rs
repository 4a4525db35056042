//! Service layer shared by the HTTP server and the CLI.
//!
//! - `album`: cache-through album lookup
//! - `fetch`: image byte fetching with content-type validation
//! - `download`: sequential bulk download of a cached album

pub mod album;
pub mod download;
pub mod fetch;
#[cfg(test)]
pub(crate) mod stub;

pub use album::{AlbumError, AlbumLookup, AlbumService, CACHE_SOURCE};
pub use download::{album_dir, BulkDownloadReport, BulkDownloader, FileOutcome, FileStatus};
pub use fetch::{FetchError, FetchedImage, HttpImageFetcher, ImageFetcher};
