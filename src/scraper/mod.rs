//! Album scraper for the origin site.
//!
//! [`ExtractionPipeline`] runs one browser session through the search and
//! gallery pages; [`RetryController`] repeats it until images turn up, the
//! attempt ceiling is reached, or a terminal failure occurs.

mod config;
mod error;
mod filter;
mod pipeline;
mod retry;
mod selectors;

pub use config::{ScrapeConfig, DEFAULT_ORIGIN_HOST, DEFAULT_SEARCH_URL};
pub use error::{FailureKind, ScrapeError};
pub use filter::{filter_gallery_links, filter_image_urls, is_accepted_image, RawImage, RawImageScan};
pub use pipeline::{select_gallery, Extraction, ExtractionPipeline, GallerySelection};
pub use retry::{backoff_delay, RetryController, ScrapeOutcome};
pub use selectors::ExtractionScripts;
