//! Tuning for the extraction pipeline and retry loop.

use std::time::Duration;

/// Search endpoint of the origin site; the encoded term is appended.
pub const DEFAULT_SEARCH_URL: &str = "https://ahottie.net/?s=";

/// Tag listing on the origin site, tried when a search lists no galleries.
pub const DEFAULT_TAG_URL: &str = "https://ahottie.net/tags/";

/// Origin host; also reported as the album `source` after a fresh scrape.
pub const DEFAULT_ORIGIN_HOST: &str = "ahottie.net";

/// Scrape configuration.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub search_url: String,
    pub tag_url: String,
    pub origin_host: String,
    /// Upper bound for a single navigation.
    pub navigation_timeout: Duration,
    /// Scroll-to-bottom passes after each page load, to trigger lazy loading.
    pub scroll_steps: u32,
    pub scroll_pause: Duration,
    /// Maximum time spent waiting for the DOM to stop changing.
    pub settle_max: Duration,
    pub settle_poll: Duration,
    pub max_attempts: u32,
    /// Base delay between attempts; doubled each attempt.
    pub retry_backoff: Duration,
    /// Cap on image URLs returned by one extraction.
    pub max_images: usize,
    /// Galleries visited by the simple (term-only) variant.
    pub max_galleries: usize,
    /// The simple variant stops visiting galleries once it has this many images.
    pub early_stop_images: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            tag_url: DEFAULT_TAG_URL.to_string(),
            origin_host: DEFAULT_ORIGIN_HOST.to_string(),
            navigation_timeout: Duration::from_secs(30),
            scroll_steps: 3,
            scroll_pause: Duration::from_millis(750),
            settle_max: Duration::from_secs(5),
            settle_poll: Duration::from_millis(500),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            max_images: 50,
            max_galleries: 5,
            early_stop_images: 20,
        }
    }
}

impl ScrapeConfig {
    /// Search page URL for a term.
    pub fn search_url_for(&self, term: &str) -> String {
        format!("{}{}", self.search_url, urlencoding::encode(term))
    }

    /// Tag page URL for a term.
    pub fn tag_url_for(&self, term: &str) -> String {
        format!("{}{}", self.tag_url, urlencoding::encode(term))
    }

    /// Same limits with every wait removed.
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            scroll_pause: Duration::ZERO,
            settle_max: Duration::ZERO,
            settle_poll: Duration::ZERO,
            retry_backoff: Duration::ZERO,
            ..Self::default()
        }
    }
}
