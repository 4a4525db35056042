//! Bounded retry around the extraction pipeline.

use std::time::Duration;

use tracing::{info, warn};

use super::error::{FailureKind, ScrapeError};
use super::pipeline::{Extraction, ExtractionPipeline, GallerySelection};

/// Longest pause between two attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Result of a retried scrape that did not hit a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Found {
        extraction: Extraction,
        attempts: u32,
    },
    /// Every attempt failed or came back empty.
    Exhausted {
        attempts: u32,
        last_error: Option<String>,
    },
}

impl ScrapeOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            ScrapeOutcome::Found { attempts, .. } | ScrapeOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Exponential backoff before the attempt following `attempt`.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Repeats pipeline runs until one yields images.
pub struct RetryController {
    pipeline: ExtractionPipeline,
}

impl RetryController {
    pub fn new(pipeline: ExtractionPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Scrape `term`, retrying transient failures and empty results.
    ///
    /// Terminal failures (an out-of-range gallery index) return immediately.
    pub async fn run(
        &self,
        term: &str,
        selection: GallerySelection,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        let config = self.pipeline.config();
        let max_attempts = config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            info!("Scraping attempt {}/{} for {}", attempt, max_attempts, term);

            match self.pipeline.run(term, selection).await {
                Ok(extraction) if !extraction.is_empty() => {
                    info!(
                        "Found {} images for {} on attempt {}",
                        extraction.images.len(),
                        term,
                        attempt
                    );
                    return Ok(ScrapeOutcome::Found {
                        extraction,
                        attempts: attempt,
                    });
                }
                Ok(_) => {
                    info!("Attempt {} found no images for {}", attempt, term);
                    last_error = None;
                }
                Err(e) if e.kind() == FailureKind::Terminal => {
                    warn!("Attempt {} for {} failed terminally: {}", attempt, term, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Attempt {} for {} failed: {}", attempt, term, e);
                    last_error = Some(e.to_string());
                }
            }

            if attempt < max_attempts {
                let delay = backoff_delay(attempt, config.retry_backoff);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Ok(ScrapeOutcome::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}
