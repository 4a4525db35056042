//! Scrape failures and their retry classification.

use thiserror::Error;

use crate::browser::BrowserError;

/// How the retry controller treats a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Infrastructure trouble; another attempt may succeed.
    Transient,
    /// Depends on page content; retrying cannot change the answer.
    Terminal,
}

/// Errors raised during one extraction attempt.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{url} returned 404")]
    NotFoundUpstream { url: String },

    #[error("gallery index {index} is out of range (found {} gallery links)", .links.len())]
    InvalidIndex { index: i64, links: Vec<String> },

    #[error("script evaluation failed: {0}")]
    Script(String),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::InvalidIndex { .. } => FailureKind::Terminal,
            ScrapeError::LaunchFailed(_)
            | ScrapeError::Navigation { .. }
            | ScrapeError::NotFoundUpstream { .. }
            | ScrapeError::Script(_) => FailureKind::Transient,
        }
    }
}

impl From<BrowserError> for ScrapeError {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::LaunchFailed(reason) => ScrapeError::LaunchFailed(reason),
            BrowserError::Timeout { url, secs } => ScrapeError::Navigation {
                url,
                reason: format!("timed out after {}s", secs),
            },
            BrowserError::NavigationFailed { url, reason } => {
                ScrapeError::Navigation { url, reason }
            }
            BrowserError::Script(reason) => ScrapeError::Script(reason),
        }
    }
}
