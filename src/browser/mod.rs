//! Headless browser capability used by the scraper.
//!
//! The scraper only needs to navigate, evaluate scripts against the rendered
//! DOM, scroll and close. Those operations live behind [`BrowserLauncher`]
//! and [`BrowserSession`] so the pipeline can be driven by chromiumoxide in
//! production and by a scripted stub in tests.

mod chrome;
mod config;

#[cfg(test)]
pub(crate) mod stub;

pub use chrome::ChromeLauncher;
pub use config::{BrowserEngineConfig, DEFAULT_USER_AGENT};

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a browser session.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("script evaluation failed: {0}")]
    Script(String),
}

/// Outcome of a page navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    /// HTTP status of the main document, when the browser reports one.
    pub status: Option<u16>,
    pub final_url: String,
}

impl PageLoad {
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Starts browser sessions. Every scrape attempt launches its own.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// A live browser page.
///
/// Callers must invoke [`BrowserSession::close`] on every exit path;
/// implementations make it idempotent.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<PageLoad, BrowserError>;

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, BrowserError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError>;

    async fn close(&mut self);
}
