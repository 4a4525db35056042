//! Scripted browser used by tests.
//!
//! Pages are keyed by URL. The link and image scripts are recognised by
//! comparing against [`ExtractionScripts`]; anything else evaluates to null.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{BrowserError, BrowserLauncher, BrowserSession, PageLoad};
use crate::scraper::ExtractionScripts;

/// How the settle probe answers on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Same sample on every poll.
    Stable,
    /// A new sample on every poll.
    Changing,
}

/// Canned content for one URL.
#[derive(Debug, Clone, Default)]
pub(crate) struct StubPage {
    status: Option<u16>,
    links: Vec<String>,
    images: Vec<String>,
    settle: Option<Settle>,
    fail: bool,
    failing_scan: bool,
}

impl StubPage {
    pub(crate) fn with_links(links: Vec<String>) -> Self {
        Self {
            links,
            ..Self::default()
        }
    }

    pub(crate) fn with_images(images: Vec<String>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    pub(crate) fn and_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub(crate) fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn settling(mut self, settle: Settle) -> Self {
        self.settle = Some(settle);
        self
    }

    /// The image script throws on this page.
    pub(crate) fn with_failing_scan(mut self) -> Self {
        self.failing_scan = true;
        self
    }

    fn scan(&self) -> Value {
        let images: Vec<Value> = self.images.iter().map(|src| json!({ "src": src })).collect();
        json!({ "images": images, "backgrounds": [] })
    }
}

#[derive(Default)]
struct Counters {
    launches: AtomicUsize,
    closes: AtomicUsize,
    scrolls: AtomicUsize,
    probes: AtomicUsize,
    failing_launches: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

/// Launcher handing out scripted sessions. Clones share counters.
#[derive(Clone, Default)]
pub(crate) struct StubBrowser {
    pages: Arc<HashMap<String, StubPage>>,
    counters: Arc<Counters>,
}

impl StubBrowser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, page: StubPage) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), page);
        self
    }

    /// Make the next `n` launches fail.
    pub(crate) fn failing_launches(self, n: usize) -> Self {
        self.counters.failing_launches.store(n, Ordering::SeqCst);
        self
    }

    pub(crate) fn launches(&self) -> usize {
        self.counters.launches.load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    pub(crate) fn scrolls(&self) -> usize {
        self.counters.scrolls.load(Ordering::SeqCst)
    }

    /// Settle probe evaluations across all sessions.
    pub(crate) fn probes(&self) -> usize {
        self.counters.probes.load(Ordering::SeqCst)
    }

    pub(crate) fn navigations(&self) -> Vec<String> {
        self.counters
            .navigations
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BrowserLauncher for StubBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);

        let remaining = self.counters.failing_launches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.counters
                .failing_launches
                .store(remaining - 1, Ordering::SeqCst);
            return Err(BrowserError::LaunchFailed("stub launch failure".to_string()));
        }

        Ok(Box::new(StubSession {
            pages: Arc::clone(&self.pages),
            counters: Arc::clone(&self.counters),
            scripts: ExtractionScripts::default(),
            current: None,
            closed: false,
        }))
    }
}

struct StubSession {
    pages: Arc<HashMap<String, StubPage>>,
    counters: Arc<Counters>,
    scripts: ExtractionScripts,
    current: Option<StubPage>,
    closed: bool,
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<PageLoad, BrowserError> {
        if let Ok(mut navigations) = self.counters.navigations.lock() {
            navigations.push(url.to_string());
        }

        let page = self.pages.get(url).cloned().unwrap_or_default();
        if page.fail {
            return Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: "stub navigation failure".to_string(),
            });
        }

        let status = page.status.or(Some(200));
        self.current = Some(page);
        Ok(PageLoad {
            status,
            final_url: url.to_string(),
        })
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, BrowserError> {
        let Some(page) = self.current.as_ref() else {
            return Ok(Value::Null);
        };
        if script == self.scripts.links {
            Ok(json!(page.links))
        } else if script == self.scripts.images {
            if page.failing_scan {
                return Err(BrowserError::Script("stub scan failure".to_string()));
            }
            Ok(page.scan())
        } else if script == self.scripts.settle_probe {
            let probe = self.counters.probes.fetch_add(1, Ordering::SeqCst);
            Ok(match page.settle {
                Some(Settle::Stable) => json!([1200, 8]),
                Some(Settle::Changing) => json!([1200 + probe, 8]),
                None => Value::Null,
            })
        } else {
            Ok(Value::Null)
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
        self.counters.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
