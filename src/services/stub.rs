//! In-memory image fetcher used by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::fetch::{FetchError, FetchedImage, ImageFetcher};

/// Serves canned bytes by URL and records every request. Unknown URLs are 404.
#[derive(Clone, Default)]
pub(crate) struct StubFetcher {
    images: Arc<HashMap<String, FetchedImage>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn image(mut self, url: &str, content_type: &str, bytes: &[u8]) -> Self {
        Arc::make_mut(&mut self.images).insert(
            url.to_string(),
            FetchedImage {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match url {
            u if u.ends_with(".html") => Err(FetchError::BadContentType {
                url: url.to_string(),
                content_type: "text/html".to_string(),
            }),
            _ => self.images.get(url).cloned().ok_or(FetchError::NotFound {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
