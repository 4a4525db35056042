//! Fetching image bytes from content hosts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::browser::DEFAULT_USER_AGENT;
use crate::utils::{is_image_content_type, sniff_image_mime};

/// Declared type that says nothing about the payload.
const OPAQUE_CONTENT_TYPE: &str = "application/octet-stream";

/// Errors from fetching an image.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("image not found: {url} (HTTP {status})")]
    NotFound { url: String, status: u16 },

    #[error("{url} did not return an image (content-type: {content_type})")]
    BadContentType { url: String, content_type: String },

    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },
}

/// Image bytes with the content-type to serve them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Source of image bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// reqwest-backed fetcher.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Build a fetcher. Without a proxy, environment proxy settings are ignored.
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .brotli(true);

        builder = match proxy {
            Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy)?),
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!("Fetching image {}", url);
        let response = self.client.get(url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(network)?.to_vec();

        let content_type = match declared {
            Some(ct) if is_image_content_type(&ct) => ct,
            Some(ct) if !ct.to_ascii_lowercase().starts_with(OPAQUE_CONTENT_TYPE) => {
                return Err(FetchError::BadContentType {
                    url: url.to_string(),
                    content_type: ct,
                });
            }
            declared => match sniff_image_mime(&bytes) {
                Some(mime) => {
                    debug!("Sniffed {} for {}", mime, url);
                    mime.to_string()
                }
                None => {
                    return Err(FetchError::BadContentType {
                        url: url.to_string(),
                        content_type: declared.unwrap_or_else(|| "none".to_string()),
                    });
                }
            },
        };

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
