//! HTTP server for album lookups, image proxying and downloads.
//!
//! Every album route goes through [`AlbumService`], so the cache contract is
//! the same whether the request comes from the JSON API, the image proxy or
//! the bulk downloader.

mod error;
mod handlers;
mod routes;
mod templates;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::services::{AlbumService, BulkDownloader, HttpImageFetcher, ImageFetcher};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub albums: Arc<AlbumService>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub downloader: Arc<BulkDownloader>,
    pub downloads_dir: PathBuf,
    /// Base for absolute links, without a trailing slash.
    pub public_url: String,
    /// `None` rejects every keyed request.
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(settings: &Settings, port: u16) -> anyhow::Result<Self> {
        settings.ensure_directories()?;

        let fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new(
            settings.proxy.as_deref(),
            settings.request_timeout(),
        )?);

        Ok(Self {
            albums: Arc::new(AlbumService::from_settings(settings)),
            downloader: Arc::new(BulkDownloader::new(
                fetcher.clone(),
                settings.download_delay(),
            )),
            fetcher,
            downloads_dir: settings.downloads_dir.clone(),
            public_url: settings.public_base_url(port),
            api_key: settings.api_key.clone(),
        })
    }

    /// Whether `provided` matches the configured shared secret.
    pub fn accepts_key(&self, provided: Option<&str>) -> bool {
        match (self.api_key.as_deref(), provided) {
            (Some(expected), Some(provided)) => expected == provided,
            _ => false,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings, port)?;
    if state.api_key.is_none() {
        tracing::warn!("ALBUMFETCH_API_KEY is not set; /api/nsfw/:model will reject every request");
    }
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
