//! One extraction attempt against the origin site.
//!
//! ```text
//! search loaded -> links collected -> gallery selected -> gallery loaded -> images extracted
//!            \-(no links)-> tag page loaded -/                      \-(empty)-> search page images
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::config::ScrapeConfig;
use super::error::ScrapeError;
use super::filter::{filter_gallery_links, filter_image_urls, RawImageScan};
use super::selectors::ExtractionScripts;
use crate::browser::{BrowserLauncher, BrowserSession, PageLoad};

/// Which gallery (or galleries) an attempt extracts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySelection {
    /// 1-based index into the collected gallery links.
    Index(i64),
    /// Search page images plus every gallery up to the configured limits.
    All,
}

/// Images found by one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub images: Vec<String>,
    /// Gallery the images came from; `None` when they came from the search page.
    pub gallery_url: Option<String>,
}

impl Extraction {
    fn from_search(images: Vec<String>) -> Self {
        Self {
            images,
            gallery_url: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Drives one browser session through the extraction protocol.
pub struct ExtractionPipeline {
    launcher: Arc<dyn BrowserLauncher>,
    config: ScrapeConfig,
    scripts: ExtractionScripts,
}

impl ExtractionPipeline {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ScrapeConfig) -> Self {
        Self {
            launcher,
            config,
            scripts: ExtractionScripts::default(),
        }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run one attempt. The session is closed on every path out.
    ///
    /// An empty result is not an error: the origin legitimately had nothing.
    pub async fn run(
        &self,
        term: &str,
        selection: GallerySelection,
    ) -> Result<Extraction, ScrapeError> {
        let mut session = self.launcher.launch().await?;
        let result = self.run_in_session(session.as_mut(), term, selection).await;
        session.close().await;
        result
    }

    async fn run_in_session(
        &self,
        session: &mut dyn BrowserSession,
        term: &str,
        selection: GallerySelection,
    ) -> Result<Extraction, ScrapeError> {
        let search_url = self.config.search_url_for(term);
        let search = self.load(session, &search_url).await?;

        let mut links = self.collect_links(session).await?;

        // Extracted now, while the search page is still loaded.
        let mut search_images = self.listing_images(session, &search.final_url).await;
        debug!("Search page holds {} images", search_images.len());

        if links.is_empty() {
            let tag_url = self.config.tag_url_for(term);
            info!("No galleries in search, trying: {}", tag_url);
            match self.load(session, &tag_url).await {
                Ok(tag) => {
                    links = self.collect_links(session).await?;
                    if search_images.is_empty() {
                        search_images = self.listing_images(session, &tag.final_url).await;
                    }
                }
                Err(e) => warn!("Tag page {} unavailable: {}", tag_url, e),
            }
        }
        info!("Found {} gallery links for {}", links.len(), term);

        match selection {
            GallerySelection::Index(index) => {
                self.run_indexed(session, index, links, search_images).await
            }
            GallerySelection::All => Ok(Extraction::from_search(
                self.run_all(session, &links, search_images).await,
            )),
        }
    }

    async fn run_indexed(
        &self,
        session: &mut dyn BrowserSession,
        index: i64,
        links: Vec<String>,
        search_images: Vec<String>,
    ) -> Result<Extraction, ScrapeError> {
        if links.is_empty() && index >= 1 {
            info!("No gallery links; using search page images");
            return Ok(Extraction::from_search(search_images));
        }

        let position = select_gallery(index, &links)?;
        let gallery_url = &links[position];
        info!("Selected gallery {}/{}: {}", index, links.len(), gallery_url);

        let gallery = self.load(session, gallery_url).await?;
        let images = self.extract_images(session, &gallery.final_url).await?;

        if images.is_empty() {
            info!(
                "Gallery {} yielded no images; falling back to {} search page images",
                gallery_url,
                search_images.len()
            );
            return Ok(Extraction::from_search(search_images));
        }

        Ok(Extraction {
            images,
            gallery_url: Some(gallery_url.clone()),
        })
    }

    async fn run_all(
        &self,
        session: &mut dyn BrowserSession,
        links: &[String],
        search_images: Vec<String>,
    ) -> Vec<String> {
        let mut seen: HashSet<String> = search_images.iter().cloned().collect();
        let mut images = search_images;

        for link in links.iter().take(self.config.max_galleries) {
            if images.len() >= self.config.early_stop_images {
                break;
            }

            let gallery = match self.load(session, link).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Skipping gallery {}: {}", link, e);
                    continue;
                }
            };

            match self.extract_images(session, &gallery.final_url).await {
                Ok(found) => {
                    debug!("Gallery {} yielded {} images", link, found.len());
                    images.extend(found.into_iter().filter(|u| seen.insert(u.clone())));
                }
                Err(e) => warn!("Skipping gallery {}: {}", link, e),
            }
        }

        images.truncate(self.config.max_images);
        images
    }

    /// Navigate, reject 404s, then scroll and wait for the DOM to settle.
    async fn load(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<PageLoad, ScrapeError> {
        info!("Navigating to: {}", url);
        let page = session.navigate(url, self.config.navigation_timeout).await?;

        if page.is_not_found() {
            return Err(ScrapeError::NotFoundUpstream {
                url: url.to_string(),
            });
        }

        for _ in 0..self.config.scroll_steps {
            session.scroll_to_bottom().await?;
            if !self.config.scroll_pause.is_zero() {
                sleep(self.config.scroll_pause).await;
            }
        }
        self.settle(session).await;

        Ok(page)
    }

    /// Poll the page until two samples agree or the settle bound passes.
    async fn settle(&self, session: &mut dyn BrowserSession) {
        let deadline = Instant::now() + self.config.settle_max;
        let mut previous = None;

        loop {
            let sample = session.evaluate(&self.scripts.settle_probe).await.ok();
            if sample.is_some() && sample == previous {
                debug!("DOM settled");
                return;
            }
            if Instant::now() >= deadline {
                debug!("Settle bound reached");
                return;
            }
            previous = sample;
            sleep(self.config.settle_poll).await;
        }
    }

    async fn collect_links(
        &self,
        session: &mut dyn BrowserSession,
    ) -> Result<Vec<String>, ScrapeError> {
        let value = session.evaluate(&self.scripts.links).await?;
        let raw: Vec<String> = if value.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(value)
                .map_err(|e| ScrapeError::Script(format!("unexpected link list: {}", e)))?
        };
        Ok(filter_gallery_links(&raw, &self.config.origin_host))
    }

    /// Images on a search or tag page. They only serve as the fallback, so a
    /// failed scan leaves the fallback empty instead of ending the attempt.
    async fn listing_images(&self, session: &mut dyn BrowserSession, page_url: &str) -> Vec<String> {
        match self.extract_images(session, page_url).await {
            Ok(images) => images,
            Err(e) => {
                warn!("Image scan of {} failed: {}", page_url, e);
                Vec::new()
            }
        }
    }

    async fn extract_images(
        &self,
        session: &mut dyn BrowserSession,
        page_url: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let value = session.evaluate(&self.scripts.images).await?;
        let scan: RawImageScan = if value.is_null() {
            RawImageScan::default()
        } else {
            serde_json::from_value(value)
                .map_err(|e| ScrapeError::Script(format!("unexpected image scan: {}", e)))?
        };
        Ok(filter_image_urls(&scan, page_url, self.config.max_images))
    }
}

/// Map a 1-based gallery index onto the link list.
pub fn select_gallery(index: i64, links: &[String]) -> Result<usize, ScrapeError> {
    if index >= 1 && (index as u64) <= links.len() as u64 {
        Ok(index as usize - 1)
    } else {
        Err(ScrapeError::InvalidIndex {
            index,
            links: links.to_vec(),
        })
    }
}
