//! Cache-through album lookup.
//!
//! A non-empty cache entry is served as is. A missing or empty entry sends
//! the request to the scraper, and whatever the scraper ends with (records
//! or an empty list) is written back.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::browser::ChromeLauncher;
use crate::cache::{AlbumCache, CacheError, FileAlbumCache};
use crate::config::Settings;
use crate::models::{build_album, AlbumKey, ImageRecord};
use crate::scraper::{
    ExtractionPipeline, GallerySelection, RetryController, ScrapeError, ScrapeOutcome,
};

/// `source` reported for albums served from the cache.
pub const CACHE_SOURCE: &str = "cache";

/// Errors from an album lookup.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("no images found for \"{term}\" after {attempts} attempts")]
    NotFound {
        term: String,
        attempts: u32,
        search_url: String,
        last_error: Option<String>,
    },

    #[error("invalid gallery index {index}: {} gallery links available", .links.len())]
    InvalidIndex { index: i64, links: Vec<String> },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Scrape(ScrapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A resolved album.
#[derive(Debug, Clone)]
pub struct AlbumLookup {
    pub key: AlbumKey,
    pub album: Vec<ImageRecord>,
    /// [`CACHE_SOURCE`] or the origin host.
    pub source: String,
    /// Scrape attempts spent; zero on a cache hit.
    pub attempts: u32,
    pub search_url: String,
    /// Gallery the images came from, when known.
    pub gallery_url: Option<String>,
}

pub struct AlbumService {
    cache: Arc<dyn AlbumCache>,
    scraper: RetryController,
}

impl AlbumService {
    pub fn new(cache: Arc<dyn AlbumCache>, scraper: RetryController) -> Self {
        Self { cache, scraper }
    }

    /// Chrome-backed scraper over the file cache configured in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let launcher = Arc::new(ChromeLauncher::new(settings.browser_config()));
        let scraper = RetryController::new(ExtractionPipeline::new(
            launcher,
            settings.scrape_config(),
        ));
        Self::new(Arc::new(FileAlbumCache::new(&settings.cache_dir)), scraper)
    }

    /// Search page URL for a term.
    pub fn search_url(&self, term: &str) -> String {
        self.scraper.pipeline().config().search_url_for(term)
    }

    /// Resolve an album, scraping when the cache has nothing useful.
    pub async fn lookup(
        &self,
        term: &str,
        selection: GallerySelection,
    ) -> Result<AlbumLookup, AlbumError> {
        let key = match selection {
            GallerySelection::All => AlbumKey::term(term),
            GallerySelection::Index(index) => match u32::try_from(index) {
                Ok(gallery) if gallery >= 1 => AlbumKey::indexed(term, gallery),
                _ => return Err(self.reject_index(term, index).await),
            },
        };
        let search_url = self.search_url(term);

        match self.cache.get(&key).await? {
            Some(album) if !album.is_empty() => {
                info!("Serving {} cached images for {}", album.len(), key);
                return Ok(AlbumLookup {
                    key,
                    album,
                    source: CACHE_SOURCE.to_string(),
                    attempts: 0,
                    search_url,
                    gallery_url: None,
                });
            }
            Some(_) => info!("Cached album for {} is empty; scraping again", key),
            None => info!("No cached album for {}; scraping", key),
        }

        match self.scraper.run(term, selection).await {
            Ok(ScrapeOutcome::Found {
                extraction,
                attempts,
            }) => {
                let album = build_album(&key, &extraction.images);
                if let Err(e) = self.cache.put(&key, &album).await {
                    warn!("Failed to cache album for {}: {}", key, e);
                }
                Ok(AlbumLookup {
                    key,
                    album,
                    source: self.scraper.pipeline().config().origin_host.clone(),
                    attempts,
                    search_url,
                    gallery_url: extraction.gallery_url,
                })
            }
            Ok(ScrapeOutcome::Exhausted {
                attempts,
                last_error,
            }) => {
                if let Err(e) = self.cache.put_empty(&key).await {
                    warn!("Failed to record empty album for {}: {}", key, e);
                }
                Err(AlbumError::NotFound {
                    term: term.to_string(),
                    attempts,
                    search_url,
                    last_error,
                })
            }
            Err(e) => Err(scrape_failure(e)),
        }
    }

    /// Cache-only read. `None` when the album was never scraped.
    pub async fn cached(
        &self,
        term: &str,
        index: Option<u32>,
    ) -> Result<Option<Vec<ImageRecord>>, AlbumError> {
        let key = AlbumKey {
            term: term.to_string(),
            index,
        };
        Ok(self.cache.get(&key).await?)
    }

    /// Indices that cannot name a gallery never touch the cache; the scrape
    /// only supplies the candidate list for the error.
    async fn reject_index(&self, term: &str, index: i64) -> AlbumError {
        info!("Gallery index {} for {} cannot be valid", index, term);
        match self.scraper.run(term, GallerySelection::Index(index)).await {
            Err(e) => scrape_failure(e),
            Ok(ScrapeOutcome::Exhausted {
                attempts,
                last_error,
            }) => AlbumError::NotFound {
                term: term.to_string(),
                attempts,
                search_url: self.search_url(term),
                last_error,
            },
            Ok(ScrapeOutcome::Found { .. }) => AlbumError::InvalidIndex {
                index,
                links: Vec::new(),
            },
        }
    }
}

fn scrape_failure(e: ScrapeError) -> AlbumError {
    match e {
        ScrapeError::InvalidIndex { index, links } => AlbumError::InvalidIndex { index, links },
        other => AlbumError::Scrape(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::stub::{StubBrowser, StubPage};
    use crate::scraper::ScrapeConfig;
    use tempfile::{tempdir, TempDir};

    const SEARCH: &str = "https://ahottie.net/?s=testterm";

    fn gallery(n: usize) -> String {
        format!("https://ahottie.net/2024/05/testterm-set-{}", n)
    }

    fn images(count: usize) -> Vec<String> {
        (1..=count)
            .map(|n| format!("https://images2.imgbox.com/aa/{}.jpg", n))
            .collect()
    }

    fn service(stub: &StubBrowser) -> (AlbumService, FileAlbumCache, TempDir) {
        let dir = tempdir().unwrap();
        let cache = FileAlbumCache::new(dir.path());
        let scraper = RetryController::new(ExtractionPipeline::new(
            Arc::new(stub.clone()),
            ScrapeConfig::immediate(),
        ));
        (
            AlbumService::new(Arc::new(cache.clone()), scraper),
            cache,
            dir,
        )
    }

    fn three_galleries() -> StubBrowser {
        StubBrowser::new()
            .page(SEARCH, StubPage::with_links((1..=3).map(gallery).collect()))
            .page(&gallery(1), StubPage::with_images(images(5)))
    }

    #[tokio::test]
    async fn scraped_album_is_cached_with_dense_ids() {
        let stub = three_galleries();
        let (service, cache, _dir) = service(&stub);

        let found = service
            .lookup("testterm", GallerySelection::Index(1))
            .await
            .unwrap();

        assert_eq!(found.album.len(), 5);
        assert_eq!(found.source, "ahottie.net");
        assert_eq!(found.attempts, 1);
        assert_eq!(found.gallery_url, Some(gallery(1)));

        let stored = cache
            .get(&AlbumKey::indexed("testterm", 1))
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<u32> = stored.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn cached_album_is_served_without_scraping() {
        let stub = three_galleries();
        let (service, _cache, _dir) = service(&stub);

        let first = service
            .lookup("testterm", GallerySelection::Index(1))
            .await
            .unwrap();
        let second = service
            .lookup("testterm", GallerySelection::Index(1))
            .await
            .unwrap();

        assert_eq!(second.source, CACHE_SOURCE);
        assert_eq!(second.album, first.album);
        assert_eq!(stub.launches(), 1);
    }

    #[tokio::test]
    async fn exhaustion_persists_empty_album() {
        let stub = StubBrowser::new().page(SEARCH, StubPage::default());
        let (service, cache, _dir) = service(&stub);

        let err = service
            .lookup("testterm", GallerySelection::Index(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AlbumError::NotFound { attempts: 3, .. }));
        assert_eq!(
            cache.get(&AlbumKey::indexed("testterm", 1)).await.unwrap(),
            Some(vec![])
        );
    }

    #[tokio::test]
    async fn empty_cache_entry_triggers_scrape() {
        let stub = three_galleries();
        let (service, cache, _dir) = service(&stub);
        cache
            .put_empty(&AlbumKey::indexed("testterm", 1))
            .await
            .unwrap();

        let found = service
            .lookup("testterm", GallerySelection::Index(1))
            .await
            .unwrap();

        assert_eq!(found.source, "ahottie.net");
        assert_eq!(stub.launches(), 1);
    }

    #[tokio::test]
    async fn invalid_index_is_not_cached() {
        let stub = three_galleries();
        let (service, cache, _dir) = service(&stub);

        let err = service
            .lookup("testterm", GallerySelection::Index(4))
            .await
            .unwrap_err();

        match err {
            AlbumError::InvalidIndex { index, links } => {
                assert_eq!(index, 4);
                assert_eq!(links, (1..=3).map(gallery).collect::<Vec<_>>());
            }
            other => panic!("expected InvalidIndex, got {:?}", other),
        }
        assert_eq!(
            cache.get(&AlbumKey::indexed("testterm", 4)).await.unwrap(),
            None
        );
        assert_eq!(stub.launches(), 1);
    }

    #[tokio::test]
    async fn zero_index_reports_candidate_links() {
        let stub = three_galleries();
        let (service, _cache, dir) = service(&stub);

        let err = service
            .lookup("testterm", GallerySelection::Index(0))
            .await
            .unwrap_err();

        assert!(matches!(err, AlbumError::InvalidIndex { index: 0, ref links } if links.len() == 3));
        assert!(!dir.path().join("testterm").exists());
    }

    #[tokio::test]
    async fn simple_and_indexed_albums_are_separate() {
        let stub = StubBrowser::new().page(
            SEARCH,
            StubPage::with_links(vec![gallery(1)]).and_images(images(2)),
        );
        let (service, _cache, _dir) = service(&stub);

        let simple = service
            .lookup("testterm", GallerySelection::All)
            .await
            .unwrap();

        assert_eq!(simple.album.len(), 2);
        assert_eq!(simple.album[0].name, "testterm_1.jpg");
        assert_eq!(service.cached("testterm", Some(1)).await.unwrap(), None);
        assert_eq!(
            service.cached("testterm", None).await.unwrap(),
            Some(simple.album)
        );
    }
}
