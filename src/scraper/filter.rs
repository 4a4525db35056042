//! Normalization of raw DOM strings into gallery links and image URLs.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

use super::selectors::{CONTENT_HOSTS, CONTENT_PATHS, IMAGE_EXTENSIONS};

/// Path prefixes on the origin that list posts rather than hold a gallery.
const LISTING_PREFIXES: &[&str] = &["/tags/", "/tag/", "/category/", "/search", "/feed", "/author/"];

/// Attribute values scraped from one `<img>` element.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub data_src: Option<String>,
    #[serde(default)]
    pub data_lazy_src: Option<String>,
    #[serde(default)]
    pub data_original: Option<String>,
    #[serde(default)]
    pub srcset: Option<String>,
}

impl RawImage {
    /// Candidate URLs in priority order: `src`, lazy-load attributes, then
    /// the first `srcset` entry.
    fn candidates(&self) -> impl Iterator<Item = &str> {
        let srcset_first = self
            .srcset
            .as_deref()
            .and_then(|s| s.split(',').next())
            .and_then(|entry| entry.split_whitespace().next());

        [
            self.src.as_deref(),
            self.data_src.as_deref(),
            self.data_lazy_src.as_deref(),
            self.data_original.as_deref(),
            srcset_first,
        ]
        .into_iter()
        .flatten()
    }
}

/// Result of the image script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImageScan {
    #[serde(default)]
    pub images: Vec<RawImage>,
    #[serde(default)]
    pub backgrounds: Vec<String>,
}

const CSS_URL_PATTERN: &str = r#"url\(\s*['"]?([^'")]+?)['"]?\s*\)"#;

fn css_url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(CSS_URL_PATTERN).ok())
        .as_ref()
}

/// Resolve a possibly relative attribute value against the page URL.
fn resolve(base: Option<&Url>, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") || raw.starts_with("javascript:") {
        return None;
    }
    let parsed = match base {
        Some(base) => base.join(raw).ok()?,
        None => Url::parse(raw).ok()?,
    };
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Keep same-origin gallery links, dropping listing, pagination, search and
/// fragment links. Order is preserved and duplicates removed.
pub fn filter_gallery_links(raw: &[String], origin_host: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in raw {
        let Some(url) = resolve(None, href) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };
        if !host_matches(host, origin_host) {
            continue;
        }
        if url.fragment().is_some() {
            continue;
        }

        let path = url.path();
        if path == "/" || path.is_empty() {
            continue;
        }
        if path.contains("/page/") || LISTING_PREFIXES.iter().any(|p| path.starts_with(p)) {
            continue;
        }
        if url.query_pairs().any(|(k, _)| k == "s" || k == "paged") {
            continue;
        }

        let normalized = url.to_string();
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    links
}

/// Whether a URL points at a raster image on a known content origin.
pub fn is_accepted_image(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let has_extension = path
        .rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false);
    if !has_extension {
        return false;
    }

    let on_content_host = url
        .host_str()
        .map(|host| CONTENT_HOSTS.iter().any(|d| host_matches(host, d)))
        .unwrap_or(false);

    on_content_host || CONTENT_PATHS.iter().any(|p| path.contains(p))
}

/// Turn a raw image scan into accepted, deduplicated image URLs.
pub fn filter_image_urls(scan: &RawImageScan, page_url: &str, limit: usize) -> Vec<String> {
    let base = Url::parse(page_url).ok();
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    let from_images = scan.images.iter().filter_map(|img| {
        img.candidates()
            .filter_map(|raw| resolve(base.as_ref(), raw))
            .find(is_accepted_image)
    });

    let from_backgrounds = scan.backgrounds.iter().flat_map(|style| {
        css_url_pattern()
            .into_iter()
            .flat_map(|pattern| pattern.captures_iter(style))
            .filter_map(|cap| cap.get(1))
            .filter_map(|m| resolve(base.as_ref(), m.as_str()))
            .filter(is_accepted_image)
            .collect::<Vec<_>>()
    });

    for url in from_images.chain(from_backgrounds) {
        if urls.len() >= limit {
            break;
        }
        let url = url.to_string();
        if seen.insert(url.clone()) {
            urls.push(url);
        }
    }

    urls
}
