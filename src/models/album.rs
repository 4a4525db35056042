//! Image records and album construction.

use serde::{Deserialize, Serialize};

use super::AlbumKey;

/// Extension used when a URL carries no usable one.
const DEFAULT_EXTENSION: &str = "jpg";

/// One image in an album.
///
/// Records are written once when the album is cached and never change
/// afterwards. `id` is 1-based and dense in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub thumb: String,
}

impl ImageRecord {
    /// Build the record for the `id`-th image of an album.
    pub fn new(key: &AlbumKey, id: u32, url: &str) -> Self {
        let slug = term_slug(&key.term);
        let ext = image_extension(url);
        let name = match key.index {
            Some(index) => format!("{}_g{}_{}.{}", slug, index, id, ext),
            None => format!("{}_{}.{}", slug, id, ext),
        };

        Self {
            id,
            name,
            url: url.to_string(),
            thumb: url.to_string(),
        }
    }
}

/// Assign ids and names to scraped URLs, preserving their order.
pub fn build_album(key: &AlbumKey, urls: &[String]) -> Vec<ImageRecord> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| ImageRecord::new(key, i as u32 + 1, url))
        .collect()
}

/// Lowercased file extension of a URL's path, or `jpg`.
pub fn image_extension(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Filesystem-safe slug for a search term, used in image names.
pub fn term_slug(term: &str) -> String {
    let mut slug = String::with_capacity(term.len());
    let mut last_was_sep = true;

    for c in term.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }

    let trimmed = slug.trim_end_matches('_');
    if trimmed.is_empty() {
        "album".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_in_discovery_order() {
        let key = AlbumKey::term("Mia Nanasawa");
        let urls: Vec<String> = (0..4)
            .map(|i| format!("https://images2.imgbox.com/a/{}.png", i))
            .collect();

        let album = build_album(&key, &urls);

        let ids: Vec<u32> = album.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(album[2].url, urls[2]);
        assert_eq!(album[2].thumb, urls[2]);
    }

    #[test]
    fn names_include_gallery_index_when_indexed() {
        let url = "https://images2.imgbox.com/aa/bb/photo.JPEG?x=1";
        let simple = ImageRecord::new(&AlbumKey::term("Mia Nanasawa"), 3, url);
        let indexed = ImageRecord::new(&AlbumKey::indexed("Mia Nanasawa", 2), 3, url);

        assert_eq!(simple.name, "mia_nanasawa_3.jpeg");
        assert_eq!(indexed.name, "mia_nanasawa_g2_3.jpeg");
    }

    #[test]
    fn extension_falls_back_to_jpg() {
        assert_eq!(image_extension("https://example.com/img/noext"), "jpg");
        assert_eq!(image_extension("https://example.com/a.b/c"), "jpg");
        assert_eq!(image_extension("https://example.com/x.webp#frag"), "webp");
        assert_eq!(image_extension("not a url.png?q"), "png");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(term_slug("  Lin Xing--Lan "), "lin_xing_lan");
        assert_eq!(term_slug("../.."), "album");
        assert_eq!(term_slug("a/b"), "a_b");
    }

    #[test]
    fn record_json_field_names() {
        let record = ImageRecord::new(&AlbumKey::term("x"), 1, "https://a.imgbox.com/1.png");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "x_1.png");
        assert!(json.get("thumb").is_some());
    }
}
