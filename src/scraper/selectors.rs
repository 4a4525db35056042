//! DOM selectors and the scripts built from them.
//!
//! Scripts only collect raw attribute strings from the rendered page. All
//! filtering happens in Rust (see `filter`), so the selection rules can be
//! tested without a browser.

/// Anchor selectors for gallery links, highest priority first.
pub const LINK_SELECTORS: &[&str] = &[
    "h2.entry-title a",
    "a.post-title",
    "article a[rel=\"bookmark\"]",
    "a[href*=\"/gallery/\"]",
    "a[href*=\"/20\"]",
    ".post a",
    "article a",
];

/// Image containers searched for `<img>` elements.
pub const IMAGE_SELECTORS: &[&str] = &[
    ".entry-content img",
    ".wp-block-gallery img",
    ".post-thumbnail img",
    "article img",
    "img[src*=\"imgbox.com\"]",
    "img[src*=\"wp-content\"]",
    "img[data-src]",
    "img[data-lazy-src]",
];

/// Elements that may carry an inline `background-image`.
pub const BACKGROUND_SELECTOR: &str = "[style*=\"background\"]";

/// Raster extensions accepted as album images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Hosts known to serve album content (suffix match).
pub const CONTENT_HOSTS: &[&str] = &["imgbox.com", "ahottie.net", "wp.com"];

/// Path fragments known to hold album content on any host.
pub const CONTENT_PATHS: &[&str] = &["/wp-content/uploads/"];

/// Samples page height and image count; equal samples mean the DOM settled.
pub const SETTLE_PROBE_SCRIPT: &str =
    "[document.body ? document.body.scrollHeight : 0, document.images.length]";

/// Scripts evaluated against the rendered page during one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionScripts {
    /// Returns every anchor `href`, one selector batch at a time in priority order.
    pub links: String,
    /// Returns `{ images: [...], backgrounds: [...] }` candidate records.
    pub images: String,
    pub settle_probe: String,
}

impl Default for ExtractionScripts {
    fn default() -> Self {
        Self {
            links: link_script(LINK_SELECTORS),
            images: image_script(IMAGE_SELECTORS, BACKGROUND_SELECTOR),
            settle_probe: SETTLE_PROBE_SCRIPT.to_string(),
        }
    }
}

fn js_string_array(items: &[&str]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn link_script(selectors: &[&str]) -> String {
    format!(
        r#"
        (() => {{
            const selectors = {};
            const hrefs = [];
            for (const selector of selectors) {{
                for (const a of document.querySelectorAll(selector)) {{
                    if (a.href) hrefs.push(a.href);
                }}
            }}
            return hrefs;
        }})()
        "#,
        js_string_array(selectors)
    )
}

fn image_script(selectors: &[&str], background: &str) -> String {
    format!(
        r#"
        (() => {{
            const attr = (el, name) => el.getAttribute(name) || null;
            const images = Array.from(document.querySelectorAll({})).map(img => ({{
                src: attr(img, 'src'),
                data_src: attr(img, 'data-src'),
                data_lazy_src: attr(img, 'data-lazy-src'),
                data_original: attr(img, 'data-original'),
                srcset: attr(img, 'srcset') || attr(img, 'data-srcset'),
            }}));
            const backgrounds = Array.from(document.querySelectorAll({}))
                .map(el => el.getAttribute('style') || '')
                .filter(style => style.includes('url('));
            return {{ images, backgrounds }};
        }})()
        "#,
        serde_json::to_string(&selectors.join(", ")).unwrap_or_else(|_| "'img'".to_string()),
        serde_json::to_string(background).unwrap_or_else(|_| "'[style]'".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_script_embeds_selectors_in_priority_order() {
        let scripts = ExtractionScripts::default();
        let first = scripts.links.find("h2.entry-title a").unwrap();
        let last = scripts.links.find("article a\"").unwrap();
        assert!(first < last);
    }

    #[test]
    fn image_script_queries_lazy_attributes() {
        let scripts = ExtractionScripts::default();
        for attr in ["data-src", "data-lazy-src", "data-original", "srcset"] {
            assert!(scripts.images.contains(attr), "missing {}", attr);
        }
        assert!(scripts.images.contains("backgrounds"));
    }
}
