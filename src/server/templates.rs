//! HTML pages.

use crate::models::ImageRecord;
use crate::utils::html_escape;

const STYLE: &str = r#"
        body { font-family: system-ui, sans-serif; margin: 0; background: #111; color: #eee; }
        header { padding: 1rem 2rem; background: #1b1b1b; border-bottom: 1px solid #333; }
        header a { color: #eee; text-decoration: none; font-weight: 600; }
        main { padding: 1rem 2rem; }
        a { color: #8ab4f8; }
        code { background: #222; padding: 0.1rem 0.3rem; border-radius: 3px; }
        table { border-collapse: collapse; }
        td, th { padding: 0.3rem 0.8rem; border-bottom: 1px solid #333; text-align: left; }
        .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; }
        .grid figure { margin: 0; background: #1b1b1b; padding: 0.5rem; border-radius: 4px; }
        .grid img { width: 100%; height: auto; display: block; }
        .grid figcaption { font-size: 0.8rem; margin-top: 0.3rem; word-break: break-all; }
        .error { color: #f28b82; }
"#;

/// Base page layout.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - albumfetch</title>
    <style>{}</style>
</head>
<body>
    <header><a href="/">albumfetch</a></header>
    <main>
        <h1>{}</h1>
        {}
    </main>
</body>
</html>"#,
        html_escape(title),
        STYLE,
        html_escape(title),
        content
    )
}

/// Landing page listing the API.
pub fn help_page() -> String {
    let endpoints = [
        ("/api/album/Mia Nanasawa", "Scrape or read the album for a search term"),
        ("/api/album/Mia Nanasawa/1", "Album of the first gallery found for a term"),
        ("/api/nsfw/Mia Nanasawa?apikey=KEY", "One random image from the album"),
        ("/api/nsfw/Mia Nanasawa/1", "Cached gallery as an HTML page"),
        ("/download/Mia Nanasawa/1", "Download one cached image by id"),
        ("/bulk-download/Mia Nanasawa", "Save every cached image to disk"),
        ("/downloads/Mia Nanasawa", "List saved images"),
        ("/health", "Health check"),
    ];

    let rows: String = endpoints
        .iter()
        .map(|(path, what)| {
            format!(
                "<tr><td><code>GET {}</code></td><td>{}</td></tr>\n",
                html_escape(path),
                html_escape(what)
            )
        })
        .collect();

    base_template(
        "Album API ready",
        &format!("<table>\n<tr><th>Endpoint</th><th>Purpose</th></tr>\n{}</table>", rows),
    )
}

/// Thumbnail grid for a cached album.
pub fn gallery_page(term: &str, index: u32, album: &[ImageRecord]) -> String {
    let figures: String = album
        .iter()
        .map(|record| {
            format!(
                r#"<figure>
    <a href="{url}" target="_blank" rel="noopener"><img src="{thumb}" alt="{name}" loading="lazy"></a>
    <figcaption>#{id} <a href="/download/{term}/{index}/{id}">{name}</a></figcaption>
</figure>
"#,
                url = html_escape(&record.url),
                thumb = html_escape(&record.thumb),
                name = html_escape(&record.name),
                id = record.id,
                term = html_escape(&urlencoding::encode(term)),
                index = index,
            )
        })
        .collect();

    base_template(
        &format!("{} (gallery {}, {} images)", term, index, album.len()),
        &format!(r#"<div class="grid">{}</div>"#, figures),
    )
}

/// Error page with a short explanation.
pub fn error_page(title: &str, message: &str) -> String {
    base_template(
        title,
        &format!(r#"<p class="error">{}</p>"#, html_escape(message)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{build_album, AlbumKey};

    #[test]
    fn gallery_escapes_term_and_links_downloads() {
        let album = build_album(
            &AlbumKey::indexed("<b>x</b>", 2),
            &["https://images2.imgbox.com/a/1.jpg".to_string()],
        );

        let html = gallery_page("<b>x</b>", 2, &album);

        assert!(html.contains("&lt;b&gt;x&lt;/b&gt; (gallery 2, 1 images)"));
        assert!(html.contains("/download/%3Cb%3Ex%3C%2Fb%3E/2/1"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn help_page_lists_endpoints() {
        let html = help_page();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("/bulk-download/"));
    }
}
