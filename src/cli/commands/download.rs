//! Bulk download command.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::services::{album_dir, AlbumService, BulkDownloader, HttpImageFetcher};

/// Save every image of a cached album to disk.
pub async fn cmd_download(settings: &Settings, term: &str, index: Option<u32>) -> anyhow::Result<()> {
    settings.ensure_directories()?;
    let service = AlbumService::from_settings(settings);

    let album = match service.cached(term, index).await? {
        Some(album) if !album.is_empty() => album,
        _ => {
            let hint = match index {
                Some(i) => format!("albumfetch scrape \"{}\" --index {}", term, i),
                None => format!("albumfetch scrape \"{}\"", term),
            };
            anyhow::bail!("no cached images for \"{}\"; run `{}` first", term, hint);
        }
    };

    let fetcher = HttpImageFetcher::new(settings.proxy.as_deref(), settings.request_timeout())?;
    let downloader = BulkDownloader::new(Arc::new(fetcher), settings.download_delay());
    let dir = album_dir(&settings.downloads_dir, term);

    println!(
        "{} Downloading {} images to {}",
        style("→").cyan(),
        album.len(),
        dir.display()
    );

    let report = downloader.run(&album, &dir).await?;

    for failure in report.failures() {
        println!(
            "  {} {} {}",
            style("✗").red(),
            failure.name,
            style(failure.error.as_deref().unwrap_or("")).dim()
        );
    }
    println!(
        "{} {} downloaded, {} skipped, {} failed",
        if report.failed == 0 {
            style("✓").green()
        } else {
            style("!").yellow()
        },
        report.downloaded,
        report.skipped,
        report.failed
    );

    Ok(())
}
