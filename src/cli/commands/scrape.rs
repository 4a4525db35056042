//! Album lookup command.

use console::style;

use crate::config::Settings;
use crate::scraper::GallerySelection;
use crate::services::{AlbumError, AlbumService};

/// Look up an album through the cache and print it.
pub async fn cmd_scrape(
    settings: &Settings,
    term: &str,
    index: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    settings.ensure_directories()?;
    let service = AlbumService::from_settings(settings);
    let selection = index.map_or(GallerySelection::All, GallerySelection::Index);

    println!("{} Looking up {}", style("→").cyan(), style(term).bold());

    let found = match service.lookup(term, selection).await {
        Ok(found) => found,
        Err(AlbumError::InvalidIndex { index, links }) => {
            eprintln!(
                "{} Gallery {} does not exist; {} galleries found:",
                style("✗").red(),
                index,
                links.len()
            );
            for (i, link) in links.iter().enumerate() {
                eprintln!("  {:>3}. {}", i + 1, link);
            }
            anyhow::bail!("invalid gallery index {}", index);
        }
        Err(AlbumError::NotFound {
            attempts,
            search_url,
            ..
        }) => {
            eprintln!(
                "{} No images found after {} attempts. Check {}",
                style("✗").red(),
                attempts,
                search_url
            );
            anyhow::bail!("no images found for \"{}\"", term);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&found.album)?);
        return Ok(());
    }

    println!(
        "{} {} images from {}",
        style("✓").green(),
        found.album.len(),
        found.source
    );
    if let Some(ref gallery) = found.gallery_url {
        println!("  {} {}", style("gallery").dim(), gallery);
    }
    for record in &found.album {
        println!("  {:>3}  {}  {}", record.id, record.name, style(&record.url).dim());
    }

    Ok(())
}
