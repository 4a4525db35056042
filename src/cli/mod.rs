//! Command-line interface.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "albumfetch")]
#[command(about = "Scrape, cache and serve image albums")]
#[command(version)]
pub struct Cli {
    /// Storage root holding the cache and downloads
    #[arg(long, global = true, env = "ALBUMFETCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Outbound proxy for the browser and image fetches (e.g. socks5://127.0.0.1:1080)
    #[arg(long, global = true, env = "ALBUMFETCH_PROXY")]
    proxy: Option<String>,

    /// Chrome/Chromium executable
    #[arg(long, global = true, env = "CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Show the browser window while scraping
    #[arg(long, global = true)]
    headed: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: ALBUMFETCH_BIND, PORT or 0.0.0.0:3000)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Look up an album, scraping it when the cache has nothing
    Scrape {
        /// Search term
        term: String,
        /// 1-based gallery index (default: search page plus the first galleries)
        #[arg(short, long)]
        index: Option<i64>,
        /// Print the album as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save every image of a cached album to the downloads directory
    Download {
        /// Search term
        term: String,
        /// Gallery index used when the album was scraped
        #[arg(short, long)]
        index: Option<u32>,
    },
}

impl Cli {
    /// Environment settings with command-line overrides applied.
    fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(ref dir) = self.data_dir {
            settings.set_data_dir(dir.clone());
        }
        if self.proxy.is_some() {
            settings.proxy = self.proxy.clone();
        }
        if self.chrome.is_some() {
            settings.chrome_path = self.chrome.clone();
        }
        if self.headed {
            settings.headless = false;
        }
        settings
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            commands::serve::cmd_serve(&settings, &bind).await
        }
        Commands::Scrape { term, index, json } => {
            commands::scrape::cmd_scrape(&settings, &term, index, json).await
        }
        Commands::Download { term, index } => {
            commands::download::cmd_download(&settings, &term, index).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from([
            "albumfetch",
            "--data-dir",
            "/tmp/albums",
            "--proxy",
            "http://127.0.0.1:8080",
            "--headed",
            "scrape",
            "Mia Nanasawa",
            "--index",
            "2",
        ]);

        let settings = cli.settings();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/albums/cache"));
        assert_eq!(settings.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(!settings.headless);
        assert!(matches!(
            cli.command,
            Commands::Scrape { ref term, index: Some(2), json: false } if term == "Mia Nanasawa"
        ));
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
