//! Runtime settings.
//!
//! Settings come from the environment (optionally seeded from a `.env` file)
//! and are then overridden by command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserEngineConfig;
use crate::scraper::ScrapeConfig;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

const CACHE_SUBDIR: &str = "cache";
const DOWNLOADS_SUBDIR: &str = "downloads";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Storage root.
    pub data_dir: PathBuf,
    /// One JSON file per album.
    pub cache_dir: PathBuf,
    /// One directory of image files per search term.
    pub downloads_dir: PathBuf,
    /// Listen address: PORT, HOST or HOST:PORT.
    pub bind: String,
    /// Base used for absolute links in listings (e.g. `https://albums.example.com`).
    pub public_url: Option<String>,
    /// Outbound proxy for both the browser and image fetches.
    pub proxy: Option<String>,
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Shared secret for the random-image endpoint. Unset rejects every request.
    pub api_key: Option<String>,
    /// Image fetch timeout in seconds.
    pub request_timeout: u64,
    /// Pause between bulk-download fetches in milliseconds.
    pub download_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .map(|d| d.join("albumfetch"))
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            cache_dir: data_dir.join(CACHE_SUBDIR),
            downloads_dir: data_dir.join(DOWNLOADS_SUBDIR),
            data_dir,
            bind: DEFAULT_BIND.to_string(),
            public_url: None,
            proxy: None,
            chrome_path: None,
            headless: true,
            api_key: None,
            request_timeout: 30,
            download_delay_ms: 1000,
        }
    }
}

impl Settings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| get(name).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(dir) = var("ALBUMFETCH_DATA_DIR") {
            settings.set_data_dir(PathBuf::from(dir));
        }
        if let Some(bind) = var("ALBUMFETCH_BIND") {
            settings.bind = bind;
        } else if let Some(port) = var("PORT") {
            settings.bind = format!("0.0.0.0:{}", port.trim());
        }
        settings.public_url = var("ALBUMFETCH_PUBLIC_URL");
        settings.proxy = var("ALBUMFETCH_PROXY");
        settings.chrome_path = var("CHROME_PATH").map(PathBuf::from);
        settings.api_key = var("ALBUMFETCH_API_KEY");
        if let Some(headless) = var("ALBUMFETCH_HEADLESS") {
            settings.headless = !matches!(
                headless.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Some(delay) = var("ALBUMFETCH_DOWNLOAD_DELAY_MS").and_then(|d| d.trim().parse().ok()) {
            settings.download_delay_ms = delay;
        }

        settings
    }

    /// Move the storage root, keeping the cache and downloads under it.
    pub fn set_data_dir(&mut self, data_dir: PathBuf) {
        self.cache_dir = data_dir.join(CACHE_SUBDIR);
        self.downloads_dir = data_dir.join(DOWNLOADS_SUBDIR);
        self.data_dir = data_dir;
    }

    /// Create the storage directories.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.data_dir, &self.cache_dir, &self.downloads_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Base URL for absolute links, without a trailing slash.
    pub fn public_base_url(&self, port: u16) -> String {
        match self.public_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", port),
        }
    }

    pub fn browser_config(&self) -> BrowserEngineConfig {
        let mut config = BrowserEngineConfig::default().with_env_overrides();
        config.headless = self.headless;
        config.proxy = self.proxy.clone();
        if let Some(ref path) = self.chrome_path {
            config.executable = Some(path.clone());
        }
        config
    }

    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig::default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.bind, DEFAULT_BIND);
        assert!(s.headless);
        assert_eq!(s.api_key, None);
        assert_eq!(s.download_delay(), Duration::from_secs(1));
        assert_eq!(s.cache_dir, s.data_dir.join("cache"));
    }

    #[test]
    fn environment_overrides() {
        let s = settings(&[
            ("ALBUMFETCH_DATA_DIR", "/srv/albums"),
            ("PORT", "8080"),
            ("ALBUMFETCH_PROXY", "socks5://127.0.0.1:1080"),
            ("ALBUMFETCH_API_KEY", "secret"),
            ("ALBUMFETCH_HEADLESS", "false"),
            ("ALBUMFETCH_DOWNLOAD_DELAY_MS", "250"),
        ]);

        assert_eq!(s.downloads_dir, PathBuf::from("/srv/albums/downloads"));
        assert_eq!(s.bind, "0.0.0.0:8080");
        assert_eq!(s.api_key.as_deref(), Some("secret"));
        assert!(!s.headless);
        assert_eq!(s.download_delay_ms, 250);

        let browser = s.browser_config();
        assert_eq!(browser.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert!(!browser.headless);
    }

    #[test]
    fn explicit_bind_wins_over_port() {
        let s = settings(&[("ALBUMFETCH_BIND", "127.0.0.1:4000"), ("PORT", "8080")]);
        assert_eq!(s.bind, "127.0.0.1:4000");
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[("ALBUMFETCH_API_KEY", "  ")]);
        assert_eq!(s.api_key, None);
    }

    #[test]
    fn public_base_url_falls_back_to_localhost() {
        let mut s = settings(&[]);
        assert_eq!(s.public_base_url(3000), "http://localhost:3000");

        s.public_url = Some("https://albums.example.com/".to_string());
        assert_eq!(s.public_base_url(3000), "https://albums.example.com");
    }
}
