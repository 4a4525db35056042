//! Browser engine configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Desktop Chrome user agent presented to the origin site.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Browser engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Proxy server URL (e.g., "socks5://127.0.0.1:1080").
    #[serde(default)]
    pub proxy: Option<String>,

    /// Chrome executable; auto-detected when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// User agent sent with every page request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Viewport size in CSS pixels.
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            proxy: None,
            executable: None,
            user_agent: default_user_agent(),
            viewport: default_viewport(),
            chrome_args: Vec::new(),
        }
    }
}

impl BrowserEngineConfig {
    /// Apply `CHROME_PATH` and `CHROME_ARGS` from the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var("CHROME_PATH").ok().filter(|s| !s.is_empty()) {
            self.executable = Some(PathBuf::from(path));
        }
        if let Ok(args) = std::env::var("CHROME_ARGS") {
            self.chrome_args
                .extend(args.split_whitespace().map(str::to_string));
        }
        self
    }

    /// Chrome command-line arguments derived from this config.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];
        if let Some(ref proxy) = self.proxy {
            args.push(format!("--proxy-server={}", proxy));
        }
        args.extend(self.chrome_args.iter().cloned());
        args
    }
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_viewport() -> (u32, u32) {
    (1280, 720)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_args_include_sandbox_flags_and_proxy() {
        let config = BrowserEngineConfig {
            proxy: Some("socks5://127.0.0.1:9050".to_string()),
            chrome_args: vec!["--lang=en-US".to_string()],
            ..Default::default()
        };

        let args = config.launch_args();
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--disable-setuid-sandbox".to_string()));
        assert!(args.contains(&"--proxy-server=socks5://127.0.0.1:9050".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--user-agent=Mozilla")));
        assert_eq!(args.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[test]
    fn defaults_are_headless_without_proxy() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert!(config.proxy.is_none());
        assert_eq!(config.viewport, (1280, 720));
        assert!(!config
            .launch_args()
            .iter()
            .any(|a| a.starts_with("--proxy-server")));
    }
}
