//! chromiumoxide-backed browser sessions.

use super::BrowserEngineConfig;

#[cfg(feature = "browser")]
pub use enabled::ChromeLauncher;

#[cfg(not(feature = "browser"))]
pub use disabled::ChromeLauncher;

#[cfg(feature = "browser")]
mod enabled {
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use async_trait::async_trait;
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use tracing::{debug, info, warn};

    use super::BrowserEngineConfig;
    use crate::browser::{BrowserError, BrowserLauncher, BrowserSession, PageLoad};

    /// Reads the main document's HTTP status from the Navigation Timing entry.
    const RESPONSE_STATUS_SCRIPT: &str = r#"
        (() => {
            const entry = performance.getEntriesByType('navigation')[0];
            return entry && entry.responseStatus ? entry.responseStatus : null;
        })()
    "#;

    const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body ? document.body.scrollHeight : 0)";

    /// Launches one local Chrome process per session.
    pub struct ChromeLauncher {
        config: BrowserEngineConfig,
    }

    impl ChromeLauncher {
        /// Common Chrome executable paths to check.
        const CHROME_PATHS: &'static [&'static str] = &[
            // Linux
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            // macOS
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            // Common install locations
            "/opt/google/chrome/google-chrome",
        ];

        const CHROME_COMMANDS: &'static [&'static str] = &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ];

        pub fn new(config: BrowserEngineConfig) -> Self {
            Self { config }
        }

        /// Resolve the Chrome executable: explicit override, known paths, then PATH.
        fn find_chrome(&self) -> Result<PathBuf, BrowserError> {
            if let Some(ref path) = self.config.executable {
                if path.exists() {
                    return Ok(path.clone());
                }
                return Err(BrowserError::LaunchFailed(format!(
                    "configured Chrome executable not found: {}",
                    path.display()
                )));
            }

            for path in Self::CHROME_PATHS {
                let p = Path::new(path);
                if p.exists() {
                    debug!("Found Chrome at: {}", path);
                    return Ok(p.to_path_buf());
                }
            }

            for cmd in Self::CHROME_COMMANDS {
                if let Ok(path) = which::which(cmd) {
                    debug!("Found Chrome in PATH: {}", path.display());
                    return Ok(path);
                }
            }

            Err(BrowserError::LaunchFailed(
                "Chrome/Chromium not found. Install it or set CHROME_PATH".to_string(),
            ))
        }
    }

    #[async_trait]
    impl BrowserLauncher for ChromeLauncher {
        async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
            let chrome_path = self.find_chrome()?;
            info!(
                "Launching browser {} (headless={})",
                chrome_path.display(),
                self.config.headless
            );

            let (width, height) = self.config.viewport;
            let mut builder = BrowserConfig::builder()
                .chrome_executable(chrome_path)
                .window_size(width, height);

            // with_head means NOT headless
            if !self.config.headless {
                builder = builder.with_head();
            }
            for arg in self.config.launch_args() {
                builder = builder.arg(arg);
            }

            let config = builder.build().map_err(BrowserError::LaunchFailed)?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

            let handler_task = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            let page = browser.new_page("about:blank").await;
            let mut session = ChromeSession {
                browser: Some(browser),
                page: None,
                handler: Some(handler_task),
            };

            match page {
                Ok(page) => session.page = Some(page),
                Err(e) => {
                    session.close().await;
                    return Err(BrowserError::LaunchFailed(format!(
                        "failed to open page: {}",
                        e
                    )));
                }
            }

            Ok(Box::new(session))
        }
    }

    /// One Chrome process with a single page.
    struct ChromeSession {
        browser: Option<Browser>,
        page: Option<Page>,
        handler: Option<JoinHandle<()>>,
    }

    impl ChromeSession {
        fn page(&self) -> Result<&Page, BrowserError> {
            self.page
                .as_ref()
                .ok_or_else(|| BrowserError::Script("session is closed".to_string()))
        }
    }

    #[async_trait]
    impl BrowserSession for ChromeSession {
        async fn navigate(
            &mut self,
            url: &str,
            timeout: Duration,
        ) -> Result<PageLoad, BrowserError> {
            let page = self.page().map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

            debug!("Navigating to {}", url);
            // goto resolves once the navigation has committed and loaded.
            match tokio::time::timeout(timeout, page.goto(url)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    return Err(BrowserError::NavigationFailed {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
                Err(_) => {
                    return Err(BrowserError::Timeout {
                        url: url.to_string(),
                        secs: timeout.as_secs(),
                    })
                }
            }

            let status = match page.evaluate(RESPONSE_STATUS_SCRIPT).await {
                Ok(result) => result
                    .value()
                    .and_then(|v| v.as_u64())
                    .and_then(|s| u16::try_from(s).ok()),
                Err(e) => {
                    debug!("Could not read response status for {}: {}", url, e);
                    None
                }
            };

            let final_url = match page.url().await {
                Ok(Some(u)) => u.to_string(),
                _ => url.to_string(),
            };

            Ok(PageLoad { status, final_url })
        }

        async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, BrowserError> {
            let page = self.page()?;
            let result = page
                .evaluate(script)
                .await
                .map_err(|e| BrowserError::Script(e.to_string()))?;
            Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
        }

        async fn scroll_to_bottom(&mut self) -> Result<(), BrowserError> {
            self.evaluate(SCROLL_SCRIPT).await.map(|_| ())
        }

        async fn close(&mut self) {
            if let Some(page) = self.page.take() {
                let _ = page.close().await;
            }
            if let Some(mut browser) = self.browser.take() {
                if let Err(e) = browser.close().await {
                    warn!("Browser close failed: {}", e);
                }
                let _ = browser.wait().await;
                debug!("Browser process exited");
            }
            if let Some(handler) = self.handler.take() {
                handler.abort();
            }
        }
    }
}

#[cfg(not(feature = "browser"))]
mod disabled {
    use async_trait::async_trait;

    use super::BrowserEngineConfig;
    use crate::browser::{BrowserError, BrowserLauncher, BrowserSession};

    // Stub for when browser feature is disabled
    pub struct ChromeLauncher {
        #[allow(dead_code)]
        config: BrowserEngineConfig,
    }

    impl ChromeLauncher {
        pub fn new(config: BrowserEngineConfig) -> Self {
            Self { config }
        }
    }

    #[async_trait]
    impl BrowserLauncher for ChromeLauncher {
        async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
            Err(BrowserError::LaunchFailed(
                "Browser support not compiled. Rebuild with: cargo build --features browser"
                    .to_string(),
            ))
        }
    }
}
