use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;

use crate::traits::PageFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Page fetcher backed by a Chrome instance launched per request
#[derive(Debug, Clone)]
pub struct ChromeFetcher {
    headless: bool,
    settle_delay: Duration,
}

impl ChromeFetcher {
    pub fn new(headless: bool, settle_delay: Duration) -> Self {
        Self {
            headless,
            settle_delay,
        }
    }

    fn render(&self, url: &str) -> Result<String> {
        debug!("Launching headless Chrome");

        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .build()
            .context("Failed to build launch options")?;

        // The browser process is killed when `browser` drops, on every path
        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        tab.set_extra_http_headers(HashMap::from([("User-Agent", USER_AGENT)]))
            .context("Failed to set request headers")?;

        debug!("Navigating to {}", url);
        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Timed out loading {url}"))?;

        // No readiness signal on the results page, give scripts time to render
        thread::sleep(self.settle_delay);

        let html = tab.get_content().context("Failed to read page content")?;
        debug!("Captured {} bytes of rendered HTML", html.len());

        Ok(html)
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    async fn fetch_rendered(&self, url: &str) -> Result<String> {
        let fetcher = self.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || fetcher.render(&url))
            .await
            .context("Browser task panicked")?
    }
}
