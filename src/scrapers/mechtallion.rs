//! nloto.ru "Мечталлион" rules page scraper

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::browser::{BrowserSession, BrowserSettings, setup_browser};
use crate::error::ScrapeError;
use crate::models::RawPrizeItem;
use crate::traits::{RowSource, ScraperConfig};

/// Overall budget for loading the page and extracting the table.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Live scraper driving a headless browser
pub struct MechtallionScraper {
    config: ScraperConfig,
    browser: BrowserSettings,
    timeout: Duration,
}

impl MechtallionScraper {
    pub fn new(config: ScraperConfig, browser: BrowserSettings, timeout: Duration) -> Self {
        Self {
            config,
            browser,
            timeout,
        }
    }
}

#[async_trait]
impl RowSource for MechtallionScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn fetch_items(&self) -> Result<Vec<RawPrizeItem>> {
        info!("Scraping prize table from {}", self.config.name);

        // A first run may download Chromium, so launching stays outside the timeout.
        let config = self.config.clone();
        let settings = self.browser.clone();
        let timeout = self.timeout;
        let session = tokio::task::spawn_blocking(move || {
            let binary = setup_browser(&settings)?;
            BrowserSession::launch(&binary, &config, &settings, timeout)
        })
        .await
        .context("Browser launch task failed")??;

        let url = self.config.url.clone();
        let selectors = self.config.selectors.clone();
        let items = run_with_budget(timeout, move || session.scrape(&url, &selectors, timeout)).await?;

        info!("Page returned {} rows", items.len());
        Ok(items)
    }
}

/// Run blocking `work` on the blocking pool and fail with
/// `ScrapeError::Timeout` once `budget` has elapsed.
///
/// On timeout the task is still awaited, so whatever it owns (the browser
/// session) is dropped and its process killed before the error is returned.
pub async fn run_with_budget<T, F>(budget: Duration, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let mut task = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(budget, &mut task).await {
        Ok(joined) => joined.context("Browser scrape task failed")?,
        Err(_) => {
            warn!("Scrape exceeded {budget:?}, waiting for the browser to shut down");
            let _ = task.await;
            Err(ScrapeError::Timeout(budget).into())
        }
    }
}
