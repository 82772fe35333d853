//! Traits and configuration shared by every row source

use anyhow::Result;
use async_trait::async_trait;

use crate::models::RawPrizeItem;

/// Rules page of the "Мечталлион" lottery.
pub const DEFAULT_URL: &str = "https://nloto.ru/lottery/mechtallion/rules";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Configuration for a page scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name used in logs
    pub name: String,
    /// Page holding the prize table
    pub url: String,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
    /// User agent sent by the browser
    pub user_agent: String,
}

impl ScraperConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            name: "Mechtallion".to_string(),
            url: url.into(),
            selectors: SiteSelectors::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::with_url(DEFAULT_URL)
    }
}

/// CSS selectors for the prize table
///
/// The class names are generated by the site's CSS-in-JS build and change
/// whenever the frontend is redeployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelectors {
    /// Element whose presence means the table has rendered
    pub ready: String,
    /// One element per table row
    pub row: String,
    /// Prize amount within a row
    pub prize: String,
    /// Move number within a row
    pub move_number: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            ready: ".LQnNN".to_string(),
            row: ".bpONIu".to_string(),
            prize: ".bzquVz".to_string(),
            move_number: ".jMNgrd".to_string(),
        }
    }
}

/// Anything that can produce the raw (move, prize) items of the table
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Get the configuration for this source
    fn config(&self) -> &ScraperConfig;

    /// Pull every row of the table, in page order
    ///
    /// # Returns
    /// * `Result<Vec<RawPrizeItem>>` - Items as found on the page, possibly with empty fields
    async fn fetch_items(&self) -> Result<Vec<RawPrizeItem>>;
}
