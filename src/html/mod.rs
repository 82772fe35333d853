//! Prize table extraction from static HTML
//!
//! Mirrors the inline browser script on a page that was saved to disk, so a
//! run can be repeated offline against a captured copy of the rules page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::models::RawPrizeItem;
use crate::traits::{RowSource, ScraperConfig, SiteSelectors};

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn first_text(row: &ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map_or_else(String::new, |el| el.text().collect::<String>().trim().to_string())
}

/// Map every row node to a `RawPrizeItem`, taking the text of the first
/// prize and move descendants and an empty string when one is missing.
pub fn extract_items(html: &str, selectors: &SiteSelectors) -> Result<Vec<RawPrizeItem>> {
    let row_selector = parse_selector(&selectors.row)?;
    let prize_selector = parse_selector(&selectors.prize)?;
    let move_selector = parse_selector(&selectors.move_number)?;

    let document = Html::parse_document(html);

    let items: Vec<RawPrizeItem> = document
        .select(&row_selector)
        .map(|row| RawPrizeItem {
            prize: first_text(&row, &prize_selector),
            move_number: first_text(&row, &move_selector),
        })
        .collect();

    debug!("Matched {} row nodes with `{}`", items.len(), selectors.row);
    Ok(items)
}

/// Reads a saved copy of the rules page instead of launching a browser
pub struct HtmlFileSource {
    path: PathBuf,
    config: ScraperConfig,
}

impl HtmlFileSource {
    pub fn new(path: impl Into<PathBuf>, config: ScraperConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }
}

#[async_trait]
impl RowSource for HtmlFileSource {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn fetch_items(&self) -> Result<Vec<RawPrizeItem>> {
        info!("Reading saved page from {}", self.path.display());

        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        extract_items(&html, &self.config.selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="LQnNN">
            <div class="bpONIu">
              <span class="jMNgrd">1</span>
              <span class="bzquVz">
                1 000 000 ₽
              </span>
            </div>
            <div class="bpONIu">
              <span class="jMNgrd">2</span>
            </div>
            <div class="bpONIu">
              <span class="jMNgrd"><b>3</b></span>
              <span class="bzquVz">500 ₽</span>
              <span class="bzquVz">ignored</span>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_rows_in_page_order() {
        let items = extract_items(PAGE, &SiteSelectors::default()).unwrap();

        assert_eq!(
            items,
            vec![
                RawPrizeItem::new("1", "1 000 000 ₽"),
                RawPrizeItem::new("2", ""),
                RawPrizeItem::new("3", "500 ₽"),
            ]
        );
    }

    #[test]
    fn keeps_text_as_the_page_renders_it() {
        let page = "<div class=bpONIu><span class=jMNgrd>1</span><span class=bzquVz>1\u{a0}000\u{a0}000 ₽</span></div>\
                    <div class=bpONIu><span class=jMNgrd>2</span><span class=bzquVz>10<small>000</small></span></div>";

        let items = extract_items(page, &SiteSelectors::default()).unwrap();

        assert_eq!(
            items,
            vec![
                RawPrizeItem::new("1", "1\u{a0}000\u{a0}000 ₽"),
                RawPrizeItem::new("2", "10000"),
            ]
        );
    }

    #[test]
    fn page_without_rows_yields_nothing() {
        let items = extract_items("<html><body><p>maintenance</p></body></html>", &SiteSelectors::default()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn rejects_malformed_selector() {
        let selectors = SiteSelectors {
            row: "div[".to_string(),
            ..SiteSelectors::default()
        };

        let err = extract_items(PAGE, &selectors).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::InvalidSelector { selector, .. }) if selector == "div["
        ));
    }
}
