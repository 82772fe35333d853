use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures specific to scraping the prize table.
///
/// Everything else (I/O, browser protocol, spreadsheet writer) travels as a
/// plain `anyhow::Error` with context attached at the call site.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid CSS selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("browser executable not found at {}", .0.display())]
    ExecutableMissing(PathBuf),

    #[error("page returned no value from the extraction script")]
    EmptyEvaluation,

    #[error("unexpected extraction result: {0}")]
    UnexpectedResult(String),

    #[error("scrape did not finish within {0:?}")]
    Timeout(Duration),
}
