use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::export::{OutputFormat, write_rows};
use crate::models::keep_complete;
use crate::traits::RowSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub written: usize,
    pub skipped: usize,
    pub path: PathBuf,
}

pub struct PrizeFinder {
    source: Box<dyn RowSource>,
    output: PathBuf,
    format: OutputFormat,
}

impl PrizeFinder {
    pub fn new(source: Box<dyn RowSource>, output: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            source,
            output: output.into(),
            format,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        info!("Fetching prize table from {}", self.source.config().url);

        let items = self.source.fetch_items().await?;
        let extracted = items.len();

        let (rows, skipped) = keep_complete(items);
        if skipped > 0 {
            info!("Skipped {} incomplete rows", skipped);
        }
        if rows.is_empty() {
            warn!("No prize rows found, the page layout may have changed");
        }

        write_rows(&self.output, self.format, &rows)?;

        Ok(RunSummary {
            extracted,
            written: rows.len(),
            skipped,
            path: self.output.clone(),
        })
    }
}
