//! Writers for the extracted prize table
//!
//! Both formats share the same two columns, move number first and prize
//! second, with a header row that is written even when there are no rows.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::PrizeRow;

mod csv_writer;
mod excel_writer;

pub use csv_writer::CsvExporter;
pub use excel_writer::ExcelExporter;

/// Column headers, move number then prize.
pub const HEADERS: [&str; 2] = ["Номер хода", "Размер выигрыша"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// Infer the format from a file extension; anything but `.xlsx` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => f.write_str("CSV"),
            Self::Xlsx => f.write_str("XLSX"),
        }
    }
}

/// Write `rows` to `path` in `format`, creating parent directories as needed.
pub fn write_rows(path: &Path, format: OutputFormat, rows: &[PrizeRow]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    match format {
        OutputFormat::Csv => {
            let mut exporter = CsvExporter::new(path)?;
            exporter.write_header()?;
            for row in rows {
                exporter.write_row(row)?;
            }
            exporter.finalize()?;
        }
        OutputFormat::Xlsx => {
            let mut exporter = ExcelExporter::new()?;
            exporter.write_rows(rows)?;
            exporter.save(path)?;
        }
    }

    info!("Wrote {} rows to {} ({format})", rows.len(), path.display());
    Ok(())
}
