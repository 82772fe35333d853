use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use super::HEADERS;
use crate::models::PrizeRow;

pub struct CsvExporter {
    writer: Writer<File>,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Result<Self> {
        let writer = Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

        Ok(Self { writer })
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(HEADERS)?;
        Ok(())
    }

    pub fn write_row(&mut self, row: &PrizeRow) -> Result<()> {
        self.writer
            .write_record([row.move_number.as_str(), row.prize.as_str()])?;
        Ok(())
    }

    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV file")?;
        Ok(())
    }
}
