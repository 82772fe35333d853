use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::HEADERS;
use crate::models::PrizeRow;

const SHEET_NAME: &str = "Results";
const COLUMN_WIDTHS: [f64; 2] = [14.0, 24.0];

/// Single-sheet workbook with a bold, frozen header row
pub struct ExcelExporter {
    workbook: Workbook,
}

impl ExcelExporter {
    pub fn new() -> Result<Self> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header = Format::new().set_bold();
        for (col, title) in (0u16..).zip(HEADERS) {
            worksheet.write_string_with_format(0, col, title, &header)?;
            worksheet.set_column_width(col, COLUMN_WIDTHS[usize::from(col)])?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        Ok(Self { workbook })
    }

    pub fn write_rows(&mut self, rows: &[PrizeRow]) -> Result<()> {
        let worksheet = self.workbook.worksheet_from_index(0)?;

        for (row_num, row) in (1u32..).zip(rows) {
            worksheet.write_string(row_num, 0, &row.move_number)?;
            worksheet.write_string(row_num, 1, &row.prize)?;
        }

        Ok(())
    }

    pub fn save(mut self, path: &Path) -> Result<()> {
        self.workbook
            .save(path)
            .with_context(|| format!("Failed to save workbook {}", path.display()))?;
        Ok(())
    }
}
