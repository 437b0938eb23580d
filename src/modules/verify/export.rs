use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use super::record::{PROJECTED_FIELDS, VerificationResult};

pub const SHEET_NAME: &str = "Results";
const FILE_PREFIX: &str = "license-results-";

/// An in-memory XLSX file ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.xlsx", date.format("%Y-%m-%d"))
}

/// Builds the results workbook, or `None` when there is nothing to export.
///
/// Only the four projected columns are written; any other keys on the
/// records are dropped here.
pub fn export_results(
    results: &[VerificationResult],
    date: NaiveDate,
) -> Result<Option<ExportedWorkbook>> {
    if results.is_empty() {
        return Ok(None);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("failed to name results worksheet")?;

    for (col, header) in PROJECTED_FIELDS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .context("failed to write header row")?;
    }

    for (idx, result) in results.iter().enumerate() {
        let row: u32 = (idx + 1)
            .try_into()
            .context("too many results for a single worksheet")?;
        for (col, value) in result.export_row().iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value)
                .with_context(|| format!("failed to write result row {row}"))?;
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .context("failed to serialize results workbook")?;

    Ok(Some(ExportedWorkbook {
        file_name: export_file_name(date),
        bytes,
    }))
}
