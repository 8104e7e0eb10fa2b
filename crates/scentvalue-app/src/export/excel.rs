//! Excel export functionality

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use scentvalue_domain::{LedgerEntry, PricingConfig};
use scentvalue_types::{Error, Result};
use tracing::info;

use super::{currency_heading, timestamped_path, EXCEL_FILE_PREFIX};

pub const SHEET_NAME: &str = "Inventory Batch";

/// Export the batch to a timestamped workbook in `dir`
pub fn export_to_excel(entries: &[LedgerEntry], pricing: &PricingConfig, dir: &Path) -> Result<Option<PathBuf>> {
    if entries.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let output_path = timestamped_path(dir, EXCEL_FILE_PREFIX, "xlsx");
    write_workbook(entries, pricing, &output_path)?;

    info!(path = %output_path.display(), rows = entries.len(), "workbook exported");
    Ok(Some(output_path))
}

/// Write the batch to an Excel file at `output_path`
pub fn write_workbook(entries: &[LedgerEntry], pricing: &PricingConfig, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_batch_sheet(sheet, entries, pricing)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_batch_sheet(sheet: &mut Worksheet, entries: &[LedgerEntry], pricing: &PricingConfig) -> Result<()> {
    sheet
        .set_name(SHEET_NAME)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    let net_format = Format::new().set_num_format("0.00");

    let headers = [
        "Fragrance Name".to_string(),
        "Gross Weight (g)".to_string(),
        "Net Weight (ml)".to_string(),
        currency_heading("Total Amount", &pricing.currency),
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (row_idx, entry) in entries.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, entry.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, entry.gross_weight())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number_with_format(row, 2, entry.net_weight(), &net_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 3, entry.price())
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 30)
        .map_err(|e| Error::Excel(e.to_string()))?;
    for col in 1..=3 {
        sheet
            .set_column_width(col, 18)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvalue_domain::BatchLedger;

    #[test]
    fn test_empty_ledger_writes_no_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_to_excel(&[], &PricingConfig::default(), dir.path()).unwrap();
        assert!(written.is_none());
    }

    #[test]
    fn test_workbook_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());
        ledger.add_entry(636.0, Some("X")).unwrap();
        ledger.add_entry(1236.0, Some("Y")).unwrap();

        let path = export_to_excel(&ledger.entries().unwrap(), ledger.pricing(), dir.path())
            .unwrap()
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ScentValue_BatchExport_") && name.ends_with(".xlsx"));

        // xlsx is a zip archive
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
