//! Export adapters
//!
//! Stateless transforms of the ledger's contents at call time. Nothing
//! here mutates the ledger. File exports return `Ok(None)` without writing
//! anything when there are no entries.

pub mod csv;
pub mod excel;
pub mod format;
pub mod pdf;
pub mod text;

pub use self::csv::{csv_text, export_to_csv};
pub use excel::export_to_excel;
pub use format::{format_grouped, format_net};
pub use pdf::export_to_pdf;
pub use text::{batch_summary, item_summary};

use std::path::{Path, PathBuf};

use chrono::Utc;

pub const EXCEL_FILE_PREFIX: &str = "ScentValue_BatchExport_";
pub const CSV_FILE_PREFIX: &str = "ScentValue_BatchExport_";
pub const PDF_FILE_PREFIX: &str = "ScentValue_BatchReport_";

/// `{dir}/{prefix}{epoch_ms}.{extension}`
pub(crate) fn timestamped_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", prefix, Utc::now().timestamp_millis(), extension))
}

/// Column headings shared by the CSV and spreadsheet exports
pub(crate) fn currency_heading(base: &str, currency: &str) -> String {
    format!("{} ({})", base, currency)
}
