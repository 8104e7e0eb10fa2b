//! CSV export (clipboard text and file)

use std::path::{Path, PathBuf};

use scentvalue_domain::{LedgerEntry, PricingConfig};
use scentvalue_types::{Error, Result};
use tracing::info;

use super::format::format_net;
use super::{currency_heading, timestamped_path, CSV_FILE_PREFIX};

/// Header row plus one row per entry in ledger order.
///
/// Gross weight and price are raw numbers, net weight has two decimals.
/// No trailing newline.
pub fn csv_text(entries: &[LedgerEntry], pricing: &PricingConfig) -> Result<String> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([
        "Fragrance Name".to_string(),
        "Gross Weight (g)".to_string(),
        "Net (ml)".to_string(),
        currency_heading("Total Price", &pricing.currency),
    ])?;

    for entry in entries {
        writer.write_record([
            entry.label().to_string(),
            entry.gross_weight().to_string(),
            format_net(entry.net_weight()),
            entry.price().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::other(e.error().to_string())))?;
    let text = String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))?;
    Ok(text.trim_end_matches('\n').to_string())
}

/// Write the CSV text to a timestamped file in `dir`
pub fn export_to_csv(entries: &[LedgerEntry], pricing: &PricingConfig, dir: &Path) -> Result<Option<PathBuf>> {
    if entries.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let output_path = timestamped_path(dir, CSV_FILE_PREFIX, "csv");
    std::fs::write(&output_path, csv_text(entries, pricing)?)?;

    info!(path = %output_path.display(), rows = entries.len(), "csv exported");
    Ok(Some(output_path))
}
