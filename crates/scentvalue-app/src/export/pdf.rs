//! PDF batch report
//!
//! A4 portrait, built directly with lopdf using the standard Helvetica
//! fonts. The table header is repeated at the top of every page the table
//! spans. Coordinates are whole PDF points.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use scentvalue_domain::{LedgerEntry, PricingConfig};
use scentvalue_types::{Error, Result};
use tracing::info;

use super::format::{format_grouped, format_net};
use super::{timestamped_path, PDF_FILE_PREFIX};

pub const REPORT_TITLE: &str = "Inventory Valuation Batch";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const TITLE_Y: i64 = PAGE_HEIGHT - 57;
const SUBTITLE_Y: i64 = PAGE_HEIGHT - 85;
const TABLE_TOP_FIRST_PAGE: i64 = PAGE_HEIGHT - 113;
const TABLE_TOP: i64 = PAGE_HEIGHT - MARGIN;
const ROW_HEIGHT: i64 = 20;
const CELL_PADDING: i64 = 5;
const TEXT_BASELINE_OFFSET: i64 = 14;
const COLUMN_WIDTHS: [i64; 4] = [215, 100, 100, 100];
const COLUMN_HEADERS: [&str; 4] = ["Fragrance Name", "Gross Wt", "Net Vol", "Total Price"];
const TOTAL_GAP: i64 = 43;
const LABEL_MAX_CHARS: usize = 38;

/// Export the batch to a timestamped PDF in `dir`
pub fn export_to_pdf(entries: &[LedgerEntry], pricing: &PricingConfig, dir: &Path) -> Result<Option<PathBuf>> {
    if entries.is_empty() {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)?;
    let output_path = timestamped_path(dir, PDF_FILE_PREFIX, "pdf");
    write_report(entries, pricing, &output_path)?;

    info!(path = %output_path.display(), rows = entries.len(), "pdf report exported");
    Ok(Some(output_path))
}

/// Lay out the report and save it to `output_path`
pub fn write_report(entries: &[LedgerEntry], pricing: &PricingConfig, output_path: &Path) -> Result<()> {
    let pages = layout_pages(entries, pricing);
    let mut doc = build_document(pages)?;
    doc.save(output_path)?;
    Ok(())
}

fn subtitle(pricing: &PricingConfig) -> String {
    format!(
        "Pricing Rate: {} {}/g | Bottle Tare: {}g",
        pricing.rate_per_gram, pricing.currency, pricing.tare_grams
    )
}

fn table_row(entry: &LedgerEntry, pricing: &PricingConfig) -> [String; 4] {
    [
        truncate_label(entry.label()),
        format!("{}g", format_grouped(entry.gross_weight())),
        format!("{}ml", format_net(entry.net_weight())),
        format!("{} {}", format_grouped(entry.price()), pricing.currency),
    ]
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let cut: String = label.chars().take(LABEL_MAX_CHARS - 3).collect();
        format!("{}...", cut)
    } else {
        label.to_string()
    }
}

/// Page content streams as operation lists
fn layout_pages(entries: &[LedgerEntry], pricing: &PricingConfig) -> Vec<Vec<Operation>> {
    let mut pages = Vec::new();
    let mut ops = Vec::new();

    text(&mut ops, "F2", 22, MARGIN, TITLE_Y, REPORT_TITLE);
    set_fill_gray(&mut ops, 0.4);
    text(&mut ops, "F1", 10, MARGIN, SUBTITLE_Y, &subtitle(pricing));

    let mut y = TABLE_TOP_FIRST_PAGE;
    header_row(&mut ops, y);
    y -= ROW_HEIGHT;

    for entry in entries {
        if y - ROW_HEIGHT < MARGIN {
            pages.push(std::mem::take(&mut ops));
            y = TABLE_TOP;
            header_row(&mut ops, y);
            y -= ROW_HEIGHT;
        }
        body_row(&mut ops, y, &table_row(entry, pricing));
        y -= ROW_HEIGHT;
    }

    let total: f64 = entries.iter().map(LedgerEntry::price).sum();
    let mut total_y = y - TOTAL_GAP + ROW_HEIGHT;
    if total_y < MARGIN {
        pages.push(std::mem::take(&mut ops));
        total_y = TABLE_TOP - TOTAL_GAP;
    }
    set_fill_gray(&mut ops, 0.0);
    text(
        &mut ops,
        "F2",
        14,
        MARGIN,
        total_y,
        &format!("Total Batch Value: {} {}", format_grouped(total), pricing.currency),
    );

    pages.push(ops);
    pages
}

/// Dark filled header row with white text
fn header_row(ops: &mut Vec<Operation>, top: i64) {
    let table_width: i64 = COLUMN_WIDTHS.iter().sum();
    set_fill_gray(ops, 0.08);
    ops.push(Operation::new(
        "re",
        ints(&[MARGIN, top - ROW_HEIGHT, table_width, ROW_HEIGHT]),
    ));
    ops.push(Operation::new("f", vec![]));

    set_fill_gray(ops, 1.0);
    let mut x = MARGIN;
    for (header, width) in COLUMN_HEADERS.iter().zip(COLUMN_WIDTHS) {
        text(ops, "F2", 10, x + CELL_PADDING, top - TEXT_BASELINE_OFFSET, header);
        x += width;
    }
    grid(ops, top);
}

fn body_row(ops: &mut Vec<Operation>, top: i64, cells: &[String; 4]) {
    set_fill_gray(ops, 0.0);
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        text(ops, "F1", 10, x + CELL_PADDING, top - TEXT_BASELINE_OFFSET, cell);
        x += width;
    }
    grid(ops, top);
}

/// Cell borders for one row
fn grid(ops: &mut Vec<Operation>, top: i64) {
    ops.push(Operation::new("G", vec![Object::Real(0.75)]));
    ops.push(Operation::new("w", vec![Object::Real(0.5)]));
    let mut x = MARGIN;
    for width in COLUMN_WIDTHS {
        ops.push(Operation::new("re", ints(&[x, top - ROW_HEIGHT, width, ROW_HEIGHT])));
        x += width;
    }
    ops.push(Operation::new("S", vec![]));
}

fn set_fill_gray(ops: &mut Vec<Operation>, level: f32) {
    ops.push(Operation::new("g", vec![Object::Real(level.into())]));
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, content: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new("Td", ints(&[x, y])));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(content))]));
    ops.push(Operation::new("ET", vec![]));
}

fn ints(values: &[i64]) -> Vec<Object> {
    values.iter().map(|v| Object::Integer(*v)).collect()
}

/// Latin-1 bytes for the WinAnsi-encoded standard fonts; anything else becomes '?'
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let page_id = add_page(&mut doc, pages_id, operations)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => ints(&[0, 0, PAGE_WIDTH, PAGE_HEIGHT]),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(doc: &mut Document, pages_id: ObjectId, operations: Vec<Operation>) -> Result<ObjectId> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| Error::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvalue_domain::BatchLedger;

    fn ledger_with(count: usize) -> BatchLedger {
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());
        for i in 0..count {
            ledger.add_entry(636.0 + i as f64, Some(format!("Bottle {}", i + 1).as_str())).unwrap();
        }
        ledger
    }

    #[test]
    fn test_subtitle_states_pricing() {
        assert_eq!(
            subtitle(&PricingConfig::default()),
            "Pricing Rate: 230 TSh/g | Bottle Tare: 136g"
        );
    }

    #[test]
    fn test_row_cells_are_display_formatted() {
        let mut ledger = ledger_with(0);
        let entry = ledger.add_entry(1236.0, Some("Oud")).unwrap().unwrap();
        assert_eq!(
            table_row(&entry, ledger.pricing()),
            [
                "Oud".to_string(),
                "1,236g".to_string(),
                "1100.00ml".to_string(),
                "253,000 TSh".to_string()
            ]
        );
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let label = "x".repeat(80);
        let cut = truncate_label(&label);
        assert_eq!(cut.chars().count(), LABEL_MAX_CHARS);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_non_latin_text_is_replaced() {
        assert_eq!(win_ansi("Café 香水"), b"Caf\xe9 ??".to_vec());
    }

    #[test]
    fn test_small_batch_fits_one_page() {
        let ledger = ledger_with(3);
        let pages = layout_pages(&ledger.entries().unwrap(), ledger.pricing());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_header_repeats_on_every_page() {
        let ledger = ledger_with(120);
        let pages = layout_pages(&ledger.entries().unwrap(), ledger.pricing());
        assert!(pages.len() >= 3);

        for page in &pages {
            let headers = page
                .iter()
                .filter(|op| {
                    op.operator == "Tj"
                        && matches!(op.operands.first(), Some(Object::String(bytes, _)) if bytes.as_slice() == b"Fragrance Name")
                })
                .count();
            assert_eq!(headers, 1);
        }
    }

    #[test]
    fn test_report_is_a_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger_with(60);

        let path = export_to_pdf(&ledger.entries().unwrap(), ledger.pricing(), dir.path())
            .unwrap()
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ScentValue_BatchReport_") && name.ends_with(".pdf"));

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_empty_ledger_writes_no_report() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_to_pdf(&[], &PricingConfig::default(), dir.path()).unwrap().is_none());
    }
}
