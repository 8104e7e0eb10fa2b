//! Capture service: turn a still image into a weight or ledger entries

use std::path::Path;

use scentvalue_domain::{BatchLedger, LedgerEntry, LedgerStore};
use scentvalue_infra::{load_data_url, load_upload};
use scentvalue_types::{EncodedImage, Result, ScannerMode};
use scentvalue_vision::Assistant;
use tracing::{debug, info};

pub const SCANNING_MESSAGE: &str = "Scanning document for names and weights...";
pub const NO_DATA_MESSAGE: &str = "No valid data found in the image. Please try a clearer photo.";
pub const PROCESSING_ERROR_MESSAGE: &str = "Processing error. Please try again.";
pub const CAMERA_BLOCKED_MESSAGE: &str =
    "Camera blocked. Please use the upload command to scan your document instead.";

/// What a processed image produced
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Single mode: gross weight read off the scale, 0 when unreadable
    Weight(f64),
    /// Batch mode: items recognized on the document and the entries created from them
    Batch { found: usize, added: Vec<LedgerEntry> },
}

impl CaptureOutcome {
    /// Text shown in the assistant response area
    pub fn message(&self) -> String {
        match self {
            CaptureOutcome::Weight(grams) => format!("Detected Weight: {}g", grams),
            CaptureOutcome::Batch { found: 0, .. } => NO_DATA_MESSAGE.to_string(),
            CaptureOutcome::Batch { found, .. } => format!(
                "Successfully found {} items in document. Added to pending batch.",
                found
            ),
        }
    }
}

/// Send the image to the assistant and route the answer.
///
/// Single mode only reports the weight; the caller decides whether to
/// pre-fill the input. Batch mode adds every recognized item to the ledger
/// directly, skipping items the ledger rejects.
pub async fn recognize<S: LedgerStore>(
    assistant: &dyn Assistant,
    ledger: &mut BatchLedger<S>,
    image: &EncodedImage,
    mode: ScannerMode,
) -> Result<CaptureOutcome> {
    match mode {
        ScannerMode::Single => {
            let grams = assistant.read_scale_image(image).await;
            debug!(grams, "scale image read");
            Ok(CaptureOutcome::Weight(grams))
        }
        ScannerMode::Batch => {
            let items = assistant.read_batch_document(image).await;
            let mut added = Vec::with_capacity(items.len());
            for item in &items {
                match ledger.add_entry(item.weight, Some(item.name.as_str()))? {
                    Some(entry) => added.push(entry),
                    None => debug!(name = %item.name, weight = item.weight, "skipped unusable batch item"),
                }
            }
            info!(found = items.len(), added = added.len(), "batch document processed");
            Ok(CaptureOutcome::Batch {
                found: items.len(),
                added,
            })
        }
    }
}

/// Load an uploaded image from a file path or a `data:` URL
pub fn load_image_source(source: &str) -> Result<EncodedImage> {
    if source.trim_start().starts_with("data:") {
        load_data_url(source)
    } else {
        load_upload(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvalue_domain::PricingConfig;
    use scentvalue_types::BatchItem;
    use scentvalue_vision::ScriptedAssistant;

    fn image() -> EncodedImage {
        EncodedImage::jpeg("AAAA".to_string())
    }

    fn item(name: &str, weight: f64) -> BatchItem {
        BatchItem {
            name: name.to_string(),
            weight,
        }
    }

    #[tokio::test]
    async fn test_single_mode_does_not_touch_ledger() {
        let assistant = ScriptedAssistant::new().with_scale_reading(1236.0);
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());

        let outcome = recognize(&assistant, &mut ledger, &image(), ScannerMode::Single)
            .await
            .unwrap();

        assert_eq!(outcome, CaptureOutcome::Weight(1236.0));
        assert_eq!(outcome.message(), "Detected Weight: 1236g");
        assert_eq!(ledger.count().unwrap(), 0);
        assert_eq!(assistant.images_seen(), 1);
    }

    #[tokio::test]
    async fn test_batch_mode_adds_each_item() {
        let assistant = ScriptedAssistant::new()
            .with_batch_items(vec![item("Oud", 1236.0), item("Rose", 636.0)]);
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());

        let outcome = recognize(&assistant, &mut ledger, &image(), ScannerMode::Batch)
            .await
            .unwrap();

        assert_eq!(
            outcome.message(),
            "Successfully found 2 items in document. Added to pending batch."
        );
        assert_eq!(assistant.images_seen(), 1);
        let entries = ledger.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label(), "Rose");
        assert_eq!(entries[1].label(), "Oud");
    }

    #[tokio::test]
    async fn test_batch_mode_skips_rejected_items() {
        let assistant = ScriptedAssistant::new()
            .with_batch_items(vec![item("Empty", 0.0), item("Rose", 636.0)]);
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());

        let outcome = recognize(&assistant, &mut ledger, &image(), ScannerMode::Batch)
            .await
            .unwrap();

        match outcome {
            CaptureOutcome::Batch { found, added } => {
                assert_eq!(found, 2);
                assert_eq!(added.len(), 1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(ledger.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_document_message() {
        let assistant = ScriptedAssistant::new();
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());

        let outcome = recognize(&assistant, &mut ledger, &image(), ScannerMode::Batch)
            .await
            .unwrap();
        assert_eq!(outcome.message(), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_non_image_upload_is_rejected() {
        assert!(load_image_source("notes.txt").is_err());
        assert!(load_image_source("data:text/plain;base64,aGVsbG8=").is_err());
    }
}
