//! Interactive session state
//!
//! Everything the single page holds between user actions: the ledger, the
//! input buffers, the latest assistant response, the loading flag and the
//! camera warning. Actions run one at a time through `&mut self`, so a
//! later response simply replaces an earlier one.

use std::sync::Arc;

use scentvalue_domain::{
    calculate_price, resolve_weight, BatchLedger, LedgerEntry, LedgerStore, MemoryLedgerStore,
    Valuation, WeightError,
};
use scentvalue_infra::{capture_still, CameraConstraints, CameraDevice};
use scentvalue_types::{EncodedImage, Result, ScannerMode};
use scentvalue_vision::Assistant;
use serde::Serialize;
use tracing::{debug, warn};

use crate::capture::{
    load_image_source, recognize, CaptureOutcome, CAMERA_BLOCKED_MESSAGE, PROCESSING_ERROR_MESSAGE,
    SCANNING_MESSAGE,
};

/// Canned question behind the help button
pub const HELP_QUESTION: &str = "How do I use the batch feature to export multiple items to Excel?";

/// Suggested questions offered alongside the free-form prompt
pub const QUICK_QUESTIONS: [&str; 3] = [
    HELP_QUESTION,
    "What is the best way to store perfume oils to keep them fresh?",
    "How do I explain the per-gram pricing to a customer?",
];

/// Live preview of the weight input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preview {
    pub gross_weight: f64,
    pub valuation: Valuation,
}

impl Preview {
    /// Whether submitting now would create an entry
    pub fn is_submittable(&self) -> bool {
        self.gross_weight > 0.0
    }
}

pub struct Session<S: LedgerStore = MemoryLedgerStore> {
    ledger: BatchLedger<S>,
    assistant: Arc<dyn Assistant>,
    weight_input: String,
    label_input: String,
    response: Option<String>,
    loading: bool,
    camera_warning: Option<String>,
}

impl<S: LedgerStore> Session<S> {
    pub fn new(ledger: BatchLedger<S>, assistant: Arc<dyn Assistant>) -> Self {
        Self {
            ledger,
            assistant,
            weight_input: String::new(),
            label_input: String::new(),
            response: None,
            loading: false,
            camera_warning: None,
        }
    }

    pub fn ledger(&self) -> &BatchLedger<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BatchLedger<S> {
        &mut self.ledger
    }

    pub fn weight_input(&self) -> &str {
        &self.weight_input
    }

    pub fn set_weight_input(&mut self, input: impl Into<String>) {
        self.weight_input = input.into();
    }

    pub fn label_input(&self) -> &str {
        &self.label_input
    }

    pub fn set_label_input(&mut self, input: impl Into<String>) {
        self.label_input = input.into();
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn camera_warning(&self) -> Option<&str> {
        self.camera_warning.as_deref()
    }

    pub fn dismiss_camera_warning(&mut self) {
        self.camera_warning = None;
    }

    /// Resolved weight and valuation for whatever is typed right now
    pub fn preview(&self) -> std::result::Result<Preview, WeightError> {
        let gross_weight = resolve_weight(&self.weight_input)?;
        Ok(Preview {
            gross_weight,
            valuation: calculate_price(gross_weight, self.ledger.pricing()),
        })
    }

    /// Manual entry. Inputs are cleared only when an entry was created.
    pub fn submit(&mut self) -> Result<Option<LedgerEntry>> {
        let gross_weight = match resolve_weight(&self.weight_input) {
            Ok(w) => w,
            Err(e) => {
                debug!(input = %self.weight_input, error = %e, "weight input not submittable");
                return Ok(None);
            }
        };

        let entry = self.ledger.add_entry(gross_weight, Some(self.label_input.as_str()))?;
        if entry.is_some() {
            self.weight_input.clear();
            self.label_input.clear();
        }
        Ok(entry)
    }

    /// Ask the assistant a free-form question and keep its answer
    pub async fn ask(&mut self, query: &str) -> &str {
        self.loading = true;
        let answer = self.assistant.ask_text(query).await;
        self.loading = false;
        self.response.insert(answer).as_str()
    }

    /// Route a captured image through the assistant.
    ///
    /// A positive single-mode reading pre-fills the weight input for manual
    /// confirmation; batch mode adds the recognized items directly.
    pub async fn process_image(&mut self, image: &EncodedImage, mode: ScannerMode) -> Result<CaptureOutcome> {
        self.loading = true;
        self.response = Some(SCANNING_MESSAGE.to_string());

        let result = recognize(self.assistant.as_ref(), &mut self.ledger, image, mode).await;
        self.loading = false;

        match result {
            Ok(outcome) => {
                if let CaptureOutcome::Weight(grams) = outcome {
                    if grams > 0.0 {
                        self.weight_input = grams.to_string();
                    }
                }
                self.response = Some(outcome.message());
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "image processing failed");
                self.response = Some(PROCESSING_ERROR_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Take one still from the camera, release it, then process the still
    pub async fn scan_with_camera(
        &mut self,
        device: &dyn CameraDevice,
        constraints: &CameraConstraints,
        mode: ScannerMode,
    ) -> Result<CaptureOutcome> {
        self.camera_warning = None;
        let image = match capture_still(device, constraints) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "camera capture failed");
                self.camera_warning = Some(CAMERA_BLOCKED_MESSAGE.to_string());
                return Err(e);
            }
        };
        self.process_image(&image, mode).await
    }

    /// Process an uploaded file path or data URL
    pub async fn upload(&mut self, source: &str, mode: ScannerMode) -> Result<CaptureOutcome> {
        let image = load_image_source(source)?;
        self.process_image(&image, mode).await
    }
}
