//! Deterministic assistant with canned answers, for tests and offline demos

use std::sync::Mutex;

use async_trait::async_trait;
use scentvalue_types::{BatchItem, EncodedImage};

use crate::assistant::Assistant;

/// Returns the same configured answers on every call and records the
/// questions it was asked.
#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    answer: String,
    scale_reading: f64,
    batch_items: Vec<BatchItem>,
    questions: Mutex<Vec<String>>,
    images_seen: Mutex<usize>,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = answer.into();
        self
    }

    pub fn with_scale_reading(mut self, grams: f64) -> Self {
        self.scale_reading = grams;
        self
    }

    pub fn with_batch_items(mut self, items: Vec<BatchItem>) -> Self {
        self.batch_items = items;
        self
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn images_seen(&self) -> usize {
        self.images_seen.lock().map(|n| *n).unwrap_or_default()
    }

    fn record_image(&self) {
        if let Ok(mut n) = self.images_seen.lock() {
            *n += 1;
        }
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn ask_text(&self, query: &str) -> String {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(query.to_string());
        }
        self.answer.clone()
    }

    async fn read_scale_image(&self, _image: &EncodedImage) -> f64 {
        self.record_image();
        self.scale_reading
    }

    async fn read_batch_document(&self, _image: &EncodedImage) -> Vec<BatchItem> {
        self.record_image();
        self.batch_items.clone()
    }
}
