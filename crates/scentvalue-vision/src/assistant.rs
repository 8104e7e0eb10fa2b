//! Fragrance assistant capabilities
//!
//! Each operation is independently fallible inside and never fails outward:
//! network, auth and parse problems are logged and turned into a fixed
//! fallback so the caller's ledger and session state stay untouched.

use async_trait::async_trait;
use scentvalue_domain::PricingConfig;
use scentvalue_types::{BatchItem, EncodedImage, Result};
use tracing::{debug, warn};

use crate::ai::gemini::{GeminiClient, GenerateContentRequest, Part, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ai::prompts::{
    batch_response_schema, build_batch_document_prompt, build_scale_reading_prompt,
    build_system_instruction,
};
use crate::{parse_batch_items, parse_scale_reading};

/// Answer returned when the assistant cannot be reached
pub const ASK_FAILURE_MESSAGE: &str = "Error: Could not connect to the fragrance assistant.";
/// Answer returned when the model replies with no text
pub const ASK_EMPTY_MESSAGE: &str = "I'm sorry, I couldn't process that request.";

/// The three things the rest of the application asks of an AI service
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Free-form question; always returns displayable text
    async fn ask_text(&self, query: &str) -> String;

    /// Gross weight in grams read off a scale photo, 0 when unreadable
    async fn read_scale_image(&self, image: &EncodedImage) -> f64;

    /// Named weights read off a batch document photo, empty when unreadable
    async fn read_batch_document(&self, image: &EncodedImage) -> Vec<BatchItem>;
}

/// Assistant service configuration
#[derive(Debug, Clone, Default)]
pub struct AssistantConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl AssistantConfig {
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Network-backed assistant using the Gemini API
pub struct GeminiAssistant {
    client: GeminiClient,
    pricing: PricingConfig,
}

impl GeminiAssistant {
    pub fn new(config: &AssistantConfig, pricing: PricingConfig) -> Self {
        let client = GeminiClient::new(
            config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            config.api_key.clone(),
        );
        Self { client, pricing }
    }

    async fn try_ask(&self, query: &str) -> Result<String> {
        let request = build_question_request(query, &self.pricing);
        self.client.generate(&request).await
    }

    async fn try_read_scale(&self, image: &EncodedImage) -> Result<String> {
        self.client.generate(&build_scale_request(image)).await
    }

    async fn try_read_batch(&self, image: &EncodedImage) -> Result<String> {
        self.client.generate(&build_batch_request(image)).await
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn ask_text(&self, query: &str) -> String {
        match self.try_ask(query).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => ASK_EMPTY_MESSAGE.to_string(),
            Err(e) => {
                warn!(error = %e, model = self.client.model(), "assistant question failed");
                ASK_FAILURE_MESSAGE.to_string()
            }
        }
    }

    async fn read_scale_image(&self, image: &EncodedImage) -> f64 {
        match self.try_read_scale(image).await {
            Ok(text) => {
                let grams = parse_scale_reading(&text);
                debug!(answer = %text.trim(), grams, "scale reading");
                grams
            }
            Err(e) => {
                warn!(error = %e, "scale reading failed");
                0.0
            }
        }
    }

    async fn read_batch_document(&self, image: &EncodedImage) -> Vec<BatchItem> {
        match self.try_read_batch(image).await {
            Ok(text) => parse_batch_items(&text),
            Err(e) => {
                warn!(error = %e, "batch document reading failed");
                Vec::new()
            }
        }
    }
}

pub fn build_question_request(query: &str, pricing: &PricingConfig) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![Part::text(query)])
        .with_system_instruction(build_system_instruction(pricing))
}

pub fn build_scale_request(image: &EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![Part::image(image), Part::text(build_scale_reading_prompt())])
}

pub fn build_batch_request(image: &EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest::user(vec![Part::image(image), Part::text(build_batch_document_prompt())])
        .with_json_schema(batch_response_schema())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_assistant() -> GeminiAssistant {
        // no key: every call fails before touching the network
        GeminiAssistant::new(&AssistantConfig::default(), PricingConfig::default())
    }

    #[tokio::test]
    async fn test_ask_falls_back_to_apology() {
        let answer = offline_assistant().ask_text("How much is 50ml?").await;
        assert_eq!(answer, ASK_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_scale_reading_falls_back_to_zero() {
        let image = EncodedImage::jpeg("AAAA".to_string());
        assert_eq!(offline_assistant().read_scale_image(&image).await, 0.0);
    }

    #[tokio::test]
    async fn test_batch_reading_falls_back_to_empty() {
        let image = EncodedImage::jpeg("AAAA".to_string());
        assert!(offline_assistant().read_batch_document(&image).await.is_empty());
    }

    #[test]
    fn test_batch_request_is_schema_constrained() {
        let image = EncodedImage::jpeg("AAAA".to_string());
        let request = build_batch_request(&image);
        let config = request.generation_config.expect("schema config");
        assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
        assert!(request.system_instruction.is_none());
        assert!(request.contents[0].parts[0].inline_data.is_some());
    }

    #[test]
    fn test_question_request_has_system_instruction() {
        let request = build_question_request("density of oud?", &PricingConfig::default());
        assert!(request.system_instruction.is_some());
        assert!(request.generation_config.is_none());
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("density of oud?"));
    }
}
