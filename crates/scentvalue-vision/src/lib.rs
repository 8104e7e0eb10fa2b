//! Vision module - AI assistant for fragrance questions and image reading

pub mod ai;
pub mod assistant;
pub mod scripted;

pub use ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use assistant::{
    Assistant, AssistantConfig, GeminiAssistant, ASK_EMPTY_MESSAGE, ASK_FAILURE_MESSAGE,
};
pub use scripted::ScriptedAssistant;

use regex::Regex;
use scentvalue_types::BatchItem;
use std::sync::LazyLock;
use tracing::warn;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("number pattern"));

/// First number in the model's answer, in grams; 0 when there is none
pub fn parse_scale_reading(answer: &str) -> f64 {
    FIRST_NUMBER
        .find(answer)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Batch items from a JSON answer; malformed output yields an empty list
pub fn parse_batch_items(answer: &str) -> Vec<BatchItem> {
    let json_str = extract_json_from_response(answer);
    match serde_json::from_str::<Vec<BatchItem>>(&json_str) {
        Ok(items) => items,
        Err(e) => {
            let truncated: String = answer.chars().take(200).collect();
            warn!(error = %e, raw = %truncated, "batch answer is not a list of items");
            Vec::new()
        }
    }
}

/// Extract JSON from response (handles markdown code blocks)
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(3);
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    let open = response.find(['[', '{']);
    let close = response.rfind([']', '}']);
    if let (Some(start), Some(end)) = (open, close) {
        if start < end {
            return response[start..=end].to_string();
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_markdown() {
        let response = "```json\n[{\"name\": \"A\", \"weight\": 1}]\n```";
        assert_eq!(
            extract_json_from_response(response),
            "[{\"name\": \"A\", \"weight\": 1}]"
        );
    }

    #[test]
    fn test_extract_json_plain() {
        let response = "{\"test\": 123}";
        assert_eq!(extract_json_from_response(response), "{\"test\": 123}");
    }

    #[test]
    fn test_extract_json_with_text() {
        let response = "Here is the list: [] done";
        assert_eq!(extract_json_from_response(response), "[]");
    }

    #[test]
    fn test_scale_reading_takes_first_number() {
        assert_eq!(parse_scale_reading("1234"), 1234.0);
        assert_eq!(parse_scale_reading("The scale shows 1136.5 g"), 1136.5);
        assert_eq!(parse_scale_reading("about 950g, maybe 960g"), 950.0);
    }

    #[test]
    fn test_scale_reading_without_number_is_zero() {
        assert_eq!(parse_scale_reading("No scale visible"), 0.0);
        assert_eq!(parse_scale_reading(""), 0.0);
    }

    #[test]
    fn test_batch_items_parse() {
        let items = parse_batch_items(
            r#"[{"name": "Sauvage Dior", "weight": 1050}, {"name": "Bleu de Chanel", "weight": 1136}]"#,
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "Bleu de Chanel");
        assert_eq!(items[1].weight, 1136.0);
    }

    #[test]
    fn test_batch_items_malformed_is_empty() {
        assert!(parse_batch_items("I could not read this document").is_empty());
        assert!(parse_batch_items(r#"[{"name": "A"}]"#).is_empty());
        assert!(parse_batch_items(r#"{"name": "A", "weight": 5}"#).is_empty());
    }
}
