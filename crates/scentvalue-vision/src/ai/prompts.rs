//! Prompts for the fragrance assistant
//!
//! The text assistant gets a system instruction carrying the live pricing
//! parameters. Image prompts ask for grams only; the batch prompt is paired
//! with a response schema so the model returns a bare JSON array.

use scentvalue_domain::PricingConfig;
use serde_json::{json, Value};

/// System instruction for free-form questions
pub fn build_system_instruction(pricing: &PricingConfig) -> String {
    format!(
        "You are an expert perfume consultant and pricing assistant for a fragrance reseller.\n\
         The reseller's calculator works with these parameters:\n\
         - Gross weight deduction: {tare}g (standard empty bottle weight).\n\
         - Price per net gram/ml: {rate} {currency}.\n\
         Give brief, helpful answers about perfume measurements, densities and pricing logic in Tanzania.\n\
         Keep responses concise and elegant.",
        tare = pricing.tare_grams,
        rate = pricing.rate_per_gram,
        currency = pricing.currency,
    )
}

/// Instruction sent with a photo of a scale display
pub fn build_scale_reading_prompt() -> String {
    "Read the weight shown on this scale display. Answer with the numeric value in grams only. \
     If the display shows kilograms such as '1.234 kg', answer '1234'. \
     If no scale display is visible, answer '0'."
        .to_string()
}

/// Instruction sent with a photo of a handwritten or printed batch list
pub fn build_batch_document_prompt() -> String {
    "Extract every item listed in this document. Each item usually has a perfume name and a weight. \
     Pay close attention to lab notation such as '1kg136', which means 1136 grams. \
     Return a JSON array of objects with 'name' and 'weight' (weight in grams), for example \
     [{\"name\": \"Sauvage Dior\", \"weight\": 1050}, {\"name\": \"Bleu de Chanel\", \"weight\": 1136}]. \
     If an item has no readable name, use 'Item #'. If no weights are found, return []."
        .to_string()
}

/// Response schema constraining batch output to `[{name, weight}]`
pub fn batch_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "weight": { "type": "NUMBER" }
            },
            "required": ["name", "weight"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_carries_pricing() {
        let instruction = build_system_instruction(&PricingConfig::default());
        assert!(instruction.contains("136g"));
        assert!(instruction.contains("230 TSh"));
    }

    #[test]
    fn test_system_instruction_follows_config() {
        let pricing = PricingConfig {
            tare_grams: 150.0,
            rate_per_gram: 250.5,
            currency: "KES".to_string(),
        };
        let instruction = build_system_instruction(&pricing);
        assert!(instruction.contains("150g"));
        assert!(instruction.contains("250.5 KES"));
    }

    #[test]
    fn test_batch_schema_requires_both_fields() {
        let schema = batch_response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"], json!(["name", "weight"]));
    }
}
