//! Pricing constants

use serde::{Deserialize, Serialize};

/// Weight of an empty bottle deducted from every reading (g)
pub const DEFAULT_TARE_GRAMS: f64 = 136.0;
/// Monetary units charged per net gram
pub const DEFAULT_RATE_PER_GRAM: f64 = 230.0;
pub const DEFAULT_CURRENCY: &str = "TSh";

/// Process-wide pricing parameters, fixed once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub tare_grams: f64,
    pub rate_per_gram: f64,
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tare_grams: DEFAULT_TARE_GRAMS,
            rate_per_gram: DEFAULT_RATE_PER_GRAM,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}
