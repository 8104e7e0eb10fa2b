use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::PricingConfig;
use crate::service::calculate_price;

/// A priced bottle in the pending batch.
///
/// Net weight and price are derived from the gross weight when the entry is
/// created and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    id: String,
    created_at: DateTime<Utc>,
    label: String,
    gross_weight: f64,
    net_weight: f64,
    price: f64,
}

impl LedgerEntry {
    pub(crate) fn new(label: String, gross_weight: f64, pricing: &PricingConfig) -> Self {
        let valuation = calculate_price(gross_weight, pricing);
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            label,
            gross_weight,
            net_weight: valuation.net_weight,
            price: valuation.price,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Scale reading including the bottle (g)
    pub fn gross_weight(&self) -> f64 {
        self.gross_weight
    }

    /// Fragrance content after tare (g, treated as ml)
    pub fn net_weight(&self) -> f64 {
        self.net_weight
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}
