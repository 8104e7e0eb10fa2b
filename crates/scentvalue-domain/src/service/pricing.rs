//! Price calculation from a gross scale reading

use serde::Serialize;

use crate::model::PricingConfig;

/// Net content and price for one gross reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub net_weight: f64,
    pub price: f64,
}

/// net = max(0, gross - tare), price = net x rate
///
/// No rounding happens here; presentation decides precision.
pub fn calculate_price(gross_weight: f64, pricing: &PricingConfig) -> Valuation {
    let net_weight = (gross_weight - pricing.tare_grams).max(0.0);
    Valuation {
        net_weight,
        price: net_weight * pricing.rate_per_gram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pricing() -> PricingConfig {
        PricingConfig::default()
    }

    #[test]
    fn test_net_weight_subtracts_tare() {
        let v = calculate_price(636.0, &default_pricing());
        assert!((v.net_weight - 500.0).abs() < 1e-9);
        assert!((v.price - 115_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_lab_notation_scenario() {
        // 1kg236 resolves to 1236g
        let v = calculate_price(1236.0, &default_pricing());
        assert!((v.net_weight - 1100.0).abs() < 1e-9);
        assert!((v.price - 253_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_reading_at_or_below_tare_is_free() {
        for gross in [136.0, 100.0, 1.0, 0.0] {
            let v = calculate_price(gross, &default_pricing());
            assert_eq!(v.net_weight, 0.0, "gross {gross}");
            assert_eq!(v.price, 0.0, "gross {gross}");
        }
    }

    #[test]
    fn test_fractional_weights_are_not_rounded() {
        let v = calculate_price(136.25, &default_pricing());
        assert!((v.net_weight - 0.25).abs() < 1e-9);
        assert!((v.price - 57.5).abs() < 1e-9);
    }

    #[test]
    fn test_custom_pricing() {
        let pricing = PricingConfig {
            tare_grams: 100.0,
            rate_per_gram: 10.0,
            currency: "USD".to_string(),
        };
        let v = calculate_price(350.0, &pricing);
        assert!((v.net_weight - 250.0).abs() < 1e-9);
        assert!((v.price - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_across_range() {
        let pricing = default_pricing();
        for gross in (137..3000).step_by(97) {
            let gross = gross as f64;
            let v = calculate_price(gross, &pricing);
            assert!((v.net_weight - (gross - 136.0)).abs() < 1e-9);
            assert!((v.price - (gross - 136.0) * 230.0).abs() < 1e-6);
        }
    }
}
