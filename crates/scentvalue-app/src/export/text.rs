//! Plain-text summaries for the clipboard

use scentvalue_domain::{LedgerEntry, PricingConfig};

use super::format::format_grouped;

/// `"{label} | Gross: {gross}g | Total: {price} {currency}"`
pub fn item_summary(entry: &LedgerEntry, pricing: &PricingConfig) -> String {
    format!(
        "{} | Gross: {}g | Total: {} {}",
        entry.label(),
        entry.gross_weight(),
        format_grouped(entry.price()),
        pricing.currency
    )
}

/// Numbered list, newest entry carrying the highest number, then the total
pub fn batch_summary(entries: &[LedgerEntry], pricing: &PricingConfig) -> String {
    let count = entries.len();
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            format!(
                "{}. {} - {} {}",
                count - idx,
                entry.label(),
                format_grouped(entry.price()),
                pricing.currency
            )
        })
        .collect();

    let total: f64 = entries.iter().map(LedgerEntry::price).sum();
    format!(
        "{}\n\nTotal Batch Value: {} {}",
        lines.join("\n"),
        format_grouped(total),
        pricing.currency
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentvalue_domain::BatchLedger;

    #[test]
    fn test_item_summary() {
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());
        let entry = ledger.add_entry(1236.0, Some("Oud Wood")).unwrap().unwrap();
        assert_eq!(
            item_summary(&entry, ledger.pricing()),
            "Oud Wood | Gross: 1236g | Total: 253,000 TSh"
        );
    }

    #[test]
    fn test_batch_summary_numbers_newest_highest() {
        let mut ledger = BatchLedger::in_memory(PricingConfig::default());
        ledger.add_entry(636.0, Some("A")).unwrap();
        ledger.add_entry(1236.0, Some("B")).unwrap();

        let text = batch_summary(&ledger.entries().unwrap(), ledger.pricing());
        assert_eq!(
            text,
            "2. B - 253,000 TSh\n1. A - 115,000 TSh\n\nTotal Batch Value: 368,000 TSh"
        );
    }
}
