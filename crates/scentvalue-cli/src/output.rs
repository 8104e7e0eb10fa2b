//! Output formatting module

use scentvalue_app::capture::CaptureOutcome;
use scentvalue_app::export::{format_grouped, format_net};
use scentvalue_app::session::Preview;
use scentvalue_domain::{LedgerEntry, PricingConfig, WeightError};
use scentvalue_types::{OutputFormat, Result};
use serde_json::json;

pub fn output_resolution(
    output_format: OutputFormat,
    expression: &str,
    preview: &std::result::Result<Preview, WeightError>,
    pricing: &PricingConfig,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = match preview {
            Ok(p) => json!({
                "expression": expression,
                "valid": true,
                "grossWeight": p.gross_weight,
                "netWeight": p.valuation.net_weight,
                "price": p.valuation.price,
                "currency": pricing.currency,
            }),
            Err(e) => json!({
                "expression": expression,
                "valid": false,
                "error": e.to_string(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match preview {
        Ok(p) => {
            println!("Gross weight:  {}g", format_grouped(p.gross_weight));
            println!("Net content:   {}ml", format_net(p.valuation.net_weight));
            println!("Price:         {} {}", format_grouped(p.valuation.price), pricing.currency);
            if !p.is_submittable() {
                println!("(not addable: weight must be greater than zero)");
            }
        }
        Err(e) => println!("Invalid weight: {}", e),
    }
    Ok(())
}

pub fn output_entry(output_format: OutputFormat, entry: &LedgerEntry, pricing: &PricingConfig) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!(
            "Added {}: {}g gross, {}ml net, {} {}",
            entry.label(),
            format_grouped(entry.gross_weight()),
            format_net(entry.net_weight()),
            format_grouped(entry.price()),
            pricing.currency
        );
    }
    Ok(())
}

pub fn output_ledger(output_format: OutputFormat, entries: &[LedgerEntry], pricing: &PricingConfig) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Pending batch is empty.");
        return Ok(());
    }

    let title = format!("Pending Batch ({} items)", entries.len());
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));
    println!(
        "{:>4}  {:<30} {:>12} {:>12} {:>18}",
        "#", "Fragrance Name", "Gross (g)", "Net (ml)", "Total Price"
    );
    let count = entries.len();
    for (idx, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {:<30} {:>12} {:>12} {:>18}",
            format!("{}.", count - idx),
            truncate(entry.label(), 30),
            format_grouped(entry.gross_weight()),
            format_net(entry.net_weight()),
            format!("{} {}", format_grouped(entry.price()), pricing.currency)
        );
    }
    let total: f64 = entries.iter().map(LedgerEntry::price).sum();
    println!("\nTotal Batch Value: {} {}", format_grouped(total), pricing.currency);
    Ok(())
}

pub fn output_total(output_format: OutputFormat, count: usize, total: f64, pricing: &PricingConfig) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = json!({ "count": count, "total": total, "currency": pricing.currency });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Items:             {}", count);
        println!("Total Batch Value: {} {}", format_grouped(total), pricing.currency);
    }
    Ok(())
}

pub fn output_capture(output_format: OutputFormat, outcome: &CaptureOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        let value = match outcome {
            CaptureOutcome::Weight(grams) => json!({
                "mode": "single",
                "weight": grams,
                "message": outcome.message(),
            }),
            CaptureOutcome::Batch { found, added } => json!({
                "mode": "batch",
                "found": found,
                "added": added,
                "message": outcome.message(),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", outcome.message());
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Oud", 30), "Oud");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
