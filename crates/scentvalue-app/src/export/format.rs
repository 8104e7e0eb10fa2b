//! Number formatting for human-facing exports

/// en-US display form: thousands grouped with commas, at most three
/// fraction digits, trailing zeros dropped (`115000` -> `115,000`).
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Net weight with exactly two decimals
pub fn format_net(net_weight: f64) -> String {
    format!("{:.2}", net_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(115_000.0), "115,000");
        assert_eq!(format_grouped(253_000.0), "253,000");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
    }

    #[test]
    fn test_fraction_digits_are_capped_at_three() {
        assert_eq!(format_grouped(1136.5), "1,136.5");
        assert_eq!(format_grouped(2.25), "2.25");
        assert_eq!(format_grouped(0.1234), "0.123");
        assert_eq!(format_grouped(1.0004), "1");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_grouped(-1500.0), "-1,500");
        assert_eq!(format_grouped(-0.0001), "0");
    }

    #[test]
    fn test_net_has_two_decimals() {
        assert_eq!(format_net(500.0), "500.00");
        assert_eq!(format_net(0.0), "0.00");
        assert_eq!(format_net(1100.126), "1100.13");
    }
}
