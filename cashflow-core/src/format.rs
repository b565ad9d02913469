//! Amount formatting for human-readable output.

use rust_decimal::{Decimal, RoundingStrategy};

/// Thousands-grouped with `dp` fraction digits: `1234.5` -> `1,234.50`.
pub fn format_grouped(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Two fraction digits, the form used for every money figure.
pub fn format_amount(value: Decimal) -> String {
    format_grouped(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123456, 2)), "1,234.56");
        assert_eq!(format_amount(Decimal::new(3755, 1)), "375.50");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(-1234567891, 3)), "-1,234,567.89");
        assert_eq!(format_amount(Decimal::new(100000000, 0)), "100,000,000.00");
    }

    #[test]
    fn test_negative_zero_after_rounding() {
        assert_eq!(format_amount(Decimal::new(-1, 3)), "0.00");
    }

    #[test]
    fn test_zero_fraction_digits() {
        assert_eq!(format_grouped(Decimal::new(12345, 1), 0), "1,234");
        assert_eq!(format_grouped(Decimal::new(12355, 1), 0), "1,236");
    }
}
