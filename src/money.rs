//! French number formatting for amounts, rates and quantities.
//!
//! Amounts are rendered with a comma decimal separator, a space between
//! thousand groups and a trailing euro sign, e.g. `1 234,56 €`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount in euros: two decimals, comma separator, space-grouped
/// thousands, trailing euro sign.
///
/// Midpoints round away from zero, as printed invoice amounts expect.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);

    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    format!("{}{},{} €", sign, group_thousands(int_part), frac_part)
}

/// Format a VAT rate with one decimal and a comma separator, e.g. `5,5`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.1}", rate.round_dp(1)).replace('.', ",")
}

/// Format a quantity: trailing zero decimals dropped, comma separator.
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string().replace('.', ",")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_eur_basic() {
        assert_eq!(format_eur(dec!(10)), "10,00 €");
        assert_eq!(format_eur(dec!(0.5)), "0,50 €");
    }

    #[test]
    fn test_format_eur_thousands_grouping() {
        assert_eq!(format_eur(dec!(1100)), "1 100,00 €");
        assert_eq!(format_eur(dec!(1234567.89)), "1 234 567,89 €");
    }

    #[test]
    fn test_format_eur_rounds_to_cents() {
        assert_eq!(format_eur(dec!(19.999)), "20,00 €");
        assert_eq!(format_eur(dec!(1.005)), "1,01 €");
    }

    #[test]
    fn test_format_eur_negative() {
        assert_eq!(format_eur(dec!(-1250.4)), "-1 250,40 €");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(dec!(20)), "20,0");
        assert_eq!(format_rate(dec!(5.5)), "5,5");
        assert_eq!(format_rate(dec!(0)), "0,0");
    }

    #[test]
    fn test_format_quantity_drops_trailing_zeros() {
        assert_eq!(format_quantity(dec!(1.00)), "1");
        assert_eq!(format_quantity(dec!(2.50)), "2,5");
        assert_eq!(format_quantity(dec!(0.33)), "0,33");
    }
}
