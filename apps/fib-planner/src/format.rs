//! Display formatting for plan values.
//!
//! Currency renders en-US style (`-$1,234.50`); plain numbers render fixed
//! point without grouping. Midpoints round away from zero. Values that cannot
//! be represented (NaN, infinities, out-of-range floats) render as the
//! placeholders [`CURRENCY_PLACEHOLDER`] and [`NUMBER_PLACEHOLDER`].

use rust_decimal::prelude::*;

/// Rendered for non-finite currency values.
pub const CURRENCY_PLACEHOLDER: &str = "$0.00";

/// Rendered for non-finite plain numbers, whatever the requested precision.
pub const NUMBER_PLACEHOLDER: &str = "0.00";

/// Format as US dollars with two decimals and thousands separators.
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let rounded = round(value, 2);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format with exactly `decimals` fractional digits.
#[must_use]
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = round(value, decimals);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", decimals as usize, rounded)
}

/// [`format_currency`] for floats; non-finite values render the placeholder.
#[must_use]
pub fn format_currency_f64(value: f64) -> String {
    Decimal::from_f64(value).map_or_else(|| CURRENCY_PLACEHOLDER.to_string(), format_currency)
}

/// [`format_number`] for floats; non-finite values render the placeholder.
#[must_use]
pub fn format_number_f64(value: f64, decimals: u32) -> String {
    Decimal::from_f64(value).map_or_else(
        || NUMBER_PLACEHOLDER.to_string(),
        |d| format_number(d, decimals),
    )
}

/// Risk/reward ratio as `N.NN:1`.
#[must_use]
pub fn format_ratio(value: Decimal) -> String {
    format!("{}:1", format_number(value, 2))
}

/// Percentage with one decimal, e.g. `33.3%`.
#[must_use]
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_number(value, 1))
}

fn round(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(dec!(0), "$0.00")]
    #[test_case(dec!(200), "$200.00")]
    #[test_case(dec!(1234.5), "$1,234.50")]
    #[test_case(dec!(14246.275), "$14,246.28"; "midpoint rounds up")]
    #[test_case(dec!(1000000), "$1,000,000.00")]
    #[test_case(dec!(-200.004), "-$200.00")]
    #[test_case(dec!(-0.001), "$0.00"; "negative rounding to zero")]
    #[test_case(dec!(999.995), "$1,000.00"; "carry into grouping")]
    fn test_format_currency(value: Decimal, expected: &str) {
        assert_eq!(format_currency(value), expected);
    }

    #[test_case(dec!(160.2656266), 2, "160.27")]
    #[test_case(dec!(89.11), 4, "89.1100")]
    #[test_case(dec!(1234567.891), 2, "1234567.89"; "no grouping")]
    #[test_case(dec!(2.5), 0, "3")]
    #[test_case(dec!(-0.0001), 2, "0.00")]
    fn test_format_number(value: Decimal, decimals: u32, expected: &str) {
        assert_eq!(format_number(value, decimals), expected);
    }

    #[test]
    fn test_non_finite_placeholders() {
        assert_eq!(format_currency_f64(f64::NAN), "$0.00");
        assert_eq!(format_currency_f64(f64::INFINITY), "$0.00");
        assert_eq!(format_number_f64(f64::NEG_INFINITY, 4), "0.00");
        assert_eq!(format_number_f64(f64::NAN, 2), "0.00");
    }

    #[test]
    fn test_finite_floats_format_normally() {
        assert_eq!(format_currency_f64(1234.5), "$1,234.50");
        assert_eq!(format_number_f64(2.738, 2), "2.74");
    }

    #[test]
    fn test_ratio_and_percent() {
        assert_eq!(format_ratio(dec!(2.7383)), "2.74:1");
        assert_eq!(format_percent(dec!(33.3333)), "33.3%");
    }
}
