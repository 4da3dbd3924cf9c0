//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal amount as a dollar price string.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Format a decimal string as a two-decimal dollar amount.
fn format_money(raw: &str) -> String {
    use yarnhaven_core::{CurrencyCode, Price};

    raw.parse::<rust_decimal::Decimal>().map_or_else(
        |_| format!("${raw}"),
        |amount| Price::new(amount, CurrencyCode::USD).display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_pads_decimals() {
        assert_eq!(format_money("12.5"), "$12.50");
        assert_eq!(format_money("0"), "$0.00");
        assert_eq!(format_money("3"), "$3.00");
    }

    #[test]
    fn test_format_money_passes_through_non_numeric() {
        assert_eq!(format_money("n/a"), "$n/a");
    }
}
