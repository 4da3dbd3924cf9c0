//! Custom Askama template filters for the admin panel.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal amount as a dollar price string.
///
/// Usage in templates: `{{ order.total|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    use yarnhaven_core::{CurrencyCode, Price};

    let raw = value.to_string();
    Ok(raw.parse::<rust_decimal::Decimal>().map_or_else(
        |_| format!("${raw}"),
        |amount| Price::new(amount, CurrencyCode::USD).display(),
    ))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
