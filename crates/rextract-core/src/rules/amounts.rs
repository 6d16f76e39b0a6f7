//! Amount parsing for line-item and total fields.

use rust_decimal::Decimal;
use serde_json::Number;
use std::str::FromStr;
use tracing::warn;

use super::patterns::{CURRENCY_MARKER, DECIMAL_COMMA_AMOUNT, PLAIN_AMOUNT};

/// Convert a JSON number into a decimal without going through `f64`.
///
/// Numbers outside the decimal range (or with more than 28 fractional
/// digits) read as absent.
pub fn decimal_from_number(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }

    let text = n.to_string();
    let parsed = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok();

    if parsed.is_none() {
        warn!("Number {} is outside the supported amount range, reading it as absent", text);
    }

    parsed
}

/// Parse an amount written as text (e.g., "₹ 1,234.50", "21 USD" or "21,50").
///
/// Currency symbols and codes are dropped, thousands separators may use
/// western (1,234,567) or Indian (12,34,567) grouping, and a lone comma
/// followed by one or two digits is read as a decimal comma.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let stripped = CURRENCY_MARKER.replace_all(s, "");
    let cleaned: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if let Some(caps) = PLAIN_AMOUNT.captures(&cleaned) {
        let integer_part = caps[2].replace(',', "");
        match caps.get(3) {
            Some(fraction) => format!("{}{}.{}", &caps[1], integer_part, fraction.as_str()),
            None => format!("{}{}", &caps[1], integer_part),
        }
    } else if let Some(caps) = DECIMAL_COMMA_AMOUNT.captures(&cleaned) {
        format!("{}{}.{}", &caps[1], &caps[2], &caps[3])
    } else {
        return None;
    };

    Decimal::from_str(&normalized).ok()
}
