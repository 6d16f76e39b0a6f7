//! Common regex patterns for repairing generative-service answers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Quoting
    pub static ref SINGLE_QUOTED_KEY: Regex = Regex::new(
        r"'([^']+)':"
    ).unwrap();

    pub static ref SINGLE_QUOTED_VALUE: Regex = Regex::new(
        r"'([^']+)'"
    ).unwrap();

    // Trailing commas (closing brace pass runs before closing bracket pass)
    pub static ref TRAILING_COMMA_BRACE: Regex = Regex::new(
        r",\s*\}"
    ).unwrap();

    pub static ref TRAILING_COMMA_BRACKET: Regex = Regex::new(
        r",\s*\]"
    ).unwrap();

    pub static ref LINE_BREAK: Regex = Regex::new(
        r"\r\n|\n|\r"
    ).unwrap();

    // Amounts written as text ("₹ 1,234.50", "21 USD", "Rs. 40")
    pub static ref CURRENCY_MARKER: Regex = Regex::new(
        r"(?i)(?:rs\.?|inr|usd|eur|gbp|aud|cad|[$€£₹¥])"
    ).unwrap();

    pub static ref PLAIN_AMOUNT: Regex = Regex::new(
        r"^(-?)(\d{1,3}(?:,\d{3})+|\d{1,2}(?:,\d{2})+,\d{3}|\d+)(?:\.(\d+))?$"
    ).unwrap();

    pub static ref DECIMAL_COMMA_AMOUNT: Regex = Regex::new(
        r"^(-?)(\d+),(\d{1,2})$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quoted_key_requires_colon() {
        assert!(SINGLE_QUOTED_KEY.is_match("'name': 1"));
        assert!(!SINGLE_QUOTED_KEY.is_match("'name' , 1"));
    }

    #[test]
    fn test_plain_amount_grouping() {
        assert!(PLAIN_AMOUNT.is_match("1,234.50"));
        assert!(PLAIN_AMOUNT.is_match("1,23,456.00"));
        assert!(PLAIN_AMOUNT.is_match("1234"));
        assert!(PLAIN_AMOUNT.is_match("1,234,567"));
        assert!(!PLAIN_AMOUNT.is_match("21,50"));
        assert!(!PLAIN_AMOUNT.is_match("12,3"));
        assert!(!PLAIN_AMOUNT.is_match("abc"));
    }
}
