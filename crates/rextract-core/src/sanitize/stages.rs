//! Individual text repair stages.

use crate::rules::patterns::{
    LINE_BREAK, SINGLE_QUOTED_KEY, SINGLE_QUOTED_VALUE, TRAILING_COMMA_BRACE,
    TRAILING_COMMA_BRACKET,
};

/// Return the span from the first `{` to the last `}`, inclusive.
///
/// Returns `None` when either brace is missing, or when the last `}` comes
/// before the first `{`.
pub fn object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;

    if end < start {
        return None;
    }

    Some(&raw[start..=end])
}

/// One text-to-text repair applied to an object span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    /// `'key':` becomes `"key":`.
    QuotedKeys,
    /// Any remaining `'value'` becomes `"value"`.
    QuotedValues,
    /// Drop a comma (and whitespace) directly before `}` or `]`.
    TrailingCommas,
    /// Remove `\r\n`, `\n` and `\r`.
    LineBreaks,
    /// Trim surrounding whitespace.
    Trim,
}

impl RepairStage {
    /// Every stage in application order.
    ///
    /// Keys are normalized before values so a quoted key is rewritten once.
    pub const ALL: [RepairStage; 5] = [
        RepairStage::QuotedKeys,
        RepairStage::QuotedValues,
        RepairStage::TrailingCommas,
        RepairStage::LineBreaks,
        RepairStage::Trim,
    ];

    /// Apply this stage to `text`.
    pub fn apply(self, text: &str) -> String {
        match self {
            RepairStage::QuotedKeys => SINGLE_QUOTED_KEY.replace_all(text, "\"$1\":").into_owned(),
            RepairStage::QuotedValues => SINGLE_QUOTED_VALUE.replace_all(text, "\"$1\"").into_owned(),
            RepairStage::TrailingCommas => {
                let text = TRAILING_COMMA_BRACE.replace_all(text, "}");
                TRAILING_COMMA_BRACKET.replace_all(&text, "]").into_owned()
            }
            RepairStage::LineBreaks => LINE_BREAK.replace_all(text, "").into_owned(),
            RepairStage::Trim => text.trim().to_string(),
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            RepairStage::QuotedKeys => "quoted_keys",
            RepairStage::QuotedValues => "quoted_values",
            RepairStage::TrailingCommas => "trailing_commas",
            RepairStage::LineBreaks => "line_breaks",
            RepairStage::Trim => "trim",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_span() {
        assert_eq!(object_span("Here you go: {\"a\": 1} Thanks!"), Some("{\"a\": 1}"));
        assert_eq!(object_span("{\"a\": {\"b\": 2}} trailing }"), Some("{\"a\": {\"b\": 2}} trailing }"));
        assert_eq!(object_span("no braces at all"), None);
        assert_eq!(object_span("only { opening"), None);
        assert_eq!(object_span("} reversed {"), None);
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(
            RepairStage::QuotedKeys.apply("{'invoice_number': 'INV1'}"),
            "{\"invoice_number\": 'INV1'}"
        );
    }

    #[test]
    fn test_quoted_values() {
        assert_eq!(
            RepairStage::QuotedValues.apply("{\"customer\": 'Acme', \"date\": '2024-01-05'}"),
            "{\"customer\": \"Acme\", \"date\": \"2024-01-05\"}"
        );
    }

    #[test]
    fn test_keys_then_values_do_not_double_quote() {
        let once = RepairStage::QuotedKeys.apply("{'name': 'Widget'}");
        let twice = RepairStage::QuotedValues.apply(&once);
        assert_eq!(twice, "{\"name\": \"Widget\"}");
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(
            RepairStage::TrailingCommas.apply("{\"items\": [1, 2, ], \"a\": 1,\n}"),
            "{\"items\": [1, 2], \"a\": 1}"
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(RepairStage::LineBreaks.apply("{\r\n\"a\":\n1\r}"), "{\"a\":1}");
    }

    #[test]
    fn test_trim() {
        assert_eq!(RepairStage::Trim.apply("  {}\t "), "{}");
    }
}
