//! Repair of generative-service answers into a single JSON object literal.

mod stages;

pub use stages::{object_span, RepairStage};

use tracing::{debug, trace};

use crate::models::config::SanitizerConfig;

/// Text returned when no object span can be recovered.
pub const EMPTY_OBJECT: &str = "{}";

/// Ordered, best-effort repair of "JSON-like" answers.
#[derive(Debug, Clone)]
pub struct ResponseSanitizer {
    /// Whether to normalize single quotes.
    normalize_quotes: bool,
    /// Whether to remove trailing commas.
    strip_trailing_commas: bool,
    /// Whether to remove line breaks.
    strip_line_breaks: bool,
}

impl ResponseSanitizer {
    /// Create a sanitizer with every stage enabled.
    pub fn new() -> Self {
        Self {
            normalize_quotes: true,
            strip_trailing_commas: true,
            strip_line_breaks: true,
        }
    }

    /// Create a sanitizer from configuration.
    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self::new()
            .with_quote_normalization(config.normalize_quotes)
            .with_trailing_comma_removal(config.strip_trailing_commas)
            .with_line_break_removal(config.strip_line_breaks)
    }

    /// Set quote normalization.
    pub fn with_quote_normalization(mut self, enabled: bool) -> Self {
        self.normalize_quotes = enabled;
        self
    }

    /// Set trailing comma removal.
    pub fn with_trailing_comma_removal(mut self, enabled: bool) -> Self {
        self.strip_trailing_commas = enabled;
        self
    }

    /// Set line break removal.
    pub fn with_line_break_removal(mut self, enabled: bool) -> Self {
        self.strip_line_breaks = enabled;
        self
    }

    /// The stages this sanitizer runs, in order.
    pub fn stages(&self) -> Vec<RepairStage> {
        RepairStage::ALL
            .into_iter()
            .filter(|stage| match stage {
                RepairStage::QuotedKeys | RepairStage::QuotedValues => self.normalize_quotes,
                RepairStage::TrailingCommas => self.strip_trailing_commas,
                RepairStage::LineBreaks => self.strip_line_breaks,
                RepairStage::Trim => true,
            })
            .collect()
    }

    /// Repair `raw` into object text. Returns [`EMPTY_OBJECT`] when no
    /// `{...}` span exists.
    pub fn sanitize(&self, raw: &str) -> String {
        let Some(span) = object_span(raw) else {
            debug!("No object span in {} characters of response", raw.len());
            return EMPTY_OBJECT.to_string();
        };

        debug!(
            "Object span is {} of {} characters",
            span.len(),
            raw.len()
        );

        self.stages().into_iter().fold(span.to_string(), |text, stage| {
            let repaired = stage.apply(&text);
            trace!("{}: {} -> {} characters", stage.name(), text.len(), repaired.len());
            repaired
        })
    }
}

impl Default for ResponseSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Repair `raw` with every stage enabled.
pub fn sanitize(raw: &str) -> String {
    ResponseSanitizer::new().sanitize(raw)
}
