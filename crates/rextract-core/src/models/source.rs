//! Typed view of the document object returned by the generative service.
//!
//! Every field is optional. Values are read once from the parsed JSON by a
//! [`FieldReader`], and defaults for missing fields are applied only through
//! the accessor methods on [`SourceDocument`] and [`LineItem`].

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ProjectionError;
use crate::rules::amounts::{decimal_from_number, parse_amount};

/// Placeholder for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing customer name.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

/// A receipt or invoice as described by the generative service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// Invoice number/identifier. Present whenever `invoice_number` is
    /// truthy; numbers, objects and arrays keep their compact JSON text.
    pub invoice_number: Option<String>,

    /// Invoice date, kept as written.
    pub invoice_date: Option<String>,

    /// `total.amount`.
    pub total_amount: Option<Decimal>,

    /// Customer block. Present whenever `customer` is truthy, even if it
    /// carries no name.
    pub customer: Option<CustomerRef>,

    /// Line items. Present whenever `items` is truthy, even if empty.
    pub items: Option<Vec<LineItem>>,
}

/// The customer block of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerRef {
    /// Customer name.
    pub name: Option<String>,
}

/// A single line item on the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItem {
    /// Product/service description.
    pub description: Option<String>,

    /// Quantity.
    pub quantity: Option<Decimal>,

    /// Unit price.
    pub rate: Option<Decimal>,

    /// Tax amount for this line.
    pub gst: Option<Decimal>,

    /// Line total including tax.
    pub amount: Option<Decimal>,
}

impl SourceDocument {
    /// Build a document from a parsed JSON value.
    ///
    /// Fails only where the value cannot be walked at all: a `null` document,
    /// a truthy `items` that is not an array, or a `null` line item.
    pub fn from_value(value: &Value, reader: &FieldReader) -> Result<Self, ProjectionError> {
        if value.is_null() {
            return Err(ProjectionError::NullDocument);
        }

        let customer = value
            .get("customer")
            .filter(|c| is_truthy(c))
            .map(|c| CustomerRef {
                name: c.get("name").and_then(|n| reader.text(n)),
            });

        let items = match value.get("items").filter(|i| is_truthy(i)) {
            None => None,
            Some(Value::Array(entries)) => Some(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| LineItem::from_value(entry, index, reader))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(other) => return Err(ProjectionError::ItemsNotSequence(kind_of(other))),
        };

        Ok(Self {
            invoice_number: value.get("invoice_number").and_then(|v| reader.label(v)),
            invoice_date: value.get("invoice_date").and_then(|v| reader.text(v)),
            total_amount: value
                .get("total")
                .and_then(|t| t.get("amount"))
                .and_then(|a| reader.number(a)),
            customer,
            items,
        })
    }

    /// Invoice number, or "N/A".
    pub fn serial(&self) -> String {
        self.invoice_number.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Customer name, or "Unknown".
    pub fn customer_name(&self) -> String {
        self.customer
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string())
    }

    /// `total.amount`, or zero.
    pub fn total(&self) -> Decimal {
        self.total_amount.unwrap_or(Decimal::ZERO)
    }

    /// Invoice date, or "N/A".
    pub fn date(&self) -> String {
        self.invoice_date.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Line items, empty when absent.
    pub fn line_items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

impl LineItem {
    fn from_value(value: &Value, index: usize, reader: &FieldReader) -> Result<Self, ProjectionError> {
        if value.is_null() {
            return Err(ProjectionError::NullItem(index));
        }

        Ok(Self {
            description: value.get("description").and_then(|v| reader.text(v)),
            quantity: value.get("quantity").and_then(|v| reader.number(v)),
            rate: value.get("rate").and_then(|v| reader.number(v)),
            gst: value.get("gst").and_then(|v| reader.number(v)),
            amount: value.get("amount").and_then(|v| reader.number(v)),
        })
    }

    /// Description, or "N/A".
    pub fn name(&self) -> String {
        self.description.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Quantity, or zero.
    pub fn qty(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ZERO)
    }

    /// Rate, or zero.
    pub fn unit_price(&self) -> Decimal {
        self.rate.unwrap_or(Decimal::ZERO)
    }

    /// GST, or zero.
    pub fn tax(&self) -> Decimal {
        self.gst.unwrap_or(Decimal::ZERO)
    }

    /// Amount, or zero.
    pub fn price_with_tax(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Reads scalar fields out of loosely typed JSON.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader {
    /// Accept numeric strings for number fields.
    lenient_numbers: bool,
}

impl FieldReader {
    /// Create a reader that accepts numeric strings.
    pub fn new() -> Self {
        Self {
            lenient_numbers: true,
        }
    }

    /// Set numeric string acceptance.
    pub fn with_lenient_numbers(mut self, lenient: bool) -> Self {
        self.lenient_numbers = lenient;
        self
    }

    /// Read a text field. Empty strings, zero, `false`, `null`, arrays and
    /// objects read as absent; non-zero numbers and `true` are rendered as text.
    pub fn text(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(_) | Value::Bool(true) if is_truthy(value) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Read an identifier field. Every truthy value counts; anything other
    /// than a string is rendered as compact JSON.
    pub fn label(&self, value: &Value) -> Option<String> {
        match value {
            _ if !is_truthy(value) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Read a number field. Anything that is not a number (or, when lenient,
    /// a numeric string) reads as absent.
    pub fn number(&self, value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => decimal_from_number(n),
            Value::String(s) if self.lenient_numbers => parse_amount(s),
            _ => None,
        }
    }
}

impl Default for FieldReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a JSON value counts as present: not `null`, `false`, zero or "".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
