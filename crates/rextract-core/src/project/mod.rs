//! Projection of sanitized text into invoice, product and customer records.

mod accumulate;

pub use accumulate::CustomerAccumulator;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ProjectionError;
use crate::models::config::ProjectionConfig;
use crate::models::records::{CustomerRecord, InvoiceRecord, ProductRecord, RecordSet};
use crate::models::source::{FieldReader, SourceDocument};

/// Outcome of a projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The text parsed and records were derived (possibly none).
    Extracted(RecordSet),
    /// Nothing could be derived; carries the reason.
    Empty(ProjectionError),
}

impl Projection {
    /// The derived records, or three empty collections.
    pub fn into_records(self) -> RecordSet {
        match self {
            Projection::Extracted(records) => records,
            Projection::Empty(_) => RecordSet::default(),
        }
    }

    /// The derived records, or three empty collections.
    pub fn records(&self) -> RecordSet {
        self.clone().into_records()
    }

    /// The reason nothing was derived, if any.
    pub fn error(&self) -> Option<&ProjectionError> {
        match self {
            Projection::Extracted(_) => None,
            Projection::Empty(e) => Some(e),
        }
    }

    /// Whether the text was parsed and walked successfully.
    pub fn is_extracted(&self) -> bool {
        matches!(self, Projection::Extracted(_))
    }
}

impl From<Result<RecordSet, ProjectionError>> for Projection {
    fn from(result: Result<RecordSet, ProjectionError>) -> Self {
        match result {
            Ok(records) => Projection::Extracted(records),
            Err(e) => Projection::Empty(e),
        }
    }
}

/// Derives the three record collections from sanitized text.
#[derive(Debug, Clone, Default)]
pub struct RecordProjector {
    reader: FieldReader,
}

impl RecordProjector {
    /// Create a projector that accepts numeric strings.
    pub fn new() -> Self {
        Self {
            reader: FieldReader::new(),
        }
    }

    /// Create a projector from configuration.
    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new().with_lenient_numbers(config.lenient_numbers)
    }

    /// Set numeric string acceptance.
    pub fn with_lenient_numbers(mut self, lenient: bool) -> Self {
        self.reader = self.reader.with_lenient_numbers(lenient);
        self
    }

    /// Project sanitized text. Never fails; failures become
    /// [`Projection::Empty`].
    pub fn project(&self, sanitized: &str) -> Projection {
        let projection = Projection::from(self.try_project(sanitized));

        match &projection {
            Projection::Extracted(records) => debug!(
                "Projected {} invoices, {} products, {} customers",
                records.invoices.len(),
                records.products.len(),
                records.customers.len()
            ),
            Projection::Empty(e) => warn!("Error parsing response: {}", e),
        }

        projection
    }

    /// Project sanitized text, reporting why it failed.
    pub fn try_project(&self, sanitized: &str) -> Result<RecordSet, ProjectionError> {
        let value: Value =
            serde_json::from_str(sanitized).map_err(|e| ProjectionError::Parse(e.to_string()))?;
        let document = SourceDocument::from_value(&value, &self.reader)?;

        project_document(&document)
    }
}

/// Derive all three collections from a typed document.
pub fn project_document(document: &SourceDocument) -> Result<RecordSet, ProjectionError> {
    Ok(RecordSet {
        invoices: derive_invoices(document),
        products: derive_products(document),
        customers: derive_customers(document)?.into_iter().collect(),
    })
}

/// One invoice row per line item, only when the document has a truthy invoice
/// number and a non-empty item list.
pub fn derive_invoices(document: &SourceDocument) -> Vec<InvoiceRecord> {
    let items = document.line_items();
    if document.invoice_number.is_none() || items.is_empty() {
        return Vec::new();
    }

    let serial = document.serial();
    let customer = document.customer_name();
    let total = document.total();
    let date = document.date();

    items
        .iter()
        .map(|item| InvoiceRecord {
            serial: serial.clone(),
            customer: customer.clone(),
            product: item.name(),
            qty: item.qty(),
            tax: item.tax(),
            total,
            date: date.clone(),
        })
        .collect()
}

/// One product row per line item.
pub fn derive_products(document: &SourceDocument) -> Vec<ProductRecord> {
    document
        .line_items()
        .iter()
        .map(|item| ProductRecord {
            name: item.name(),
            qty: item.qty(),
            unit_price: item.unit_price(),
            tax: item.tax(),
            price_with_tax: item.price_with_tax(),
        })
        .collect()
}

/// At most one customer row, aggregated over the line items.
pub fn derive_customers(document: &SourceDocument) -> Result<Option<CustomerRecord>, ProjectionError> {
    if document.customer.is_none() {
        return Ok(None);
    }

    let record = document
        .line_items()
        .iter()
        .try_fold(CustomerAccumulator::new(document.customer_name()), |acc, item| acc.add(item))?
        .finish();

    Ok(Some(record))
}

/// Project sanitized text with default settings.
pub fn project(sanitized: &str) -> Projection {
    RecordProjector::new().project(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const SINGLE_ITEM: &str = r#"{"invoice_number": "INV1", "customer": {"name": "Acme"}, "total": {"amount": 100}, "items": [{"description": "Widget", "quantity": 2, "rate": 10, "gst": 1, "amount": 21}]}"#;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_single_item_document() {
        let records = project(SINGLE_ITEM).into_records();

        assert_eq!(
            records.invoices,
            vec![InvoiceRecord {
                serial: "INV1".to_string(),
                customer: "Acme".to_string(),
                product: "Widget".to_string(),
                qty: d(2),
                tax: d(1),
                total: d(100),
                date: "N/A".to_string(),
            }]
        );
        assert_eq!(
            records.products,
            vec![ProductRecord {
                name: "Widget".to_string(),
                qty: d(2),
                unit_price: d(10),
                tax: d(1),
                price_with_tax: d(21),
            }]
        );
        assert_eq!(
            records.customers,
            vec![CustomerRecord {
                name: "Acme".to_string(),
                qty: d(2),
                unit_price: d(10),
                tax: d(1),
                price_with_tax: d(21),
            }]
        );
    }

    #[test]
    fn test_customer_unit_price_is_last_rate() {
        let text = r#"{"customer": {"name": "Acme"}, "items": [
            {"description": "A", "quantity": 2, "rate": 10, "gst": 1, "amount": 21},
            {"description": "B", "quantity": 3, "rate": 15, "gst": 2, "amount": 47}
        ]}"#;

        let customers = project(text).into_records().customers;

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].unit_price, d(15));
        assert_eq!(customers[0].qty, d(5));
        assert_eq!(customers[0].tax, d(3));
        assert_eq!(customers[0].price_with_tax, d(68));
    }

    #[test]
    fn test_items_without_invoice_number() {
        let text = r#"{"items": [{"description": "A"}, {"description": "B"}]}"#;
        let records = project(text).into_records();

        assert!(records.invoices.is_empty());
        assert_eq!(records.products.len(), 2);
        assert_eq!(records.products[1].name, "B");
        assert_eq!(records.products[1].qty, Decimal::ZERO);
    }

    #[test]
    fn test_no_customer_field() {
        let text = r#"{"invoice_number": "INV9", "items": [{"description": "A", "quantity": 4}]}"#;
        let records = project(text).into_records();

        assert!(records.customers.is_empty());
        assert_eq!(records.invoices[0].customer, "Unknown");
    }

    #[test]
    fn test_customer_without_items() {
        let records = project(r#"{"customer": {"name": "Acme"}}"#).into_records();

        assert!(records.invoices.is_empty());
        assert!(records.products.is_empty());
        assert_eq!(
            records.customers,
            vec![CustomerRecord {
                name: "Acme".to_string(),
                qty: Decimal::ZERO,
                unit_price: Decimal::ZERO,
                tax: Decimal::ZERO,
                price_with_tax: Decimal::ZERO,
            }]
        );
    }

    #[test]
    fn test_empty_items_emit_no_invoices() {
        let records = project(r#"{"invoice_number": "INV1", "items": []}"#).into_records();
        assert_eq!(records, RecordSet::default());
    }

    #[test]
    fn test_invoice_rows_share_header_fields() {
        let text = r#"{"invoice_number": "INV2", "invoice_date": "2024-03-01", "total": {"amount": 50.5},
            "items": [{"description": "A", "quantity": 1, "gst": 0.5}, {"quantity": 2}]}"#;
        let invoices = project(text).into_records().invoices;

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].product, "A");
        assert_eq!(invoices[1].product, "N/A");
        assert_eq!(invoices[1].qty, d(2));
        assert_eq!(invoices[1].tax, Decimal::ZERO);
        for invoice in &invoices {
            assert_eq!(invoice.serial, "INV2");
            assert_eq!(invoice.date, "2024-03-01");
            assert_eq!(invoice.total, Decimal::new(505, 1));
        }
    }

    #[test]
    fn test_invalid_text_is_empty() {
        let projection = project("{not json");

        assert!(matches!(projection.error(), Some(ProjectionError::Parse(_))));
        assert_eq!(projection.into_records(), RecordSet::default());
    }

    #[test]
    fn test_empty_object_is_extracted_but_empty() {
        let projection = project("{}");

        assert!(projection.is_extracted());
        assert!(projection.into_records().is_empty());
    }

    #[test]
    fn test_type_mismatch_is_empty() {
        let projection = project(r#"{"customer": {"name": "Acme"}, "items": {"description": "A"}}"#);

        assert_eq!(projection.error(), Some(&ProjectionError::ItemsNotSequence("object")));
        assert!(projection.into_records().is_empty());

        let projection = project("null");
        assert_eq!(projection.error(), Some(&ProjectionError::NullDocument));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let first = project(SINGLE_ITEM);
        let second = project(SINGLE_ITEM);

        assert_eq!(first, second);
    }

    #[test]
    fn test_structured_invoice_number_still_emits_invoices() {
        let text = r#"{"invoice_number": {"id": "INV1"}, "items": [{"description": "Widget"}]}"#;
        let invoices = project(text).into_records().invoices;

        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].serial, r#"{"id":"INV1"}"#);
        assert_eq!(invoices[0].product, "Widget");

        let text = r#"{"invoice_number": [], "items": [{"description": "Widget"}]}"#;
        assert_eq!(project(text).into_records().invoices[0].serial, "[]");
    }

    #[test]
    fn test_customer_total_overflow_is_empty() {
        let text = r#"{"customer": {"name": "Acme"}, "items": [
            {"quantity": 50000000000000000000000000000},
            {"quantity": 50000000000000000000000000000}
        ]}"#;
        let projection = project(text);

        assert_eq!(projection.error(), Some(&ProjectionError::Overflow("quantity")));
        assert_eq!(projection.into_records(), RecordSet::default());

        // Without a customer block nothing is summed.
        let text = r#"{"items": [
            {"quantity": 50000000000000000000000000000},
            {"quantity": 50000000000000000000000000000}
        ]}"#;
        let records = project(text).into_records();
        assert_eq!(records.products.len(), 2);
        assert_eq!(records.products[0].qty, "50000000000000000000000000000".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_out_of_range_number_reads_as_zero() {
        let text = r#"{"customer": {"name": "Acme"}, "items": [{"quantity": 1e30, "rate": 2}]}"#;
        let projection = project(text);

        assert!(projection.is_extracted());
        let records = projection.into_records();
        assert_eq!(records.products[0].qty, Decimal::ZERO);
        assert_eq!(records.products[0].unit_price, d(2));
        assert_eq!(records.customers[0].qty, Decimal::ZERO);
    }

    #[test]
    fn test_strict_numbers() {
        let text = r#"{"items": [{"quantity": "2", "rate": 3}]}"#;

        let lenient = RecordProjector::new().project(text).into_records();
        assert_eq!(lenient.products[0].qty, d(2));

        let strict = RecordProjector::new()
            .with_lenient_numbers(false)
            .project(text)
            .into_records();
        assert_eq!(strict.products[0].qty, Decimal::ZERO);
        assert_eq!(strict.products[0].unit_price, d(3));
    }
}
