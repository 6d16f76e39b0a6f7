//! Output records handed to the display layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the invoices view: a line item joined with its document's
/// header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number.
    pub serial: String,

    /// Customer name.
    pub customer: String,

    /// Line item description.
    pub product: String,

    /// Line item quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,

    /// Line item tax.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    /// Document total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Invoice date.
    pub date: String,
}

/// One row of the products view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_with_tax: Decimal,
}

/// One row of the customers view, aggregated over a document's line items.
///
/// `qty`, `tax` and `price_with_tax` are sums; `unit_price` is the rate of
/// the last line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_with_tax: Decimal,
}

/// The three collections derived from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub invoices: Vec<InvoiceRecord>,
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
}

impl RecordSet {
    /// Check whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty() && self.products.is_empty() && self.customers.is_empty()
    }

    /// Total number of records across the three collections.
    pub fn len(&self) -> usize {
        self.invoices.len() + self.products.len() + self.customers.len()
    }
}

/// Response body returned to the upload caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    /// Always "success" once the generative service has answered.
    pub status: String,
    pub invoices: Vec<InvoiceRecord>,
    pub products: Vec<ProductRecord>,
    pub customers: Vec<CustomerRecord>,
}

impl From<RecordSet> for ExtractionResponse {
    fn from(records: RecordSet) -> Self {
        Self {
            status: "success".to_string(),
            invoices: records.invoices,
            products: records.products,
            customers: records.customers,
        }
    }
}

/// A named column of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name in the serialized record.
    pub key: &'static str,
    /// Human-readable header.
    pub header: &'static str,
}

impl Column {
    const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

/// A record that renders as one row of a named-column table.
pub trait TableRow {
    /// Plural collection name ("invoices", "products", "customers").
    const COLLECTION: &'static str;

    /// Columns in display order.
    fn columns() -> &'static [Column];

    /// Cell text in the order of [`TableRow::columns`].
    fn cells(&self) -> Vec<String>;
}

const INVOICE_COLUMNS: &[Column] = &[
    Column::new("serial", "Serial Number"),
    Column::new("customer", "Customer Name"),
    Column::new("product", "Product Name"),
    Column::new("qty", "Quantity"),
    Column::new("tax", "Tax"),
    Column::new("total", "Total Amount"),
    Column::new("date", "Date"),
];

const PRODUCT_COLUMNS: &[Column] = &[
    Column::new("name", "Product Name"),
    Column::new("qty", "Quantity"),
    Column::new("unitPrice", "Unit Price"),
    Column::new("tax", "Tax"),
    Column::new("priceWithTax", "Price with Tax"),
];

const CUSTOMER_COLUMNS: &[Column] = &[
    Column::new("name", "Customer Name"),
    Column::new("qty", "Quantity"),
    Column::new("unitPrice", "Unit Price"),
    Column::new("tax", "Tax"),
    Column::new("priceWithTax", "Price with Tax"),
];

impl TableRow for InvoiceRecord {
    const COLLECTION: &'static str = "invoices";

    fn columns() -> &'static [Column] {
        INVOICE_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.serial.clone(),
            self.customer.clone(),
            self.product.clone(),
            self.qty.normalize().to_string(),
            self.tax.normalize().to_string(),
            self.total.normalize().to_string(),
            self.date.clone(),
        ]
    }
}

impl TableRow for ProductRecord {
    const COLLECTION: &'static str = "products";

    fn columns() -> &'static [Column] {
        PRODUCT_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.qty.normalize().to_string(),
            self.unit_price.normalize().to_string(),
            self.tax.normalize().to_string(),
            self.price_with_tax.normalize().to_string(),
        ]
    }
}

impl TableRow for CustomerRecord {
    const COLLECTION: &'static str = "customers";

    fn columns() -> &'static [Column] {
        CUSTOMER_COLUMNS
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.qty.normalize().to_string(),
            self.unit_price.normalize().to_string(),
            self.tax.normalize().to_string(),
            self.price_with_tax.normalize().to_string(),
        ]
    }
}
