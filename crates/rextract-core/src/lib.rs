//! Core library for turning generative-service receipt answers into records.
//!
//! This crate provides:
//! - Repair of "JSON-like" answers into a single JSON object
//! - Projection of the repaired object into invoice, product and customer records
//! - The document source seam the generative-service client plugs into
//! - Pipeline configuration

pub mod error;
pub mod models;
pub mod pipeline;
pub mod project;
pub mod rules;
pub mod sanitize;
pub mod source;

pub use error::{ProjectionError, RextractError, Result, SourceError};
pub use models::config::RextractConfig;
pub use models::records::{
    Column, CustomerRecord, ExtractionResponse, InvoiceRecord, ProductRecord, RecordSet, TableRow,
};
pub use models::source::{LineItem, SourceDocument};
pub use pipeline::{extract_records, Pipeline};
pub use project::{project, Projection, RecordProjector};
pub use sanitize::{sanitize, ResponseSanitizer};
pub use source::{DocumentKind, DocumentSource, SavedResponseSource};
