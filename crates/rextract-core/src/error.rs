//! Error types for the rextract-core library.

use thiserror::Error;

/// Main error type for the rextract library.
#[derive(Error, Debug)]
pub enum RextractError {
    /// Record projection error.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Document source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while projecting sanitized text into records.
///
/// These never leave [`crate::project::project`]; they are carried inside
/// [`crate::Projection::Empty`] so callers can log why nothing was extracted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// The sanitized text is not valid JSON.
    #[error("failed to parse sanitized text: {0}")]
    Parse(String),

    /// The document value is `null`, so no field can be read from it.
    #[error("document is null")]
    NullDocument,

    /// `items` is present but is not a sequence.
    #[error("items is not a sequence (found {0})")]
    ItemsNotSequence(&'static str),

    /// A line item is `null`, so its fields cannot be read.
    #[error("line item {0} is null")]
    NullItem(usize),

    /// A customer total no longer fits in a decimal.
    #[error("customer {0} total overflowed")]
    Overflow(&'static str),
}

/// Errors from the document source seam.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The document type is not one the generative service accepts.
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    /// The generative service returned no text.
    #[error("empty response for {0}")]
    EmptyResponse(String),

    /// Reading the document or response failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the rextract library.
pub type Result<T> = std::result::Result<T, RextractError>;
