//! Data models for documents, records and configuration.

pub mod config;
pub mod records;
pub mod source;
