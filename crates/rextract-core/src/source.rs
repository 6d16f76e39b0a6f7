//! Interface to the generative service that reads uploaded documents.
//!
//! The service call itself lives outside this crate. [`DocumentSource`] is the
//! seam it plugs into; [`SavedResponseSource`] replays answers captured on disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;

/// Instruction sent to the generative service alongside each document.
pub const EXTRACTION_PROMPT: &str = "You are a specialist in comprehending receipts and documents. \
You will receive input files in the form of images, PDFs, or Excel files. \
Your task is to accurately extract and organize details related to invoices, products, and customers \
from these files in a structured format, such as JSON, with appropriate tags for each data field.";

/// Suffix appended to a document's file name to locate its saved answer.
pub const RESPONSE_SUFFIX: &str = "response.txt";

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Kind of document the generative service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Photo or scan of a receipt.
    Image,
    /// PDF invoice.
    Pdf,
    /// Spreadsheet export.
    Spreadsheet,
}

impl DocumentKind {
    /// Classify a file by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "webp" | "heic" | "heif" | "gif" | "bmp" | "tiff" | "tif" => {
                Some(DocumentKind::Image)
            }
            "pdf" => Some(DocumentKind::Pdf),
            "xls" | "xlsx" | "ods" | "csv" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }

    /// Classify a file by MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_lowercase();

        if mime.starts_with("image/") {
            return Some(DocumentKind::Image);
        }

        match mime.as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet"
            | "text/csv" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }
}

/// Turns an uploaded document into the generative service's raw answer.
pub trait DocumentSource {
    /// Return the raw text answer for the document at `path`.
    fn text_from_document(&self, path: &Path) -> Result<String>;
}

/// Replays answers saved next to their documents (or in one directory) as
/// `<file name>.response.txt`.
#[derive(Debug, Clone, Default)]
pub struct SavedResponseSource {
    responses_dir: Option<PathBuf>,
}

impl SavedResponseSource {
    /// Look for answers next to each document.
    pub fn new() -> Self {
        Self { responses_dir: None }
    }

    /// Look for answers in `dir` instead.
    pub fn with_responses_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.responses_dir = Some(dir.into());
        self
    }

    /// Where the saved answer for `document` is expected.
    pub fn response_path(&self, document: &Path) -> PathBuf {
        let file_name = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let response_name = format!("{}.{}", file_name, RESPONSE_SUFFIX);

        match &self.responses_dir {
            Some(dir) => dir.join(response_name),
            None => document.with_file_name(response_name),
        }
    }
}

impl DocumentSource for SavedResponseSource {
    fn text_from_document(&self, path: &Path) -> Result<String> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| SourceError::UnsupportedDocument(path.display().to_string()))?;

        let response_path = self.response_path(path);
        debug!("Reading saved {:?} response from {}", kind, response_path.display());

        let text = std::fs::read_to_string(&response_path).map_err(|source| SourceError::Read {
            path: response_path.display().to_string(),
            source,
        })?;

        if text.trim().is_empty() {
            return Err(SourceError::EmptyResponse(path.display().to_string()));
        }

        Ok(text)
    }
}
