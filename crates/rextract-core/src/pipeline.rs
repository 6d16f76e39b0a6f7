//! Sanitize-then-project pipeline over raw generative-service answers.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{RextractError, Result};
use crate::models::config::RextractConfig;
use crate::models::records::RecordSet;
use crate::project::{Projection, RecordProjector};
use crate::sanitize::ResponseSanitizer;
use crate::source::DocumentSource;

/// Runs the sanitizer and the projector with one configuration.
///
/// Holds no per-call state; one pipeline can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    sanitizer: ResponseSanitizer,
    projector: RecordProjector,
}

impl Pipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self {
            sanitizer: ResponseSanitizer::new(),
            projector: RecordProjector::new(),
        }
    }

    /// Create a pipeline from configuration.
    pub fn from_config(config: &RextractConfig) -> Self {
        Self {
            sanitizer: ResponseSanitizer::from_config(&config.sanitizer),
            projector: RecordProjector::from_config(&config.projection),
        }
    }

    /// Repair a raw answer without projecting it.
    pub fn sanitize(&self, raw: &str) -> String {
        self.sanitizer.sanitize(raw)
    }

    /// Repair and project a raw answer. Never fails.
    pub fn extract(&self, raw: &str) -> Projection {
        let start = Instant::now();
        info!("Extracting records from {} characters of response", raw.len());

        let sanitized = self.sanitizer.sanitize(raw);
        let projection = self.projector.project(&sanitized);

        debug!("Extraction finished in {:?}", start.elapsed());
        projection
    }

    /// Repair and project a raw answer, failing when nothing could be parsed.
    pub fn try_extract(&self, raw: &str) -> Result<RecordSet> {
        let sanitized = self.sanitizer.sanitize(raw);
        Ok(self.projector.try_project(&sanitized)?)
    }

    /// Read a saved raw answer from disk and extract it.
    pub fn extract_file(&self, path: &Path) -> Result<Projection> {
        let raw = std::fs::read_to_string(path)?;
        Ok(self.extract(&raw))
    }

    /// Ask `source` for a document's answer and extract it.
    pub fn extract_document(&self, source: &dyn DocumentSource, path: &Path) -> Result<Projection> {
        let raw = source.text_from_document(path).map_err(RextractError::from)?;
        Ok(self.extract(&raw))
    }
}

/// Repair and project a raw answer with default settings.
pub fn extract_records(raw: &str) -> RecordSet {
    Pipeline::new().extract(raw).into_records()
}
