//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::io::Read;
use std::path::Path;

use rextract_core::{DocumentKind, DocumentSource, SavedResponseSource};

/// Read a generative-service answer.
///
/// `-` reads stdin. A document (image, PDF or spreadsheet) is resolved to its
/// saved answer; any other file is read as the answer itself.
pub fn read_answer(input: &Path, responses_dir: Option<&Path>) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }

    if DocumentKind::from_path(input).is_some() {
        let mut source = SavedResponseSource::new();
        if let Some(dir) = responses_dir {
            source = source.with_responses_dir(dir);
        }
        return Ok(source.text_from_document(input)?);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(std::fs::read_to_string(input)?)
}
