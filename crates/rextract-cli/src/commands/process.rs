//! Process command - extract records from a single generative-service answer.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use rextract_core::Pipeline;

use super::config::load_config;
use super::read_answer;
use crate::output::{format_records, OutputFormat, TableSelection};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Saved answer, a document with a saved answer, or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Collection to output
    #[arg(short, long, value_enum, default_value = "all")]
    table: TableSelection,

    /// Directory holding saved answers for documents
    #[arg(long)]
    responses_dir: Option<PathBuf>,

    /// Print the repaired answer instead of records
    #[arg(long)]
    sanitized: bool,

    /// Fail when the answer cannot be parsed
    #[arg(long)]
    strict: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let pipeline = Pipeline::from_config(&config);

    info!("Processing answer: {}", args.input.display());
    let raw = read_answer(&args.input, args.responses_dir.as_deref())?;

    let output = if args.sanitized {
        pipeline.sanitize(&raw)
    } else {
        let records = if args.strict {
            pipeline.try_extract(&raw)?
        } else {
            let projection = pipeline.extract(&raw);
            if let Some(e) = projection.error() {
                warn!("Answer could not be parsed: {}", e);
            }
            projection.into_records()
        };

        if records.is_empty() {
            eprintln!("{} No records extracted", style("ℹ").blue());
        }

        format_records(&records, args.format, args.table, config.output.pretty_json)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
