//! Batch processing command for many saved answers.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use rextract_core::{Pipeline, RecordSet};

use super::config::load_config;
use super::read_answer;
use crate::output::{format_records, OutputFormat, TableSelection};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Directory holding saved answers for documents
    #[arg(long)]
    responses_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    records: Option<RecordSet>,
    /// Why an answer that was read produced no records.
    note: Option<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn status(&self) -> &'static str {
        match (&self.records, &self.note) {
            (None, _) => "error",
            (Some(_), Some(_)) => "empty",
            (Some(_), None) => "success",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let pipeline = Arc::new(Pipeline::from_config(&config));

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let pipeline = Arc::clone(&pipeline);
        let responses_dir = args.responses_dir.clone();

        tasks.spawn_blocking(move || {
            let _permit = permit;
            (index, process_single_file(path, &pipeline, responses_dir.as_deref()))
        });
    }

    let mut results: Vec<(usize, ProcessResult)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                tasks.abort_all();
                overall_pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        overall_pb.inc(1);
        results.push((index, result));
    }

    overall_pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        let names = output_names(results.iter().map(|r| r.path.as_path()));

        for (result, output_name) in results.iter().zip(&names) {
            if let Some(records) = &result.records {
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                let content = format_records(
                    records,
                    args.format,
                    TableSelection::All,
                    config.output.pretty_json,
                )?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let empty = results.iter().filter(|r| r.status() == "empty").count();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} empty, {} failed",
        style(results.len() - failed.len() - empty).green(),
        style(empty).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file name (without extension) for each input.
///
/// The file stem is used unless two inputs share it, in which case those
/// inputs keep their full file name. A numeric suffix separates anything
/// still colliding.
fn output_names<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<String> {
    let paths: Vec<&Path> = paths.into_iter().collect();
    let stem = |p: &Path| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("answer")
            .to_string()
    };

    let mut stem_counts: HashMap<String, usize> = HashMap::new();
    for path in &paths {
        *stem_counts.entry(stem(*path)).or_default() += 1;
    }

    let mut used = HashSet::new();
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let stem = stem(*path);
            let mut name = if stem_counts[&stem] > 1 {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .unwrap_or(stem)
            } else {
                stem
            };

            if used.contains(&name) {
                name = format!("{}-{}", name, index + 1);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn process_single_file(
    path: PathBuf,
    pipeline: &Pipeline,
    responses_dir: Option<&Path>,
) -> ProcessResult {
    let file_start = Instant::now();

    let (records, note, error) = match read_answer(&path, responses_dir) {
        Ok(raw) => {
            let projection = pipeline.extract(&raw);
            let note = projection.error().map(|e| e.to_string());
            (Some(projection.into_records()), note, None)
        }
        Err(e) => (None, None, Some(e.to_string())),
    };

    ProcessResult {
        path,
        records,
        note,
        error,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = chrono::Local::now().to_rfc3339();

    wtr.write_record([
        "filename",
        "status",
        "invoices",
        "products",
        "customers",
        "processing_time_ms",
        "processed_at",
        "detail",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let counts = result
            .records
            .as_ref()
            .map(|r| {
                [
                    r.invoices.len().to_string(),
                    r.products.len().to_string(),
                    r.customers.len().to_string(),
                ]
            })
            .unwrap_or_default();
        let detail = result
            .error
            .as_deref()
            .or(result.note.as_deref())
            .unwrap_or("");

        wtr.write_record([
            filename,
            result.status(),
            counts[0].as_str(),
            counts[1].as_str(),
            counts[2].as_str(),
            result.processing_time_ms.to_string().as_str(),
            processed_at.as_str(),
            detail,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_keep_stems_when_unique() {
        let paths = [Path::new("in/first.txt"), Path::new("in/second.txt")];
        assert_eq!(output_names(paths), vec!["first", "second"]);
    }

    #[test]
    fn test_output_names_separate_shared_stems() {
        let paths = [
            Path::new("in/receipt.jpg"),
            Path::new("in/receipt.pdf"),
            Path::new("in/other.txt"),
        ];
        assert_eq!(
            output_names(paths),
            vec!["receipt.jpg", "receipt.pdf", "other"]
        );
    }

    #[test]
    fn test_output_names_separate_same_file_names() {
        let paths = [Path::new("a/receipt.txt"), Path::new("b/receipt.txt")];
        assert_eq!(output_names(paths), vec!["receipt.txt", "receipt.txt-2"]);
    }
}
