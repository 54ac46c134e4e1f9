//! Batch command - extract many proposal documents into one records CSV.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use grantprep_core::{DocumentFormat, ProposalExtractor, ProposalRecord};

use crate::table;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input files
    #[arg(required = true)]
    input: String,

    /// Output CSV (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Skip files that fail instead of aborting
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of extracting a single file.
struct ExtractResult {
    path: PathBuf,
    record: Result<ProposalRecord, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentFormat::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No PDF or DOCX files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(ProposalExtractor::new(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let extractor = Arc::clone(&extractor);
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let file_start = Instant::now();
            let record = extractor.extract(&path).map_err(|e| e.to_string());
            pb.inc(1);
            drop(permit);
            ExtractResult {
                path,
                record,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    // Awaiting in spawn order keeps results in input order.
    let mut records = Vec::with_capacity(handles.len());
    let mut failed = Vec::new();
    for handle in handles {
        let result = handle.await?;
        debug!(
            "{} took {}ms",
            result.path.display(),
            result.processing_time_ms
        );

        match result.record {
            Ok(record) => records.push(record),
            Err(message) if args.continue_on_error => {
                warn!("Failed to process {}: {}", result.path.display(), message);
                failed.push((result.path, message));
            }
            Err(message) => {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing {} failed: {}", result.path.display(), message);
            }
        }
    }

    pb.finish_and_clear();

    table::write_records(table::output(args.output.as_deref())?, &records)?;

    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len() + failed.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(records.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, message) in &failed {
            eprintln!("  - {}: {}", path.display(), message);
        }
    }

    if let Some(output_path) = &args.output {
        eprintln!(
            "{} Records written to {}",
            style("✓").green(),
            output_path.display()
        );
    }

    Ok(())
}
