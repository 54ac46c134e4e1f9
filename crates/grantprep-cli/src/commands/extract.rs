//! Extract command - build a record from a single proposal document.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use grantprep_core::models::record::SECTION_FIELDS;
use grantprep_core::{DocumentFormat, ProposalExtractor, ProposalRecord};

use crate::table;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or DOCX)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One CSV row with a header
    Csv,
    /// JSON object
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Reject unsupported formats before touching the file system.
    DocumentFormat::from_path(&args.input)?;
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Extracting text...");

    let extractor = ProposalExtractor::new(&config)?;
    let record = extractor.extract(&args.input)?;

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total extraction time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ProposalRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            table::write_records(&mut buf, std::slice::from_ref(record))?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(record)?)),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &ProposalRecord) -> String {
    let mut output = String::new();

    output.push_str("Sections:\n");
    for (name, body) in SECTION_FIELDS.iter().zip(record.sections()) {
        if body.is_empty() {
            output.push_str(&format!("  {:<20} (not found)\n", name));
        } else {
            let preview: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
            let preview: String = preview.chars().take(60).collect();
            output.push_str(&format!(
                "  {:<20} {} chars: {}\n",
                name,
                body.chars().count(),
                preview
            ));
        }
    }

    output
}
