//! Fit command - learn preprocessing statistics from a records CSV.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use grantprep_core::FeatureAssembler;

use crate::table;

/// Arguments for the fit command.
#[derive(Args)]
pub struct FitArgs {
    /// Records CSV (one proposal per row)
    #[arg(required = true)]
    input: PathBuf,

    /// Where to save the fitted state (JSON)
    #[arg(short, long)]
    state: PathBuf,

    /// Feature matrix CSV of the training rows (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: FitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let frame = table::read_frame(&args.input)?;
    info!("Read {} rows from {}", frame.n_rows(), args.input.display());

    let (fitted, matrix) = FeatureAssembler::new(config).fit_transform(&frame)?;
    fitted.save(&args.state)?;

    table::write_matrix(table::output(args.output.as_deref())?, &matrix)?;

    eprintln!(
        "{} Fitted on {} rows: {} features ({} text terms) in {:?}",
        style("✓").green(),
        fitted.n_samples(),
        matrix.n_columns(),
        matrix.text_range().len(),
        start.elapsed()
    );
    eprintln!(
        "{} State saved to {}",
        style("✓").green(),
        args.state.display()
    );

    Ok(())
}
