//! Transform command - apply saved statistics to new records.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use grantprep_core::FittedPreprocessor;

use crate::table;

/// Arguments for the transform command.
#[derive(Args)]
pub struct TransformArgs {
    /// Records CSV (one proposal per row)
    #[arg(required = true)]
    input: PathBuf,

    /// Fitted state written by `fit`; its configuration is used
    #[arg(short, long)]
    state: PathBuf,

    /// Feature matrix CSV (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: TransformArgs) -> anyhow::Result<()> {
    let fitted = FittedPreprocessor::load(&args.state)
        .map_err(|e| anyhow::anyhow!("Failed to load state {}: {}", args.state.display(), e))?;
    info!(
        "Loaded state fitted at {} on {} rows",
        fitted.fitted_at(),
        fitted.n_samples()
    );

    let frame = table::read_frame(&args.input)?;
    let matrix = fitted.transform(&frame)?;

    table::write_matrix(table::output(args.output.as_deref())?, &matrix)?;

    eprintln!(
        "{} Transformed {} rows into {} features",
        style("✓").green(),
        matrix.n_rows(),
        matrix.n_columns()
    );

    Ok(())
}
