//! CLI application for grant proposal preprocessing.

mod commands;
mod table;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{batch, config, extract, fit, transform};

/// Grant proposal preprocessing - extract sections and build model features
#[derive(Parser)]
#[command(name = "grantprep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a record from a single PDF or DOCX proposal
    Extract(extract::ExtractArgs),

    /// Extract records from many proposals into one CSV
    Batch(batch::BatchArgs),

    /// Fit preprocessing on a records CSV and save the state
    Fit(fit::FitArgs),

    /// Build features for a records CSV with a saved state
    Transform(transform::TransformArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG directives refine the -v level.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Fit(args) => fit::run(args, cli.config.as_deref()).await,
        Commands::Transform(args) => transform::run(args).await,
        Commands::Config(args) => config::run(args).await,
    }
}
