//! `vet-records`: extract structured medical records from clinical text.
//!
//! JSON goes to stdout, logs to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vet_records_core::RecordExtractor;

#[derive(Parser)]
#[command(name = "vet-records", about = "Veterinary clinical text to structured records")]
struct Cli {
    /// JSON config file; VET_RECORDS_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a medical record and print it as JSON
    Extract {
        /// Input text file, or `-` for stdin
        input: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print the annotator spans for a document
    Annotate {
        /// Input text file, or `-` for stdin
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let engine = build_engine(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&engine.config().log_filter)),
        )
        .init();

    match cli.command {
        Commands::Extract { input, pretty } => {
            let text = read_input(&input)?;
            let record = engine.extract(&text);
            info!(input = %input.display(), visits = record.visits.len(), "done");

            let json = if pretty {
                record.to_json_pretty()?
            } else {
                record.to_json()?
            };
            println!("{json}");
        }
        Commands::Annotate { input } => {
            let text = read_input(&input)?;
            let spans = engine.annotate(&text);
            println!("{}", serde_json::to_string_pretty(&spans)?);
        }
    }

    Ok(())
}

fn build_engine(config: Option<&Path>) -> Result<RecordExtractor> {
    match config {
        Some(path) => RecordExtractor::from_config_file(path)
            .with_context(|| format!("building extraction engine from {}", path.display())),
        None => RecordExtractor::from_env().context("building extraction engine"),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))
}
