use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use snore_features::config::Config;
use snore_features::dataset;
use snore_features::features::{EnvelopeConfig, EnvelopeExtractor, TokenLabeler};
use snore_features::output::open_sink;

/// Amplitude-envelope feature extraction for snore / non-snore WAV datasets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAV file or directory of WAV files to process
    input: PathBuf,

    /// Number of segments per file (overrides config)
    #[arg(long)]
    segments: Option<usize>,

    /// Number of parts per segment (overrides config)
    #[arg(long)]
    parts: Option<usize>,

    /// File-name token marking the positive class (overrides config)
    #[arg(long)]
    label_token: Option<String>,

    /// Output file for feature lines (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Load config, then apply CLI overrides
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load(&Config::default_config_path()?)?,
    };
    let segment_count = args.segments.unwrap_or(config.segment_count);
    let part_count = args.parts.unwrap_or(config.part_count);
    let label_token = args
        .label_token
        .clone()
        .unwrap_or_else(|| config.label_token.clone());
    let output_path = args.output.clone().or_else(|| config.output_path.clone());

    info!("Feature extraction starting...");
    info!("Input: {:?}", args.input);
    info!(
        "Grid: {} segments x {} parts, label token {:?}",
        segment_count, part_count, label_token
    );

    let extractor = EnvelopeExtractor::new(EnvelopeConfig {
        segment_count,
        part_count,
    })
    .context("Invalid extraction configuration")?;
    let labeler = TokenLabeler::new(label_token);

    let mut sink = open_sink(output_path.as_deref())?;
    let summary = dataset::run(&args.input, &extractor, &labeler, &mut sink)?;

    eprintln!("\n--- Run Summary ---");
    eprintln!("Files processed: {}", summary.files_processed);
    eprintln!("Files skipped:   {}", summary.files_skipped);
    eprintln!("Positive files:  {}", summary.positive_files);
    eprintln!("Vectors written: {}", summary.vectors_written);

    Ok(())
}
