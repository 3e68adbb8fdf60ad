//! Spectrogram Generation CLI
//!
//! A standalone tool that converts WAV recordings into grayscale STFT
//! spectrogram PNGs, one image per input file.
//!
//! Usage:
//!   cargo run --bin spectrogram_cli -- <wav_or_dir> --out-dir spectrograms

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use snore_features::audio::read_wav_clip;
use snore_features::config::Config;
use snore_features::dataset::wav_files;
use snore_features::spectrogram::{SpectrogramConfig, SpectrogramGenerator};

/// Convert WAV recordings to spectrogram PNG images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WAV file or directory of WAV files to process
    input: PathBuf,

    /// Directory for the generated PNGs
    #[arg(short, long, default_value = "spectrograms")]
    out_dir: PathBuf,

    /// Size of the FFT window (overrides config)
    #[arg(long)]
    n_fft: Option<usize>,

    /// Samples between consecutive STFT columns (overrides config)
    #[arg(long)]
    hop_length: Option<usize>,

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

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load(&Config::default_config_path()?)?,
    };
    let stft_config = SpectrogramConfig {
        n_fft: args.n_fft.unwrap_or(config.spectrogram.n_fft),
        hop_length: args.hop_length.unwrap_or(config.spectrogram.hop_length),
        win_length: args.n_fft.unwrap_or(config.spectrogram.win_length),
    };

    info!("Spectrogram generation starting...");
    info!("Input: {:?}", args.input);
    info!(
        "STFT: n_fft {}, hop {}, window {}",
        stft_config.n_fft, stft_config.hop_length, stft_config.win_length
    );

    let generator =
        SpectrogramGenerator::new(stft_config).context("Invalid spectrogram configuration")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", args.out_dir))?;

    let paths = if args.input.is_dir() {
        wav_files(&args.input)?
    } else {
        vec![args.input.clone()]
    };

    let mut written = 0usize;
    let mut skipped = 0usize;

    for path in &paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "spectrogram".to_string());
        let out_path = args.out_dir.join(format!("{}.png", stem));

        let result = read_wav_clip(path)
            .map_err(anyhow::Error::from)
            .and_then(|clip| {
                generator
                    .write_png(&clip.to_f32(), &out_path)
                    .map_err(anyhow::Error::from)
            });

        match result {
            Ok(()) => {
                info!("{:?} -> {:?}", path, out_path);
                written += 1;
            }
            Err(e) if args.input.is_dir() => {
                warn!("Skipping {:?}: {}", path, e);
                skipped += 1;
            }
            Err(e) => return Err(e.context(format!("Failed to process {:?}", path))),
        }
    }

    eprintln!("\n--- Run Summary ---");
    eprintln!("Images written: {}", written);
    eprintln!("Files skipped:  {}", skipped);

    Ok(())
}
