//! Dataset runs: extract envelope features from one WAV file or a directory
//! of them, writing feature lines to a sink.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::audio::{read_wav_clip, WavError};
use crate::features::{EnvelopeExtractor, FeatureVector, LabelStrategy};
use crate::output::write_vectors;

/// Summary of one extraction run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub positive_files: usize,
    pub vectors_written: usize,
}

/// Extract feature vectors from a single WAV file.
///
/// The label is derived from the file name by the given strategy; the
/// segment/part grid is computed from the frame count the header declares, so
/// a truncated data chunk stops extraction early per the extractor's policy.
pub fn extract_file(
    path: &Path,
    extractor: &EnvelopeExtractor,
    labeler: &dyn LabelStrategy,
) -> Result<Vec<FeatureVector>, WavError> {
    let source_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let label = labeler.label(&source_id);

    let clip = read_wav_clip(path)?;
    debug!(
        "{}: {} samples, label {}",
        source_id,
        clip.len(),
        label.as_u8()
    );

    Ok(extractor.extract_stream(clip.declared_frames, clip.samples, label))
}

/// List the WAV files in a directory, sorted by name for deterministic output
pub fn wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {:?}", dir))?
    {
        let path = entry?.path();
        let is_wav = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);
        if path.is_file() && is_wav {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Run extraction over a WAV file or a directory of WAV files.
///
/// For a single file, errors are surfaced. For a directory, unreadable files
/// are logged, counted as skipped, and the run continues.
pub fn run<W: Write + ?Sized>(
    input: &Path,
    extractor: &EnvelopeExtractor,
    labeler: &dyn LabelStrategy,
    sink: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if input.is_file() {
        let vectors = extract_file(input, extractor, labeler)
            .with_context(|| format!("Failed to extract features from {:?}", input))?;
        record(&mut summary, &vectors);
        write_vectors(sink, &vectors).context("Failed to write feature lines")?;
    } else if input.is_dir() {
        let paths = wav_files(input)?;
        info!("Found {} WAV files in {:?}", paths.len(), input);

        for path in &paths {
            match extract_file(path, extractor, labeler) {
                Ok(vectors) => {
                    record(&mut summary, &vectors);
                    write_vectors(sink, &vectors).context("Failed to write feature lines")?;
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    summary.files_skipped += 1;
                }
            }
        }
    } else {
        bail!("Input path does not exist: {:?}", input);
    }

    sink.flush().context("Failed to flush output sink")?;
    info!(
        "Extraction complete: {} files, {} skipped, {} vectors",
        summary.files_processed, summary.files_skipped, summary.vectors_written
    );
    Ok(summary)
}

fn record(summary: &mut RunSummary, vectors: &[FeatureVector]) {
    summary.files_processed += 1;
    summary.vectors_written += vectors.len();
    if vectors.iter().any(|v| v.label.is_positive()) {
        summary.positive_files += 1;
    }
}
