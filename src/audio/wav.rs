//! WAV decoding via hound.
//!
//! Exposes samples as a typed signed-integer sequence; sample width and
//! endianness handling stay inside the decoder. Multi-channel files are
//! downmixed by keeping the first channel of each frame.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while reading an audio source
#[derive(Debug, Error)]
pub enum WavError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("{path}: unsupported sample format (only integer PCM is supported)")]
    UnsupportedFormat { path: PathBuf },

    #[error("{path}: file reports zero channels")]
    NoChannels { path: PathBuf },
}

/// A decoded mono audio clip
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Signed integer samples in file order, one per frame
    pub samples: Vec<i32>,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Frame count the container header claims. A truncated data chunk
    /// yields fewer decoded samples than this.
    pub declared_frames: usize,
}

impl AudioClip {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples normalized to [-1.0, 1.0] by the source bit depth
    pub fn to_f32(&self) -> Vec<f32> {
        let scale = (1i64 << (self.bits_per_sample.max(1) - 1)) as f32;
        self.samples.iter().map(|&s| s as f32 / scale).collect()
    }
}

/// Read a WAV file into memory as a mono integer clip.
///
/// The file handle is scoped to this call and released on every exit path.
/// A data chunk shorter than the header claims is not an error: decoding
/// stops at the last complete sample and the shortfall is left for the
/// caller's truncation policy.
pub fn read_wav_clip(path: &Path) -> Result<AudioClip, WavError> {
    let mut reader = hound::WavReader::open(path).map_err(|source| WavError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int {
        return Err(WavError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    if spec.channels == 0 {
        return Err(WavError::NoChannels {
            path: path.to_path_buf(),
        });
    }

    let channels = spec.channels as usize;
    let declared_frames = reader.duration() as usize;
    debug!(
        "Reading {:?}: {} Hz, {} channels, {} bits, {} frames declared",
        path, spec.sample_rate, spec.channels, spec.bits_per_sample, declared_frames
    );
    if channels > 1 {
        debug!("Downmixing {} channels by keeping channel 0", channels);
    }

    let mut samples = Vec::with_capacity(declared_frames);
    for (index, sample) in reader.samples::<i32>().enumerate() {
        match sample {
            Ok(value) => {
                if index % channels == 0 {
                    samples.push(value);
                }
            }
            Err(e) => {
                // Data chunk ended before the header said it would
                warn!(
                    "{:?}: sample data truncated at frame {} of {} ({})",
                    path,
                    index / channels,
                    declared_frames,
                    e
                );
                break;
            }
        }
    }

    Ok(AudioClip {
        samples,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        declared_frames,
    })
}
