//! Feature extraction for snore / non-snore audio classification.
//!
//! This crate turns WAV recordings into the two feature sets used by the
//! classification experiment:
//! 1. Amplitude-envelope vectors: each file is split into a fixed grid of
//!    segments and parts, and the maximum absolute amplitude per part becomes
//!    one feature, with a binary label appended per vector.
//! 2. Spectrogram images: Hann-windowed STFT magnitudes rendered as grayscale
//!    PNGs, one per input file.

pub mod audio;
pub mod config;
pub mod dataset;
pub mod features;
pub mod output;
pub mod spectrogram;

pub use audio::{read_wav_clip, AudioClip, WavError};
pub use config::Config;
pub use dataset::RunSummary;
pub use features::{
    EnvelopeConfig, EnvelopeExtractor, FeatureError, FeatureVector, Label, LabelStrategy,
    TokenLabeler,
};
pub use spectrogram::{SpectrogramConfig, SpectrogramError, SpectrogramGenerator};
