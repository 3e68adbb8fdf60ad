pub mod envelope;
pub mod label;

pub use envelope::{EnvelopeConfig, EnvelopeExtractor, FeatureVector};
pub use label::{Label, LabelStrategy, TokenLabeler};

use thiserror::Error;

/// Errors that can occur during feature extraction
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
