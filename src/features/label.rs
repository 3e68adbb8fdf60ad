//! Binary class labels and the strategy that derives them.
//!
//! The dataset convention marks positive files by a token in the file name
//! ("1_0.wav" is a snore clip, "0_3.wav" is not). Labeling is an injected
//! strategy so the extractor never looks at file names itself.

use serde::{Deserialize, Serialize};

/// Binary class label for one audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Snore,
    NonSnore,
}

impl Label {
    /// Numeric form appended to each feature vector (1 = snore, 0 = non-snore)
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Snore => 1,
            Self::NonSnore => 0,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Snore)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Strategy for deriving a label from a source identifier (usually a file name)
pub trait LabelStrategy {
    fn label(&self, source_id: &str) -> Label;
}

/// Labels a source as positive when its identifier contains a fixed token
#[derive(Debug, Clone)]
pub struct TokenLabeler {
    token: String,
}

impl TokenLabeler {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Default for TokenLabeler {
    fn default() -> Self {
        Self::new("1_")
    }
}

impl LabelStrategy for TokenLabeler {
    fn label(&self, source_id: &str) -> Label {
        if source_id.contains(&self.token) {
            Label::Snore
        } else {
            Label::NonSnore
        }
    }
}
