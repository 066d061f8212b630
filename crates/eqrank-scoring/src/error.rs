//! Error types for scoring and training.

use eqrank_core::EqRankError;
use thiserror::Error;

/// Errors raised while assembling features, training or querying classifiers.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("classifier has {found} classes, expected {expected}")]
    ClassCount { expected: usize, found: usize },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("label {label} out of range for {classes} classes")]
    InvalidLabel { label: usize, classes: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("model IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] EqRankError),
}

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;
