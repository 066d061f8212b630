//! Error types for the pipeline drivers.

use eqrank_config::ConfigError;
use eqrank_core::EqRankError;
use eqrank_data::DataError;
use eqrank_scoring::ScoringError;
use thiserror::Error;

/// Errors that stop a pipeline step.
///
/// Per-problem failures never surface here; they are logged and recorded in
/// the step's report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Core(#[from] EqRankError),

    #[error("parse service unreachable: {0}")]
    ServiceUnavailable(#[source] DataError),

    #[error("fold {fold} is out of range for {fold_count} folds")]
    FoldOutOfRange { fold: usize, fold_count: usize },
}

/// Result type for pipeline steps.
pub type Result<T> = std::result::Result<T, PipelineError>;
