//! Error types for data access.

use std::path::PathBuf;

use eqrank_core::EqRankError;
use eqrank_scoring::ScoringError;
use thiserror::Error;

/// Errors raised while reading or writing pipeline data, or talking to the
/// NLP service.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("parse service error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("parse service returned neither result nor error")]
    EmptyRpcResponse,

    #[error("{}:{line}: {reason}", path.display())]
    MalformedFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("problem {0} is not in the dataset")]
    UnknownProblem(usize),

    #[error(transparent)]
    Core(#[from] EqRankError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl DataError {
    /// True when the parse service could not be reached at all.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, DataError::Http(e) if e.is_connect() || e.is_timeout())
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Reads a whole file, attaching its path to any error.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DataError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &std::path::Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
