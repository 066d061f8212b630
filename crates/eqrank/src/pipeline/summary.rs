//! Cross-validation summary.

use eqrank_data::results;
use eqrank_scoring::Tally;
use serde::Serialize;
use tracing::{info, warn};

use super::Pipeline;
use crate::error::Result;

/// Sum of the per-fold tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub tally: Tally,
    /// Folds that had a result file.
    pub folds: Vec<usize>,
    /// Accuracy in percent.
    pub accuracy: f64,
}

impl Pipeline {
    /// Sums the result files of all folds.
    pub fn summarize(&self) -> Result<Summary> {
        let data = &self.config.data;
        let (tally, folds) = results::sum_tallies(&data.results_dir, data.fold_count)?;
        if folds.len() < data.fold_count {
            warn!(
                event = "folds_missing",
                found = folds.len(),
                expected = data.fold_count,
            );
        }
        let summary = Summary {
            accuracy: tally.accuracy_percent(),
            tally,
            folds,
        };
        info!(
            event = "summary",
            folds = summary.folds.len(),
            correct = summary.tally.correct,
            counted = summary.tally.counted(),
            accuracy = summary.accuracy,
        );
        Ok(summary)
    }
}
