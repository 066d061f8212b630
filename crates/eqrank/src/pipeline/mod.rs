//! Pipeline drivers.
//!
//! One [`Pipeline`] value carries the configuration and the dataset; each
//! step is a method:
//!
//! 1. [`Pipeline::parse`] - NLP parses, quantity sets and the solver input
//! 2. [`Pipeline::split_folds`] - cross-validation fold files
//! 3. [`Pipeline::train_local`] - node rows for the local classifier
//! 4. [`Pipeline::train_global`] - equality rows for the global classifier
//! 5. [`Pipeline::evaluate`] - ranks the candidates of one fold
//! 6. [`Pipeline::summarize`] - sums the per-fold results
//!
//! Steps exchange data only through files under the configured data paths,
//! so each one can run in its own process.

mod evaluate;
mod parse;
mod summary;
mod training;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use eqrank_config::EqRankConfig;
use eqrank_data::{Dataset, ProblemLoader};

use crate::error::{PipelineError, Result};

pub use evaluate::FoldEvaluation;
pub use parse::ParseReport;
pub use summary::Summary;

/// Which trained model a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Local,
    Global,
}

impl ModelKind {
    fn name(self) -> &'static str {
        match self {
            ModelKind::Local => "local",
            ModelKind::Global => "global",
        }
    }
}

/// The configured pipeline over one dataset.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: EqRankConfig,
    dataset: Dataset,
}

impl Pipeline {
    /// Loads the configured dataset.
    pub fn new(config: EqRankConfig) -> Result<Self> {
        let dataset = Dataset::load(&config.data.dataset)?;
        Ok(Self::with_dataset(config, dataset))
    }

    /// Uses an already loaded dataset.
    pub fn with_dataset(config: EqRankConfig, dataset: Dataset) -> Self {
        Self { config, dataset }
    }

    pub fn config(&self) -> &EqRankConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Path of the saved model of `kind` for `fold`.
    pub fn model_path(&self, fold: usize, kind: ModelKind) -> PathBuf {
        self.config
            .data
            .model_dir
            .join(format!("fold{}.{}.json", fold, kind.name()))
    }

    fn loader(&self) -> ProblemLoader<'_> {
        ProblemLoader::new(&self.dataset, &self.config.data)
    }

    fn check_fold(&self, fold: usize) -> Result<()> {
        let fold_count = self.config.data.fold_count;
        if fold >= fold_count {
            return Err(PipelineError::FoldOutOfRange { fold, fold_count });
        }
        Ok(())
    }

    // Per-fold seed, so folds trained in separate runs stay independent.
    fn fold_seed(&self, fold: usize) -> u64 {
        self.config.seed().wrapping_add(fold as u64)
    }
}
