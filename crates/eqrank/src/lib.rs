//! eqrank - ranks candidate equations for arithmetic word problems
//!
//! Runs the research pipeline end to end: problems are parsed by an NLP
//! service, an external ILP solver proposes candidate equations, and two
//! trained classifiers score every candidate's expression tree to pick the
//! most likely correct one.
//!
//! # Example
//!
//! ```no_run
//! use eqrank::prelude::*;
//!
//! let config = EqRankConfig::load("eqrank.toml").unwrap_or_default();
//! let pipeline = Pipeline::new(config).unwrap();
//! pipeline.split_folds().unwrap();
//! for fold in 0..pipeline.config().data.fold_count {
//!     pipeline.train_local(fold).unwrap();
//!     pipeline.train_global(fold).unwrap();
//!     pipeline.evaluate(fold, false).unwrap();
//! }
//! let summary = pipeline.summarize().unwrap();
//! println!("accuracy: {:.2}%", summary.accuracy);
//! ```

pub mod console;
pub mod error;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use pipeline::{FoldEvaluation, ModelKind, ParseReport, Pipeline, Summary};

// Building blocks, re-exported for callers that drive single steps.
pub use eqrank_config::{EligibilityPolicy, EqRankConfig};
pub use eqrank_core::{CandidateEquation, EquationTree, Problem, Quantity, QuantitySet};
pub use eqrank_data::{NlpClient, SentenceParser};
pub use eqrank_scoring::{
    Classifier, EquationScorer, ProblemOutcome, Ranking, ScoringModels, SoftmaxRegression, Tally,
};

pub mod prelude {
    pub use super::{EqRankConfig, NlpClient, Pipeline, SentenceParser};
    pub use super::{ProblemOutcome, Ranking, Tally};
}
