//! Candidate equation scoring for eqrank.
//!
//! This crate turns candidate equations into ranked predictions:
//! - Feature vectors for arithmetic nodes and the final equality ([`features`])
//! - The [`Classifier`] contract and a trainable [`SoftmaxRegression`]
//! - Per-candidate scores and the per-problem [`Ranking`]
//! - Accuracy bookkeeping with [`Tally`]
//!
//! # Architecture
//!
//! Models are never global: the local and global classifiers travel together
//! in a [`ScoringModels`] value that is lent to an [`EquationScorer`].

pub mod classifier;
pub mod error;
pub mod features;
pub mod outcome;
pub mod ranking;
pub mod scorer;
pub mod softmax;
pub mod tally;
pub mod test_utils;
pub mod training;

pub use classifier::{Classifier, GLOBAL_CLASSES, LOCAL_CLASSES};
pub use error::{Result, ScoringError};
pub use features::{FeatureAssembler, FeatureContext, GLOBAL_FEATURE_COUNT, LOCAL_FEATURE_COUNT};
pub use outcome::{ProblemOutcome, Rejection};
pub use ranking::{NodeScore, Ranking, ScoredCandidate, Verdict};
pub use scorer::{global_pass, local_pass, EquationScorer, LocalPass, ScoringModels};
pub use softmax::SoftmaxRegression;
pub use tally::Tally;
pub use training::TrainingSet;
