//! Data access for eqrank.
//!
//! Everything the pipeline reads or writes outside of memory:
//! - The problem dataset and cross-validation folds
//! - Solver output files and the solver input file ([`ilp`])
//! - Parse and quantity caches ([`cache`])
//! - The NLP parse service client ([`nlp`])
//! - Text normalization and quantity extraction
//! - Feature files and per-fold results

pub mod cache;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod feature_files;
pub mod folds;
pub mod ilp;
pub mod loader;
pub mod nlp;
pub mod preprocess;
pub mod results;

pub use cache::{JsonStore, ParseStore, QuantityStore};
pub use dataset::{Dataset, DatasetRecord};
pub use error::{DataError, Result};
pub use extract::extract_quantities;
pub use feature_files::LocalExamples;
pub use ilp::IlpInputWriter;
pub use loader::ProblemLoader;
pub use nlp::{NlpClient, SentenceParser};
pub use preprocess::normalize_text;
