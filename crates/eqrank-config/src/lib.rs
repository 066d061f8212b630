//! Configuration system for eqrank.
//!
//! Load pipeline configuration from TOML or YAML files to control data
//! locations, the NLP endpoint, candidate filtering, the accuracy policy and
//! classifier training without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use eqrank_config::{EligibilityPolicy, EqRankConfig};
//!
//! let config = EqRankConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [data]
//!     ilp_dir = "ILP.out"
//!     max_candidates = 50
//!
//!     [scoring]
//!     require_order_match = false
//!     [scoring.eligibility]
//!     type = "up_to_problem_id"
//!     max_id = 278
//! "#).unwrap();
//!
//! assert_eq!(config.data.max_candidates, 50);
//! assert!(!config.scoring.require_order_match);
//! assert_eq!(config.scoring.eligibility, EligibilityPolicy::UpToProblemId { max_id: 278 });
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use eqrank_config::EqRankConfig;
//!
//! let config = EqRankConfig::load("eqrank.toml").unwrap_or_default();
//! assert_eq!(config.data.fold_count, 5);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EqRankConfig {
    /// Random seed for fold shuffling, SGD and training-equation choice.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// File locations.
    #[serde(default)]
    pub data: DataConfig,

    /// NLP parse service.
    #[serde(default)]
    pub nlp: NlpConfig,

    /// Candidate filtering and accuracy policy.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Classifier training.
    #[serde(default)]
    pub training: TrainingConfig,
}

impl EqRankConfig {
    /// Seed used when none is configured.
    pub const DEFAULT_SEED: u64 = 42;

    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML or YAML file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid content.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.fold_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "fold_count must be at least 2, got {}",
                self.data.fold_count
            )));
        }
        if self.data.max_candidates == 0 {
            return Err(ConfigError::Invalid("max_candidates must be positive".into()));
        }
        let rate = self.training.learning_rate;
        if rate.is_nan() || rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "learning_rate must be positive, got {}",
                self.training.learning_rate
            )));
        }
        if self.training.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive".into()));
        }
        Ok(())
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the eligibility policy.
    pub fn with_eligibility(mut self, policy: EligibilityPolicy) -> Self {
        self.scoring.eligibility = policy;
        self
    }

    /// Sets the NLP endpoint.
    pub fn with_nlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.nlp.endpoint = endpoint.into();
        self
    }

    /// Roots every relative data path at `dir`.
    pub fn with_data_root(mut self, dir: impl AsRef<Path>) -> Self {
        self.data = self.data.rooted_at(dir.as_ref());
        self
    }

    /// Returns the configured seed or [`Self::DEFAULT_SEED`].
    pub fn seed(&self) -> u64 {
        self.random_seed.unwrap_or(Self::DEFAULT_SEED)
    }
}

/// File locations of the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DataConfig {
    /// JSON dataset of `{ sQuestion, lSolutions }` records.
    pub dataset: PathBuf,
    /// Cached sentence parses, one `<id>.json` per problem.
    pub parse_dir: PathBuf,
    /// Cached quantity sets, one `<id>.json` per problem.
    pub quantity_dir: PathBuf,
    /// ILP solver output, one `q<id:03>.txt.out` per problem.
    pub ilp_dir: PathBuf,
    /// ILP solver input file written by the parse step.
    pub ilp_input: PathBuf,
    /// Fold index files.
    pub fold_dir: PathBuf,
    /// Feature and label files.
    pub feature_dir: PathBuf,
    /// Trained models.
    pub model_dir: PathBuf,
    /// Per-fold result tallies.
    pub results_dir: PathBuf,
    /// Number of cross-validation folds.
    pub fold_count: usize,
    /// Solver rows read per problem.
    pub max_candidates: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/problems.json"),
            parse_dir: PathBuf::from("s_data"),
            quantity_dir: PathBuf::from("madesets"),
            ilp_dir: PathBuf::from("ILP.out"),
            ilp_input: PathBuf::from("data/ILP.input"),
            fold_dir: PathBuf::from("data"),
            feature_dir: PathBuf::from("data"),
            model_dir: PathBuf::from("models"),
            results_dir: PathBuf::from("results"),
            fold_count: 5,
            max_candidates: 100,
        }
    }
}

impl DataConfig {
    fn rooted_at(self, dir: &Path) -> Self {
        let root = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
        Self {
            dataset: root(self.dataset),
            parse_dir: root(self.parse_dir),
            quantity_dir: root(self.quantity_dir),
            ilp_dir: root(self.ilp_dir),
            ilp_input: root(self.ilp_input),
            fold_dir: root(self.fold_dir),
            feature_dir: root(self.feature_dir),
            model_dir: root(self.model_dir),
            results_dir: root(self.results_dir),
            ..self
        }
    }
}

/// NLP parse service configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NlpConfig {
    /// JSON-RPC endpoint of the parse service.
    pub endpoint: String,
    /// Request timeout in seconds; no timeout when unset.
    pub timeout_seconds: Option<u64>,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            timeout_seconds: None,
        }
    }
}

impl NlpConfig {
    /// Returns the request timeout as a Duration, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Candidate filtering and accuracy policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Drop candidates whose operands are not in text-discovery order.
    pub require_order_match: bool,
    /// Whether rejected problems count as incorrect.
    pub eligibility: EligibilityPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            require_order_match: true,
            eligibility: EligibilityPolicy::Always,
        }
    }
}

/// Decides whether a problem rejected before scoring counts as incorrect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Every rejection counts as incorrect.
    #[default]
    Always,

    /// Rejections never count.
    Never,

    /// Only problems with an id up to `max_id` (inclusive) count.
    UpToProblemId { max_id: usize },
}

impl EligibilityPolicy {
    /// Returns true if a rejection of `problem_id` adds to the incorrect tally.
    ///
    /// # Examples
    ///
    /// ```
    /// use eqrank_config::EligibilityPolicy;
    ///
    /// let policy = EligibilityPolicy::UpToProblemId { max_id: 278 };
    /// assert!(policy.counts(278));
    /// assert!(!policy.counts(279));
    /// assert!(!EligibilityPolicy::Never.counts(0));
    /// ```
    pub fn counts(&self, problem_id: usize) -> bool {
        match self {
            EligibilityPolicy::Always => true,
            EligibilityPolicy::Never => false,
            EligibilityPolicy::UpToProblemId { max_id } => problem_id <= *max_id,
        }
    }
}

/// Softmax regression training parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TrainingConfig {
    /// Passes over the training rows.
    pub epochs: usize,
    /// SGD step size.
    pub learning_rate: f64,
    /// L2 penalty on the weights.
    pub l2: f64,
    /// Rows per gradient step.
    pub batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.1,
            l2: 1e-4,
            batch_size: 32,
        }
    }
}

#[cfg(test)]
mod tests;
