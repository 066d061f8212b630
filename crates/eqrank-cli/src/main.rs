//! eqrank - command line driver of the equation ranking pipeline
//!
//! # Usage
//!
//! ```bash
//! # Parse every problem through the NLP service
//! eqrank --config eqrank.toml parse
//!
//! # Cross-validation
//! eqrank split-folds
//! eqrank train-local --fold 0
//! eqrank train-global --fold 0
//! eqrank evaluate --fold 0
//!
//! # Accuracy over all folds
//! eqrank summarize
//! ```
//!
//! The ILP solver runs between `parse` and `train-local`; it reads the
//! solver input written by `parse` and leaves one output file per problem.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eqrank::{console, NlpClient, Pipeline};
use eqrank_config::EqRankConfig;
use eqrank_data::Dataset;

/// Configuration file used when `--config` is not given.
const DEFAULT_CONFIG: &str = "eqrank.toml";

/// Ranks candidate equations for arithmetic word problems
#[derive(Debug, Parser)]
#[command(name = "eqrank", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (TOML or YAML); built-in defaults when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse all problems, cache parses and quantities, write the solver input
    Parse {
        /// Overrides the configured parse service endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Shuffle the problems into cross-validation folds
    SplitFolds,

    /// Write local classifier training rows
    TrainLocal(FoldArgs),

    /// Fit the local classifier and write global classifier training rows
    TrainGlobal(FoldArgs),

    /// Score the problems of a fold and write its result
    Evaluate {
        #[command(flatten)]
        folds: FoldArgs,

        /// Fit both models again instead of loading saved ones
        #[arg(long)]
        refit: bool,
    },

    /// Sum the fold results and print the accuracy
    Summarize {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct FoldArgs {
    /// Fold to work on; every fold when omitted
    #[arg(short, long)]
    fold: Option<usize>,
}

impl FoldArgs {
    fn folds(&self, fold_count: usize) -> Vec<usize> {
        match self.fold {
            Some(fold) => vec![fold],
            None => (0..fold_count).collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    console::init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config = config.with_random_seed(seed);
    }
    let fold_count = config.data.fold_count;
    let pipeline = match cli.command {
        // results only; the dataset may live elsewhere
        Commands::Summarize { .. } => Pipeline::with_dataset(config, Dataset::default()),
        _ => Pipeline::new(config).context("loading the dataset")?,
    };

    match cli.command {
        Commands::Parse { endpoint } => {
            let mut nlp = pipeline.config().nlp.clone();
            if let Some(endpoint) = endpoint {
                nlp.endpoint = endpoint;
            }
            let client = NlpClient::new(&nlp)?;
            let report = pipeline
                .parse(&client)
                .with_context(|| format!("parsing through {}", client.endpoint()))?;
            println!("parsed {}, failed {}", report.parsed.len(), report.failed.len());
        }
        Commands::SplitFolds => {
            for path in pipeline.split_folds()? {
                println!("{}", path.display());
            }
        }
        Commands::TrainLocal(args) => {
            for fold in args.folds(fold_count) {
                let examples = pipeline
                    .train_local(fold)
                    .with_context(|| format!("local training data of fold {}", fold))?;
                println!("fold {}: {} local rows", fold, examples.len());
            }
        }
        Commands::TrainGlobal(args) => {
            for fold in args.folds(fold_count) {
                let set = pipeline
                    .train_global(fold)
                    .with_context(|| format!("global training data of fold {}", fold))?;
                println!("fold {}: {} global rows", fold, set.len());
            }
        }
        Commands::Evaluate { folds, refit } => {
            for fold in folds.folds(fold_count) {
                let evaluation = pipeline
                    .evaluate(fold, refit)
                    .with_context(|| format!("evaluating fold {}", fold))?;
                let tally = evaluation.tally;
                println!(
                    "fold {}: {} correct, {} incorrect, accuracy {:.2}%",
                    fold,
                    tally.correct,
                    tally.incorrect,
                    tally.accuracy_percent()
                );
            }
        }
        Commands::Summarize { json } => {
            let summary = pipeline.summarize()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} folds, {} of {} correct, accuracy {:.2}%",
                    summary.folds.len(),
                    summary.tally.correct,
                    summary.tally.counted(),
                    summary.accuracy
                );
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EqRankConfig> {
    match path {
        Some(path) => EqRankConfig::load(path)
            .with_context(|| format!("reading configuration {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).is_file() => EqRankConfig::load(DEFAULT_CONFIG)
            .with_context(|| format!("reading configuration {}", DEFAULT_CONFIG)),
        None => {
            tracing::debug!(event = "default_config");
            Ok(EqRankConfig::default())
        }
    }
}
