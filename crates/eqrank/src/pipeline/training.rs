//! Fold files and classifier training data.

use std::path::PathBuf;

use eqrank_core::{CandidateEquation, EqRankError, EquationTree, Label, Operator, Problem, QuantitySet};
use eqrank_data::feature_files::{global_paths, read_set, write_set};
use eqrank_data::{folds, LocalExamples};
use eqrank_scoring::{
    global_pass, FeatureAssembler, FeatureContext, ScoringError, SoftmaxRegression,
    TrainingSet, GLOBAL_CLASSES, LOCAL_CLASSES,
};
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::{ModelKind, Pipeline};
use crate::error::Result;

impl Pipeline {
    /// Shuffles the dataset ids with the configured seed and writes one index
    /// file per fold.
    pub fn split_folds(&self) -> Result<Vec<PathBuf>> {
        let data = &self.config.data;
        let split = folds::split_folds(self.dataset.len(), data.fold_count, self.config.seed());
        let paths = folds::write_folds(&data.fold_dir, &split)?;
        info!(
            event = "folds_written",
            folds = split.len(),
            problems = self.dataset.len(),
            dir = %data.fold_dir.display(),
        );
        Ok(paths)
    }

    /// Builds the local training rows of `fold` from every other fold.
    ///
    /// Only positive, order-matching candidates teach the local classifier.
    /// When a problem has simple ones (`... = x`) all of those are used,
    /// otherwise one positive is picked at random. Every arithmetic node of a
    /// used candidate yields one row labelled with its operator.
    pub fn train_local(&self, fold: usize) -> Result<LocalExamples> {
        self.check_fold(fold)?;
        let data = &self.config.data;
        let ids = folds::training_ids(&data.fold_dir, fold, data.fold_count)?;
        let assembler = FeatureAssembler::default();
        let mut rng = ChaCha8Rng::seed_from_u64(self.fold_seed(fold));
        let loader = self.loader();

        let mut examples = LocalExamples::new();
        for id in ids {
            let problem = match loader.load(id) {
                Ok(problem) => problem,
                Err(e) => {
                    warn!(event = "problem_skipped", problem_id = id, error = %e);
                    continue;
                }
            };
            let Ok(target) = problem.quantities.target() else {
                debug!(event = "problem_skipped", problem_id = id, reason = "no single unknown");
                continue;
            };
            let context = FeatureContext::new(&problem.parse, target);

            for candidate in local_training_candidates(&problem, &mut rng) {
                match node_rows(&assembler, candidate, &problem.quantities, &context) {
                    Ok(rows) => {
                        for (operator, row) in rows {
                            examples.push(operator, row)?;
                        }
                    }
                    Err(e) => {
                        warn!(
                            event = "candidate_skipped",
                            problem_id = id,
                            equation = %candidate,
                            error = %e,
                        );
                    }
                }
            }
        }

        examples.write(&data.feature_dir, fold)?;
        info!(
            event = "local_examples_written",
            fold,
            rows = examples.len(),
            dir = %data.feature_dir.display(),
        );
        Ok(examples)
    }

    /// Fits the local classifier from the local files of `fold` and saves it.
    pub fn fit_local(&self, fold: usize) -> Result<SoftmaxRegression> {
        self.check_fold(fold)?;
        let set = LocalExamples::read(&self.config.data.feature_dir, fold)?.into_training_set()?;
        let model = SoftmaxRegression::fit(&set, LOCAL_CLASSES, &self.config.training, self.fold_seed(fold))?;
        model.save(self.model_path(fold, ModelKind::Local))?;
        info!(event = "model_fitted", fold, model = "local", rows = set.len());
        Ok(model)
    }

    /// Fits the global classifier from the global files of `fold` and saves it.
    pub fn fit_global(&self, fold: usize) -> Result<SoftmaxRegression> {
        self.check_fold(fold)?;
        let (data_path, label_path) = global_paths(&self.config.data.feature_dir, fold);
        let set = read_set(&data_path, &label_path)?;
        let model = SoftmaxRegression::fit(&set, GLOBAL_CLASSES, &self.config.training, self.fold_seed(fold))?;
        model.save(self.model_path(fold, ModelKind::Global))?;
        info!(event = "model_fitted", fold, model = "global", rows = set.len());
        Ok(model)
    }

    /// Builds the global training rows of `fold` from every other fold.
    ///
    /// Fits the local classifier first. Each problem contributes all its
    /// positive candidates and as many negatives, taken in solver order,
    /// whether or not their operands follow the text order. A
    /// row is `[order, local_score, confidence]` followed by the local
    /// features of the equality's two sides, labelled `1` or `0`.
    pub fn train_global(&self, fold: usize) -> Result<TrainingSet> {
        let local = self.fit_local(fold)?;
        let data = &self.config.data;
        let ids = folds::training_ids(&data.fold_dir, fold, data.fold_count)?;
        let assembler = FeatureAssembler::default();
        let loader = self.loader();

        let mut set = TrainingSet::new();
        for id in ids {
            let problem = match loader.load(id) {
                Ok(problem) => problem,
                Err(e) => {
                    warn!(event = "problem_skipped", problem_id = id, error = %e);
                    continue;
                }
            };
            let Ok(target) = problem.quantities.target() else {
                debug!(event = "problem_skipped", problem_id = id, reason = "no single unknown");
                continue;
            };
            let context = FeatureContext::new(&problem.parse, target);

            for (candidate, label) in global_training_candidates(&problem) {
                match global_pass(&local, &assembler, candidate, &problem.quantities, &context) {
                    Ok((_, row)) => set.push(row, label.class_index())?,
                    Err(ScoringError::Core(e)) => {
                        warn!(
                            event = "candidate_skipped",
                            problem_id = id,
                            equation = %candidate,
                            error = %e,
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let (data_path, label_path) = global_paths(&data.feature_dir, fold);
        write_set(&data_path, &label_path, &set)?;
        let histogram = set.class_histogram(GLOBAL_CLASSES);
        info!(
            event = "global_examples_written",
            fold,
            positives = histogram[Label::Positive.class_index()],
            negatives = histogram[Label::Negative.class_index()],
        );
        Ok(set)
    }
}

// Every positive, then the leading negatives, up to as many as positives.
// Out-of-order candidates are kept.
fn global_training_candidates(problem: &Problem) -> Vec<(&CandidateEquation, Label)> {
    let positives: Vec<_> = problem
        .usable_candidates()
        .filter(|c| c.is_positive())
        .map(|c| (c, Label::Positive))
        .collect();
    let negatives = problem
        .usable_candidates()
        .filter(|c| !c.is_positive())
        .take(positives.len())
        .map(|c| (c, Label::Negative));
    positives.iter().copied().chain(negatives).collect()
}

fn local_training_candidates<'p>(problem: &'p Problem, rng: &mut ChaCha8Rng) -> Vec<&'p CandidateEquation> {
    let positives: Vec<&CandidateEquation> = problem
        .usable_candidates()
        .filter(|c| c.is_positive() && c.order_matches(&problem.quantities))
        .collect();
    let simple: Vec<&CandidateEquation> = positives.iter().copied().filter(|c| c.is_simple()).collect();
    if !simple.is_empty() {
        return simple;
    }
    positives.choose(rng).copied().into_iter().collect()
}

// One local row per arithmetic node, bottom-up.
fn node_rows(
    assembler: &FeatureAssembler,
    candidate: &CandidateEquation,
    quantities: &QuantitySet,
    context: &FeatureContext<'_>,
) -> std::result::Result<Vec<(Operator, Vec<f64>)>, EqRankError> {
    let tree = EquationTree::build(candidate.tokens(), quantities)?;
    let mut rows = Vec::with_capacity(tree.len().saturating_sub(1));
    tree.walk(quantities, |node, left, right| {
        if !node.is_equality() {
            rows.push((node.operator, assembler.local_vector(left, right, context)));
        }
        Ok::<(), EqRankError>(())
    })?;
    Ok(rows)
}
