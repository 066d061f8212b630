//! Evaluation of one fold.

use eqrank_data::{folds, results};
use eqrank_scoring::{EquationScorer, ProblemOutcome, ScoringModels, SoftmaxRegression, Tally};
use tracing::info;

use super::{ModelKind, Pipeline};
use crate::error::Result;

/// Outcomes of one evaluated fold.
#[derive(Debug, Clone)]
pub struct FoldEvaluation {
    pub fold: usize,
    pub tally: Tally,
    /// `(problem id, outcome)` in fold order.
    pub outcomes: Vec<(usize, ProblemOutcome)>,
}

impl Pipeline {
    /// Returns the two models of `fold`.
    ///
    /// Saved models are reused unless `refit` is set; a missing model is
    /// fitted from its feature files.
    pub fn models(&self, fold: usize, refit: bool) -> Result<ScoringModels<SoftmaxRegression, SoftmaxRegression>> {
        let local_path = self.model_path(fold, ModelKind::Local);
        let local = if !refit && local_path.is_file() {
            SoftmaxRegression::load(&local_path)?
        } else {
            self.fit_local(fold)?
        };
        let global_path = self.model_path(fold, ModelKind::Global);
        let global = if !refit && global_path.is_file() {
            SoftmaxRegression::load(&global_path)?
        } else {
            self.fit_global(fold)?
        };
        Ok(ScoringModels::new(local, global)?)
    }

    /// Scores every problem of `fold` and writes the fold's tally.
    ///
    /// A problem that cannot be loaded is recorded as failed; the eligibility
    /// policy decides whether rejections and failures count as incorrect.
    pub fn evaluate(&self, fold: usize, refit: bool) -> Result<FoldEvaluation> {
        self.check_fold(fold)?;
        let data = &self.config.data;
        let ids = folds::read_fold(&data.fold_dir, fold)?;
        let models = self.models(fold, refit)?;
        let scorer = EquationScorer::from_config(&models, &self.config.scoring);
        let policy = self.config.scoring.eligibility;
        let loader = self.loader();

        let mut tally = Tally::new();
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            let outcome = match loader.load(id) {
                Ok(problem) => scorer.score_problem(&problem),
                Err(e) => ProblemOutcome::Failed(e.to_string()),
            };
            info!(
                event = "problem_evaluated",
                problem_id = id,
                correct = outcome.is_correct(),
                outcome = %outcome.describe(),
            );
            tally.record(id, &outcome, policy);
            outcomes.push((id, outcome));
        }

        results::write_tally(&data.results_dir, fold, &tally)?;
        info!(
            event = "fold_evaluated",
            fold,
            correct = tally.correct,
            incorrect = tally.incorrect,
            rejected = tally.rejected,
            failed = tally.failed,
            accuracy = tally.accuracy_percent(),
        );
        Ok(FoldEvaluation { fold, tally, outcomes })
    }
}
