//! Accuracy bookkeeping over many problems.

use std::iter::Sum;
use std::ops::AddAssign;

use eqrank_config::EligibilityPolicy;
use serde::{Deserialize, Serialize};

use crate::outcome::ProblemOutcome;
use crate::ranking::Verdict;

/// Running counts of problem outcomes.
///
/// `correct` and `incorrect` feed the accuracy. Rejected and failed problems
/// are always counted in their own fields and add to `incorrect` only when
/// the eligibility policy says so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
    /// Scored problems without any positive candidate; also in `incorrect`.
    pub no_ground_truth: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use eqrank_config::EligibilityPolicy;
    /// use eqrank_scoring::{ProblemOutcome, Rejection, Tally};
    ///
    /// let policy = EligibilityPolicy::UpToProblemId { max_id: 278 };
    /// let mut tally = Tally::new();
    /// tally.record(12, &ProblemOutcome::Rejected(Rejection::NoSolveTarget), policy);
    /// tally.record(300, &ProblemOutcome::Rejected(Rejection::NoSolveTarget), policy);
    /// assert_eq!(tally.rejected, 2);
    /// assert_eq!(tally.incorrect, 1);
    /// ```
    pub fn record(&mut self, problem_id: usize, outcome: &ProblemOutcome, policy: EligibilityPolicy) {
        match outcome {
            ProblemOutcome::Scored(ranking) => match ranking.verdict() {
                Verdict::Correct => self.correct += 1,
                Verdict::WrongWinner => self.incorrect += 1,
                Verdict::NoGroundTruth => {
                    self.incorrect += 1;
                    self.no_ground_truth += 1;
                }
            },
            ProblemOutcome::Rejected(_) => {
                self.rejected += 1;
                if policy.counts(problem_id) {
                    self.incorrect += 1;
                }
            }
            ProblemOutcome::Failed(_) => {
                self.failed += 1;
                if policy.counts(problem_id) {
                    self.incorrect += 1;
                }
            }
        }
    }

    /// Problems that count toward the accuracy.
    pub fn counted(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `correct / (correct + incorrect)`, `None` before anything was counted.
    pub fn accuracy(&self) -> Option<f64> {
        match self.counted() {
            0 => None,
            n => Some(self.correct as f64 / n as f64),
        }
    }

    /// Accuracy in percent, `0` when nothing was counted.
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy().unwrap_or(0.0) * 100.0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.correct += other.correct;
        self.incorrect += other.incorrect;
        self.no_ground_truth += other.no_ground_truth;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }
}

impl Sum for Tally {
    fn sum<I: Iterator<Item = Tally>>(iter: I) -> Self {
        iter.fold(Tally::new(), |mut acc, t| {
            acc += t;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Rejection;
    use crate::ranking::{Ranking, ScoredCandidate};
    use eqrank_core::Label;

    fn ranked(labels: &[(f64, Label)]) -> ProblemOutcome {
        ProblemOutcome::Scored(Ranking::new(
            labels
                .iter()
                .enumerate()
                .map(|(i, (score, label))| ScoredCandidate {
                    score: *score,
                    local_score: *score,
                    global_score: 1.0,
                    label: Some(*label),
                    equation: format!("eq{}", i),
                    proposed_answer: String::new(),
                    nodes: Vec::new(),
                })
                .collect(),
        ))
    }

    #[test]
    fn test_scored_outcomes_always_count() {
        let mut tally = Tally::new();
        let never = EligibilityPolicy::Never;
        tally.record(1, &ranked(&[(0.9, Label::Positive), (0.4, Label::Negative)]), never);
        tally.record(2, &ranked(&[(0.9, Label::Negative), (0.4, Label::Positive)]), never);
        tally.record(3, &ranked(&[(0.9, Label::Negative)]), never);
        assert_eq!(tally.correct, 1);
        assert_eq!(tally.incorrect, 2);
        assert_eq!(tally.no_ground_truth, 1);
        assert_eq!(tally.accuracy(), Some(1.0 / 3.0));
    }

    #[test]
    fn test_policy_gates_rejections_and_failures() {
        let rejected = ProblemOutcome::Rejected(Rejection::CandidateSetEmpty);
        let failed = ProblemOutcome::Failed("connection refused".into());

        let mut always = Tally::new();
        always.record(500, &rejected, EligibilityPolicy::Always);
        always.record(501, &failed, EligibilityPolicy::Always);
        assert_eq!((always.incorrect, always.rejected, always.failed), (2, 1, 1));

        let mut never = Tally::new();
        never.record(0, &rejected, EligibilityPolicy::Never);
        never.record(0, &failed, EligibilityPolicy::Never);
        assert_eq!((never.incorrect, never.rejected, never.failed), (0, 1, 1));
        assert_eq!(never.accuracy(), None);
        assert_eq!(never.accuracy_percent(), 0.0);
    }

    #[test]
    fn test_sum_folds() {
        let a = Tally {
            correct: 3,
            incorrect: 1,
            ..Tally::default()
        };
        let b = Tally {
            correct: 1,
            incorrect: 3,
            rejected: 2,
            ..Tally::default()
        };
        let total: Tally = [a, b].into_iter().sum();
        assert_eq!(total.correct, 4);
        assert_eq!(total.incorrect, 4);
        assert_eq!(total.rejected, 2);
        assert_eq!(total.accuracy_percent(), 50.0);
    }
}
