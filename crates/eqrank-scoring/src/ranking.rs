//! Ordering of scored candidates and the per-problem verdict.

use std::cmp::Ordering;
use std::fmt;

use eqrank_core::{Label, Operator};
use serde::{Deserialize, Serialize};

/// Probability assigned to one arithmetic node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    /// Synthetic key of the node, e.g. `(70*0.25)`.
    pub label: String,
    pub operator: Operator,
    pub probability: f64,
}

/// A candidate with its ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// `local_score * global_score`.
    pub score: f64,
    /// Product of the node probabilities.
    pub local_score: f64,
    /// Positive-class probability of the global classifier.
    pub global_score: f64,
    pub label: Option<Label>,
    /// Normalized equation text.
    pub equation: String,
    pub proposed_answer: String,
    pub nodes: Vec<NodeScore>,
}

impl ScoredCandidate {
    pub fn is_positive(&self) -> bool {
        self.label.is_some_and(|l| l.is_positive())
    }
}

// Descending score; ties put positive labels first, then the larger
// equation text.
fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.label.cmp(&a.label))
        .then_with(|| b.equation.cmp(&a.equation))
}

/// Result of comparing the winner with the reference labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The top candidate is labelled positive.
    Correct,
    /// A positive candidate exists but did not win.
    WrongWinner,
    /// No surviving candidate is labelled positive.
    NoGroundTruth,
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "CORRECT"),
            Verdict::WrongWinner => write!(f, "INCORRECT"),
            Verdict::NoGroundTruth => write!(f, "INCORRECT (no correct candidate)"),
        }
    }
}

/// Scored candidates of one problem, best first.
///
/// # Example
///
/// ```
/// use eqrank_core::Label;
/// use eqrank_scoring::{Ranking, ScoredCandidate, Verdict};
///
/// let scored = |score: f64, label: Label, equation: &str| ScoredCandidate {
///     score,
///     local_score: score,
///     global_score: 1.0,
///     label: Some(label),
///     equation: equation.to_string(),
///     proposed_answer: String::new(),
///     nodes: Vec::new(),
/// };
/// let ranking = Ranking::new(vec![
///     scored(0.4, Label::Positive, "5 + 3 = x"),
///     scored(0.9, Label::Negative, "5 - 3 = x"),
/// ]);
/// assert_eq!(ranking.winner().unwrap().equation, "5 - 3 = x");
/// assert_eq!(ranking.verdict(), Verdict::WrongWinner);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    candidates: Vec<ScoredCandidate>,
}

impl Ranking {
    /// Sorts `candidates` best first.
    pub fn new(mut candidates: Vec<ScoredCandidate>) -> Self {
        candidates.sort_by(rank_order);
        Self { candidates }
    }

    pub fn candidates(&self) -> &[ScoredCandidate] {
        &self.candidates
    }

    pub fn winner(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }

    /// Best-ranked positive candidate.
    pub fn best_positive(&self) -> Option<&ScoredCandidate> {
        self.candidates.iter().find(|c| c.is_positive())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Correct when the winner is positive; without any positive candidate
    /// the problem is incorrect whatever the order.
    pub fn verdict(&self) -> Verdict {
        if self.best_positive().is_none() {
            return Verdict::NoGroundTruth;
        }
        match self.winner() {
            Some(winner) if winner.is_positive() => Verdict::Correct,
            _ => Verdict::WrongWinner,
        }
    }
}
