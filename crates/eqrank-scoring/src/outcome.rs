//! Per-problem results.

use eqrank_core::EqRankError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::{Ranking, Verdict};

/// Why a problem was not scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("no quantity marks the unknown")]
    NoSolveTarget,

    #[error("{0} quantities mark the unknown")]
    MultipleSolveTargets(usize),

    #[error("no candidate names exactly the problem's quantities")]
    CandidateSetEmpty,
}

impl Rejection {
    /// Maps a solve-target error of the quantity set.
    pub fn from_target_error(error: &EqRankError) -> Option<Self> {
        match error {
            EqRankError::NoSolveTarget => Some(Rejection::NoSolveTarget),
            EqRankError::MultipleSolveTargets(n) => Some(Rejection::MultipleSolveTargets(*n)),
            _ => None,
        }
    }
}

/// What happened to one problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemOutcome {
    /// Candidates were scored and ranked.
    Scored(Ranking),
    /// Intake refused the problem.
    Rejected(Rejection),
    /// A collaborator (parser, solver output, classifier) failed.
    Failed(String),
}

impl ProblemOutcome {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            ProblemOutcome::Scored(ranking) => Some(ranking.verdict()),
            _ => None,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.verdict().is_some_and(|v| v.is_correct())
    }

    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            ProblemOutcome::Scored(ranking) => Some(ranking),
            _ => None,
        }
    }

    /// Short form for logs.
    pub fn describe(&self) -> String {
        match self {
            ProblemOutcome::Scored(ranking) => ranking.verdict().to_string(),
            ProblemOutcome::Rejected(rejection) => format!("INCORRECT ({})", rejection),
            ProblemOutcome::Failed(reason) => format!("FAILED ({})", reason),
        }
    }
}
