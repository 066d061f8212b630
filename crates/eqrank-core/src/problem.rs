//! One word problem with everything the scorer needs.

use serde::{Deserialize, Serialize};

use crate::equation::CandidateEquation;
use crate::parse::ParseResult;
use crate::quantity::QuantitySet;

/// A word problem: text, parse, quantities and solver candidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Index in the dataset.
    pub id: usize,
    /// Normalized problem text.
    pub text: String,
    /// Reference answer, when known.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub parse: ParseResult,
    #[serde(default)]
    pub quantities: QuantitySet,
    #[serde(default)]
    pub candidates: Vec<CandidateEquation>,
}

impl Problem {
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_parse(mut self, parse: ParseResult) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_quantities(mut self, quantities: QuantitySet) -> Self {
        self.quantities = quantities;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateEquation>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Candidates that name every quantity exactly once.
    pub fn usable_candidates(&self) -> impl Iterator<Item = &CandidateEquation> {
        self.candidates
            .iter()
            .filter(|c| c.references_exactly(&self.quantities))
    }
}
