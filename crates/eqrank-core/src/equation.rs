//! Candidate equations proposed by the ILP solver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::Operator;
use crate::quantity::QuantitySet;

/// Ground-truth indicator attached to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    /// Maps the solver's `1`/`0` flag.
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Label::Positive)
    }

    /// Class index of the global classifier (`0` negative, `1` positive).
    pub fn class_index(&self) -> usize {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

/// Inserts spaces around every operator and parenthesis, then collapses runs
/// of whitespace.
///
/// # Example
///
/// ```
/// use eqrank_core::equation::normalize_equation;
///
/// assert_eq!(normalize_equation("(3+x)*2=70"), "( 3 + x ) * 2 = 70");
/// ```
pub fn normalize_equation(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() * 2);
    for c in raw.chars() {
        if matches!(c, '(' | ')' | '+' | '-' | '*' | '/' | '=') {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Converts the solver's objective count into a confidence weight.
///
/// `1` when the count is zero, otherwise `1 / (count + 1)`.
pub fn solver_confidence(count: i64) -> f64 {
    if count == 0 {
        1.0
    } else {
        1.0 / (count as f64 + 1.0)
    }
}

/// One solver-proposed formula for a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEquation {
    tokens: Vec<String>,
    label: Option<Label>,
    solver_confidence: f64,
    proposed_answer: String,
    rank: usize,
}

impl CandidateEquation {
    /// Creates a candidate from raw equation text, normalizing operator spacing.
    pub fn parse(raw: &str) -> Self {
        let tokens = normalize_equation(raw)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            tokens,
            label: None,
            solver_confidence: 1.0,
            proposed_answer: String::new(),
            rank: 0,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.solver_confidence = confidence;
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.proposed_answer = answer.into();
        self
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    pub fn is_positive(&self) -> bool {
        self.label.is_some_and(|l| l.is_positive())
    }

    pub fn solver_confidence(&self) -> f64 {
        self.solver_confidence
    }

    pub fn proposed_answer(&self) -> &str {
        &self.proposed_answer
    }

    /// Row index in the solver output.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Space-joined token text.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    /// Operand tokens in order of appearance.
    pub fn operand_keys(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !Operator::is_structural_token(t))
            .collect()
    }

    /// True when the operands name every quantity of `set` exactly once.
    pub fn references_exactly(&self, set: &QuantitySet) -> bool {
        set.matches_operands(&self.operand_keys())
    }

    /// Order-match flag: operands appear in text-discovery order.
    pub fn order_matches(&self, set: &QuantitySet) -> bool {
        set.matches_order(&self.operand_keys())
    }

    /// True when the right-hand side is a single operand (`... = x`).
    pub fn is_simple(&self) -> bool {
        let n = self.tokens.len();
        n >= 2 && self.tokens[n - 2] == "="
    }
}

impl fmt::Display for CandidateEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_equation("x=(70*0.25)"), "x = ( 70 * 0.25 )");
        assert_eq!(normalize_equation("  ( 3 +x)  "), "( 3 + x )");
    }

    #[test]
    fn test_confidence() {
        assert_eq!(solver_confidence(0), 1.0);
        assert_eq!(solver_confidence(1), 0.5);
        assert_eq!(solver_confidence(3), 0.25);
    }

    #[test]
    fn test_operands() {
        let eq = CandidateEquation::parse("(3+x)*2=70");
        assert_eq!(eq.operand_keys(), vec!["3", "x", "2", "70"]);
        assert!(!eq.is_simple());
        assert!(CandidateEquation::parse("70*0.25=x").is_simple());
    }

    #[test]
    fn test_reference_and_order() {
        let set = QuantitySet::new(vec![
            Quantity::number("70", 0).unwrap(),
            Quantity::number("0.25", 0).unwrap(),
            Quantity::unknown(1),
        ])
        .unwrap();
        let ordered = CandidateEquation::parse("70*0.25=x");
        let swapped = CandidateEquation::parse("0.25*70=x");
        let missing = CandidateEquation::parse("70=x");
        assert!(ordered.references_exactly(&set));
        assert!(ordered.order_matches(&set));
        assert!(swapped.references_exactly(&set));
        assert!(!swapped.order_matches(&set));
        assert!(!missing.references_exactly(&set));
    }

    #[test]
    fn test_label_ordering() {
        assert!(Label::Positive > Label::Negative);
        assert_eq!(Label::from_flag(true).class_index(), 1);
    }
}
