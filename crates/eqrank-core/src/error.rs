//! Error types for eqrank

use thiserror::Error;

/// Main error type for quantity and equation handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EqRankError {
    /// Equation tokens could not be reduced to a binary tree.
    #[error("Malformed equation: {0}")]
    MalformedEquation(String),

    /// An operand token does not name any quantity of the problem.
    #[error("Unknown operand: {0}")]
    UnknownOperand(String),

    /// A token was expected to be an operator.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Two quantities share the same key.
    #[error("Duplicate quantity key: {0}")]
    DuplicateQuantity(String),

    /// No quantity carries the unknown marker.
    #[error("No solve target in quantity set")]
    NoSolveTarget,

    /// More than one quantity carries the unknown marker.
    #[error("Multiple solve targets in quantity set: {0}")]
    MultipleSolveTargets(usize),

    /// Numeric text could not be parsed.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

/// Result type alias for eqrank core operations
pub type Result<T> = std::result::Result<T, EqRankError>;
