//! Arithmetic operators appearing in candidate equations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EqRankError;

/// Operator joining two operands of an equation.
///
/// The four arithmetic operators double as the class labels of the local
/// classifier, in the order returned by [`Operator::class_index`].
///
/// # Example
///
/// ```
/// use eqrank_core::Operator;
///
/// let op: Operator = "*".parse().unwrap();
/// assert_eq!(op, Operator::Mul);
/// assert_eq!(op.class_index(), Some(2));
/// assert_eq!(Operator::Eq.class_index(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
}

impl Operator {
    /// Arithmetic operators in class-index order.
    pub const ARITHMETIC: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    /// Returns the symbol as it appears in equation text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Eq => "=",
        }
    }

    /// Returns a filesystem-safe name, used for per-operator feature files.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::Eq => "eq",
        }
    }

    /// Local classifier class for arithmetic operators.
    pub fn class_index(&self) -> Option<usize> {
        match self {
            Operator::Add => Some(0),
            Operator::Sub => Some(1),
            Operator::Mul => Some(2),
            Operator::Div => Some(3),
            Operator::Eq => None,
        }
    }

    /// Inverse of [`Operator::class_index`].
    pub fn from_class_index(index: usize) -> Option<Operator> {
        Self::ARITHMETIC.get(index).copied()
    }

    pub fn is_arithmetic(&self) -> bool {
        !matches!(self, Operator::Eq)
    }

    /// True when swapping the operands cannot change the result.
    pub fn is_commutative(&self) -> bool {
        matches!(self, Operator::Add | Operator::Mul | Operator::Eq)
    }

    /// Returns true if `token` is an operator or a parenthesis.
    pub fn is_structural_token(token: &str) -> bool {
        matches!(token, "(" | ")") || token.parse::<Operator>().is_ok()
    }
}

impl FromStr for Operator {
    type Err = EqRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            "=" => Ok(Operator::Eq),
            other => Err(EqRankError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
