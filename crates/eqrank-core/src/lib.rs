//! eqrank Core - quantities, candidate equations and expression trees
//!
//! This crate provides the fundamental abstractions for eqrank:
//! - Quantity types for numbers and the unknown mentioned in a problem
//! - Candidate equations proposed by the ILP solver
//! - Expression tree reconstruction and value combination
//! - The sentence parse model shared with the NLP collaborator
//! - The problem record tying text, parse, quantities and candidates together

pub mod combine;
pub mod equation;
pub mod error;
pub mod operator;
pub mod parse;
pub mod problem;
pub mod quantity;
pub mod tree;

pub use combine::combine;
pub use equation::{CandidateEquation, Label};
pub use error::{EqRankError, Result};
pub use operator::Operator;
pub use parse::{Dependency, ParseResult, Sentence, Word};
pub use problem::Problem;
pub use quantity::{Position, Quantity, QuantitySet, QuantityValue, UNKNOWN_MARKER};
pub use tree::{EquationTree, NodeId, OperandRef, OperationNode};
