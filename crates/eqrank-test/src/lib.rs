//! Shared test fixtures for eqrank crates.
//!
//! This crate provides sample data and pure helper functions for testing.
//! It does NOT depend on `eqrank-scoring` to avoid circular dependencies;
//! stub classifiers live in `eqrank_scoring::test_utils`.
//!
//! - [`quantities`] - quantity set builders
//! - [`problems`] - complete sample problems with parses and candidates
//! - [`ilp`] - solver output text in the `q<id>.txt.out` layout
//! - [`net`] - endpoints for network client tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! eqrank-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use eqrank_test::problems::percent_problem;
//! use eqrank_test::quantities::quantity_set;
//! ```

pub mod ilp;
pub mod net;
pub mod problems;
pub mod quantities;

pub use problems::{percent_problem, sum_problem};
pub use quantities::quantity_set;
