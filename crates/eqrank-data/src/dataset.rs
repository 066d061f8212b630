//! The problem dataset: a JSON array of `{ "sQuestion", "lSolutions" }`.
//!
//! A problem's id is its index in the array.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{read_file, DataError, Result};

/// One dataset entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(rename = "sQuestion")]
    pub question: String,
    #[serde(rename = "lSolutions", default)]
    pub solutions: Vec<Value>,
}

impl DatasetRecord {
    /// The first solution as text, e.g. `17.5`.
    pub fn reference_answer(&self) -> Option<String> {
        self.solutions.first().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// All problems of a dataset file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<DatasetRecord>,
}

impl Dataset {
    /// Loads a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(Self {
            records: serde_json::from_str(s)?,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the problem with the given id.
    pub fn get(&self, id: usize) -> Result<&DatasetRecord> {
        self.records.get(id).ok_or(DataError::UnknownProblem(id))
    }

    /// `(id, record)` pairs in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DatasetRecord)> {
        self.records.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqrank_test::problems::SAMPLE_DATASET;

    #[test]
    fn test_load_sample() {
        let dataset = Dataset::from_json_str(SAMPLE_DATASET).unwrap();
        assert_eq!(dataset.len(), 2);
        let first = dataset.get(0).unwrap();
        assert!(first.question.starts_with("Tom had 70 seashells."));
        assert_eq!(first.reference_answer().as_deref(), Some("17.5"));
        assert_eq!(dataset.get(1).unwrap().reference_answer().as_deref(), Some("8"));
        assert!(matches!(dataset.get(2), Err(DataError::UnknownProblem(2))));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = Dataset::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
