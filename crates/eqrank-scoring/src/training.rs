//! Labelled feature rows used to fit a classifier.

use crate::error::{Result, ScoringError};

/// Feature rows with one class label each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    rows: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from parallel rows and labels.
    pub fn from_parts(rows: Vec<Vec<f64>>, labels: Vec<usize>) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(ScoringError::DimensionMismatch {
                expected: rows.len(),
                found: labels.len(),
            });
        }
        let mut set = Self::new();
        for (row, label) in rows.into_iter().zip(labels) {
            set.push(row, label)?;
        }
        Ok(set)
    }

    /// Appends one row; every row must have the width of the first.
    pub fn push(&mut self, row: Vec<f64>, label: usize) -> Result<()> {
        if let Some(width) = self.feature_count() {
            if row.len() != width {
                return Err(ScoringError::DimensionMismatch {
                    expected: width,
                    found: row.len(),
                });
            }
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::NonFinite("training row"));
        }
        self.rows.push(row);
        self.labels.push(label);
        Ok(())
    }

    /// Appends every row of `other`.
    pub fn extend(&mut self, other: TrainingSet) -> Result<()> {
        for (row, label) in other.rows.into_iter().zip(other.labels) {
            self.push(row, label)?;
        }
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the rows, `None` while empty.
    pub fn feature_count(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }

    /// Number of rows per class label.
    pub fn class_histogram(&self, classes: usize) -> Vec<usize> {
        let mut counts = vec![0; classes];
        for label in &self.labels {
            if let Some(count) = counts.get_mut(*label) {
                *count += 1;
            }
        }
        counts
    }
}
