//! Training feature files.
//!
//! Rows are whitespace-separated floats, one row per line; labels sit one
//! per line in a companion file. Local rows are split by operator:
//! `<fold>.local.<op>.data` with `<fold>.local.<op>_label.data`. Global rows
//! use `<fold>.global.data` with `<fold>.global_label.data`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use eqrank_core::Operator;
use eqrank_scoring::TrainingSet;

use crate::error::{ensure_parent, read_file, DataError, Result};

/// Data and label paths of the local rows for `operator`.
pub fn local_paths(dir: &Path, fold: usize, operator: Operator) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}.local.{}.data", fold, operator.name())),
        dir.join(format!("{}.local.{}_label.data", fold, operator.name())),
    )
}

/// Data and label paths of the global rows.
pub fn global_paths(dir: &Path, fold: usize) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}.global.data", fold)),
        dir.join(format!("{}.global_label.data", fold)),
    )
}

/// Writes `set` as a data file and a label file.
pub fn write_set(data_path: &Path, label_path: &Path, set: &TrainingSet) -> Result<()> {
    let mut data = String::new();
    for row in set.rows() {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        let _ = writeln!(data, "{}", line.join(" "));
    }
    let mut labels = String::new();
    for label in set.labels() {
        let _ = writeln!(labels, "{}", label);
    }
    ensure_parent(data_path)?;
    ensure_parent(label_path)?;
    std::fs::write(data_path, data)?;
    std::fs::write(label_path, labels)?;
    Ok(())
}

/// Reads a data file and its label file.
///
/// Labels may be written as integers or as floats such as `1.0`.
pub fn read_set(data_path: &Path, label_path: &Path) -> Result<TrainingSet> {
    let rows = read_lines(data_path, |line| {
        line.split_whitespace()
            .map(|v| v.parse::<f64>().map_err(|e| e.to_string()))
            .collect::<std::result::Result<Vec<f64>, String>>()
    })?;
    let labels = read_lines(label_path, |line| {
        line.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as usize)
            .ok_or_else(|| format!("label {:?} is not a class index", line.trim()))
    })?;
    Ok(TrainingSet::from_parts(rows, labels)?)
}

fn read_lines<T>(
    path: &Path,
    parse: impl Fn(&str) -> std::result::Result<T, String>,
) -> Result<Vec<T>> {
    read_file(path)?
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse(line).map_err(|reason| DataError::MalformedFile {
                path: path.to_path_buf(),
                line: i + 1,
                reason,
            })
        })
        .collect()
}

/// Local rows grouped by the operator of their node.
#[derive(Debug, Clone, Default)]
pub struct LocalExamples {
    by_operator: [TrainingSet; 4],
}

impl LocalExamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the row of a node with `operator`; the label is its class.
    ///
    /// Equality nodes carry no local row and are ignored.
    pub fn push(&mut self, operator: Operator, row: Vec<f64>) -> Result<()> {
        if let Some(class) = operator.class_index() {
            self.by_operator[class].push(row, class)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_operator.iter().map(TrainingSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows of one operator.
    pub fn rows_for(&self, operator: Operator) -> Option<&TrainingSet> {
        operator.class_index().map(|c| &self.by_operator[c])
    }

    /// All rows in operator order.
    pub fn into_training_set(self) -> Result<TrainingSet> {
        let mut all = TrainingSet::new();
        for set in self.by_operator {
            all.extend(set)?;
        }
        Ok(all)
    }

    /// Writes the four per-operator file pairs of `fold`.
    pub fn write(&self, dir: &Path, fold: usize) -> Result<()> {
        for operator in Operator::ARITHMETIC {
            let (data, labels) = local_paths(dir, fold, operator);
            if let Some(set) = self.rows_for(operator) {
                write_set(&data, &labels, set)?;
            }
        }
        Ok(())
    }

    /// Reads the four per-operator file pairs of `fold`.
    pub fn read(dir: &Path, fold: usize) -> Result<Self> {
        let mut examples = Self::new();
        for operator in Operator::ARITHMETIC {
            let (data, labels) = local_paths(dir, fold, operator);
            let set = read_set(&data, &labels)?;
            for (row, _) in set.rows().iter().zip(set.labels()) {
                examples.push(operator, row.clone())?;
            }
        }
        Ok(examples)
    }
}
