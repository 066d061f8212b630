//! Stub classifiers for tests.
//!
//! These return scripted probabilities so scorer tests can pin
//! exact scores without training a model.

use crate::classifier::Classifier;
use crate::error::Result;

/// Returns the same probabilities for every input.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedClassifier {
    proba: Vec<f64>,
}

impl FixedClassifier {
    pub fn new(proba: Vec<f64>) -> Self {
        Self { proba }
    }

    /// Equal probability for each of `classes` classes.
    pub fn uniform(classes: usize) -> Self {
        Self::new(vec![1.0 / classes as f64; classes])
    }
}

impl Classifier for FixedClassifier {
    fn class_count(&self) -> usize {
        self.proba.len()
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>> {
        Ok(self.proba.clone())
    }
}

/// Computes probabilities with a closure over the feature vector.
pub struct FnClassifier<F> {
    classes: usize,
    f: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>>,
{
    pub fn new(classes: usize, f: F) -> Self {
        Self { classes, f }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&[f64]) -> Result<Vec<f64>>,
{
    fn class_count(&self) -> usize {
        self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        (self.f)(features)
    }
}
