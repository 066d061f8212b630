//! Probabilistic classifier contract.
//!
//! The local classifier predicts the operator class of one node
//! (`+ - * /` as classes `0..4`); the global classifier predicts whether a
//! whole equation is correct (`0` negative, `1` positive).

use crate::error::{Result, ScoringError};

/// Number of local (operator) classes.
pub const LOCAL_CLASSES: usize = 4;

/// Number of global (negative/positive) classes.
pub const GLOBAL_CLASSES: usize = 2;

/// A trained model mapping a feature vector to class probabilities.
///
/// Prediction takes `&self` and has no side effects, so one model can score
/// any number of candidates.
pub trait Classifier {
    /// Number of classes in the returned probability vector.
    fn class_count(&self) -> usize;

    /// Returns one probability per class.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Probability of a single class.
    fn class_probability(&self, features: &[f64], class: usize) -> Result<f64> {
        let proba = self.predict_proba(features)?;
        proba.get(class).copied().ok_or(ScoringError::ClassCount {
            expected: class + 1,
            found: proba.len(),
        })
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn class_count(&self) -> usize {
        (**self).class_count()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        (**self).predict_proba(features)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn class_count(&self) -> usize {
        (**self).class_count()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        (**self).predict_proba(features)
    }
}

/// Checks that `classifier` reports `expected` classes.
pub fn expect_classes<C: Classifier + ?Sized>(classifier: &C, expected: usize) -> Result<()> {
    let found = classifier.class_count();
    if found != expected {
        return Err(ScoringError::ClassCount { expected, found });
    }
    Ok(())
}
