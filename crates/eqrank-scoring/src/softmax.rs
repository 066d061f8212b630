//! Multinomial logistic regression trained with mini-batch SGD.
//!
//! Features are standardized with the training mean and standard deviation
//! before the linear layer. Row order within each epoch is shuffled with a
//! seeded [`ChaCha8Rng`], so a given seed always yields the same model.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use eqrank_config::TrainingConfig;
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::Classifier;
use crate::error::{Result, ScoringError};
use crate::training::TrainingSet;

/// Trained softmax regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxRegression {
    classes: usize,
    mean: Array1<f64>,
    scale: Array1<f64>,
    /// `classes x (features + 1)`; the last column is the bias.
    weights: Array2<f64>,
}

impl SoftmaxRegression {
    /// Fits a model over `classes` classes.
    ///
    /// # Errors
    ///
    /// `EmptyTrainingSet` without rows, `InvalidLabel` for a label outside
    /// `0..classes`.
    pub fn fit(set: &TrainingSet, classes: usize, config: &TrainingConfig, seed: u64) -> Result<Self> {
        let width = set.feature_count().ok_or(ScoringError::EmptyTrainingSet)?;
        if let Some(&label) = set.labels().iter().find(|l| **l >= classes) {
            return Err(ScoringError::InvalidLabel { label, classes });
        }

        let n = set.len();
        let flat: Vec<f64> = set.rows().concat();
        let found = flat.len();
        let x = Array2::from_shape_vec((n, width), flat).map_err(|_| ScoringError::DimensionMismatch {
            expected: n * width,
            found,
        })?;
        let mean = x.mean_axis(Axis(0)).ok_or(ScoringError::EmptyTrainingSet)?;
        // constant columns keep unit scale
        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|v| if v > 1e-12 { v.sqrt() } else { 1.0 });

        // standardized rows with a trailing bias column
        let mut design = Array2::<f64>::ones((n, width + 1));
        design
            .slice_mut(s![.., ..width])
            .assign(&((&x - &mean) / &scale));
        let mut targets = Array2::<f64>::zeros((n, classes));
        for (i, &label) in set.labels().iter().enumerate() {
            targets[[i, label]] = 1.0;
        }

        let mut model = Self {
            classes,
            mean,
            scale,
            weights: Array2::zeros((classes, width + 1)),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..n).collect();
        let batch_size = config.batch_size.max(1);

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let mut loss = 0.0;
            for batch in order.chunks(batch_size) {
                let xb = design.select(Axis(0), batch);
                let yb = targets.select(Axis(0), batch);
                let mut proba = xb.dot(&model.weights.t());
                softmax_rows(&mut proba);
                loss -= (&proba * &yb)
                    .sum_axis(Axis(1))
                    .mapv(|p| p.max(f64::MIN_POSITIVE).ln())
                    .sum();

                let mut gradient = (proba - &yb).t().dot(&xb) / batch.len() as f64;
                let mut penalty = &model.weights * config.l2;
                penalty.column_mut(width).fill(0.0);
                gradient += &penalty;
                model.sgd_step(&gradient, config.learning_rate);
            }
            if epoch + 1 == config.epochs {
                debug!(
                    event = "fit_done",
                    epochs = config.epochs,
                    rows = n,
                    mean_loss = loss / n as f64,
                );
            }
        }
        Ok(model)
    }

    /// Number of input features.
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Writes the model as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(dir) = path.as_ref().parent() {
            std::fs::create_dir_all(dir)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a model written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn sgd_step(&mut self, gradient: &Array2<f64>, learning_rate: f64) {
        self.weights = &self.weights - &(gradient * learning_rate);
    }

    fn logits(&self, standardized: ArrayView1<'_, f64>) -> Array1<f64> {
        let width = self.feature_count();
        self.weights.slice(s![.., ..width]).dot(&standardized) + self.weights.column(width)
    }
}

impl Classifier for SoftmaxRegression {
    fn class_count(&self) -> usize {
        self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.feature_count() {
            return Err(ScoringError::DimensionMismatch {
                expected: self.feature_count(),
                found: features.len(),
            });
        }
        let x = (&ArrayView1::from(features) - &self.mean) / &self.scale;
        let mut logits = self.logits(x.view()).insert_axis(Axis(0));
        softmax_rows(&mut logits);
        let proba = logits.into_raw_vec();
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(ScoringError::NonFinite("class probabilities"));
        }
        Ok(proba)
    }
}

fn softmax_rows(logits: &mut Array2<f64>) {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, z| m.max(*z));
        row.mapv_inplace(|z| (z - max).exp());
        let sum = row.sum();
        row /= sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrainingConfig {
        TrainingConfig {
            epochs: 400,
            learning_rate: 0.5,
            l2: 0.0,
            batch_size: 8,
        }
    }

    fn clusters() -> TrainingSet {
        let centers = [(-3.0, 0.0), (3.0, 0.0), (0.0, 4.0)];
        let mut set = TrainingSet::new();
        for (class, (cx, cy)) in centers.iter().enumerate() {
            for i in 0..10 {
                let jitter = (i as f64 - 4.5) * 0.1;
                set.push(vec![cx + jitter, cy - jitter, 1.0], class).unwrap();
            }
        }
        set
    }

    #[test]
    fn test_learns_separable_clusters() {
        let set = clusters();
        let model = SoftmaxRegression::fit(&set, 3, &config(), 7).unwrap();
        assert_eq!(model.class_count(), 3);
        for (row, label) in set.rows().iter().zip(set.labels()) {
            let proba = model.predict_proba(row).unwrap();
            let best = proba
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(best, *label);
            assert!(proba[*label] > 0.8, "{proba:?}");
            assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let set = clusters();
        let a = SoftmaxRegression::fit(&set, 3, &config(), 11).unwrap();
        let b = SoftmaxRegression::fit(&set, 3, &config(), 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_input() {
        let config = config();
        assert!(matches!(
            SoftmaxRegression::fit(&TrainingSet::new(), 2, &config, 0),
            Err(ScoringError::EmptyTrainingSet)
        ));
        let set = TrainingSet::from_parts(vec![vec![1.0]], vec![3]).unwrap();
        assert!(matches!(
            SoftmaxRegression::fit(&set, 2, &config, 0),
            Err(ScoringError::InvalidLabel { label: 3, classes: 2 })
        ));

        let model = SoftmaxRegression::fit(&clusters(), 3, &config, 0).unwrap();
        assert!(matches!(
            model.predict_proba(&[1.0]),
            Err(ScoringError::DimensionMismatch { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("local.json");
        let model = SoftmaxRegression::fit(&clusters(), 3, &config(), 3).unwrap();
        model.save(&path).unwrap();
        let loaded = SoftmaxRegression::load(&path).unwrap();
        let before = model.predict_proba(&[3.0, 0.0, 1.0]).unwrap();
        let after = loaded.predict_proba(&[3.0, 0.0, 1.0]).unwrap();
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
