//! Multinomial logistic regression behind a standard scaler.
//!
//! The fit itself is done by `linfa-logistic`; this module wires the scaler
//! in front of it and adapts the fitted model to the [`Classifier`] port.

use crate::core::scaler::StandardScaler;
use crate::domain::model::{FeatureVector, N_FEATURES};
use crate::domain::ports::Classifier;
use crate::utils::error::{Result, ServeError};
use crate::utils::validation::Validate;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Solver settings for [`LogisticPipeline::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticParams {
    /// Inverse regularization strength; the L2 penalty is `1 / c`.
    pub c: f64,
    pub max_iter: u64,
    pub gradient_tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            gradient_tolerance: 1e-4,
        }
    }
}

/// `StandardScaler` followed by a fitted multinomial logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticPipeline {
    pub scaler: StandardScaler,
    pub classifier: MultiFittedLogisticRegression<f64, usize>,
}

impl LogisticPipeline {
    /// Fits on `x` (`n_samples × n_features`) with class ids in `y`.
    pub fn fit(x: ArrayView2<f64>, y: &[usize], params: &LogisticParams) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ServeError::training(format!(
                "number of samples in X ({}) and y ({}) must match",
                x.nrows(),
                y.len()
            )));
        }
        if params.c <= 0.0 {
            return Err(ServeError::training("C must be positive"));
        }

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(x)?;
        let dataset = Dataset::new(scaled, Array1::from(y.to_vec()));

        let classifier = MultiLogisticRegression::default()
            .alpha(1.0 / params.c)
            .max_iterations(params.max_iter)
            .gradient_tolerance(params.gradient_tolerance)
            .fit(&dataset)
            .map_err(|e| ServeError::training(format!("logistic regression: {}", e)))?;

        tracing::debug!(
            "Logistic regression fitted: {} samples, {} classes",
            y.len(),
            classifier.params().ncols()
        );

        Ok(Self { scaler, classifier })
    }

    pub fn n_classes(&self) -> usize {
        self.classifier.params().ncols()
    }

    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let scaled = self.scaler.transform(x)?;
        Ok(self.classifier.predict_probabilities(&scaled))
    }

    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let scaled = self.scaler.transform(x)?;
        let predictions: Array1<usize> = self.classifier.predict(&scaled);
        Ok(predictions.to_vec())
    }

    /// Mean accuracy on `x` against `y`.
    pub fn score(&self, x: ArrayView2<f64>, y: &[usize]) -> Result<f64> {
        let predictions = self.predict_batch(x)?;
        Ok(accuracy(&predictions, y))
    }
}

impl Validate for LogisticPipeline {
    fn validate(&self) -> Result<()> {
        self.scaler.check_shape(N_FEATURES)?;

        let weights = self.classifier.params();
        let intercept = self.classifier.intercept();
        if weights.nrows() != N_FEATURES {
            return Err(ServeError::validation(format!(
                "weights have {} rows, expected {}",
                weights.nrows(),
                N_FEATURES
            )));
        }
        if intercept.len() != weights.ncols() {
            return Err(ServeError::validation(format!(
                "intercept has {} entries for {} classes",
                intercept.len(),
                weights.ncols()
            )));
        }
        Ok(())
    }
}

impl Classifier for LogisticPipeline {
    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let row = ArrayView1::from(features.as_slice());
        let scaled = self.scaler.transform_row(row)?.insert_axis(Axis(0));
        let predictions: Array1<usize> = self.classifier.predict(&scaled);
        predictions
            .first()
            .copied()
            .ok_or_else(|| ServeError::inference("model returned no prediction"))
    }
}

pub fn accuracy(predictions: &[usize], labels: &[usize]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(p, y)| p == y)
        .count();
    correct as f64 / labels.len() as f64
}
