use crate::utils::error::{Result, ServeError};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Standardizes features to zero mean and unit variance.
///
/// Uses the population standard deviation. Constant features get a
/// deviation of 1.0 so they pass through centered but unscaled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some() && self.std.is_some()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(ServeError::training("cannot fit scaler on zero samples"));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ServeError::training("cannot compute feature means"))?;
        let std = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = self.params(x.ncols())?;
        Ok((&x - mean) / std)
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>> {
        let (mean, std) = self.params(row.len())?;
        Ok((&row - mean) / std)
    }

    /// Checks a deserialized scaler: fitted, with `n_features` means and
    /// deviations.
    pub fn check_shape(&self, n_features: usize) -> Result<()> {
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) if mean.len() == n_features && std.len() == n_features => Ok(()),
            (Some(mean), Some(std)) => Err(ServeError::validation(format!(
                "scaler has {} means and {} deviations, expected {}",
                mean.len(),
                std.len(),
                n_features
            ))),
            _ => Err(ServeError::validation("scaler is not fitted")),
        }
    }

    fn params(&self, n_features: usize) -> Result<(&Array1<f64>, &Array1<f64>)> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return Err(ServeError::inference("scaler is not fitted")),
        };

        if mean.len() != n_features || std.len() != n_features {
            return Err(ServeError::inference(format!(
                "feature count mismatch: expected {}, got {}",
                mean.len(),
                n_features
            )));
        }

        Ok((mean, std))
    }
}
