use crate::domain::model::{Species, N_FEATURES};
use crate::utils::error::{Result, ServeError};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::io::Read;

const IRIS_CSV: &str = include_str!("../../data/iris.csv");

#[derive(Debug, Deserialize)]
struct IrisRow {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    species: String,
}

/// Feature matrix (`n × 4`) with one class id per row.
#[derive(Debug, Clone, PartialEq)]
pub struct IrisDataset {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}

impl IrisDataset {
    /// The bundled 150-sample dataset.
    pub fn load() -> Result<Self> {
        Self::from_reader(IRIS_CSV.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut values = Vec::new();
        let mut labels = Vec::new();

        for (line, row) in csv_reader.deserialize::<IrisRow>().enumerate() {
            let row = row?;
            let species = Species::from_name(&row.species).ok_or_else(|| {
                ServeError::training(format!(
                    "unknown species '{}' on data row {}",
                    row.species,
                    line + 1
                ))
            })?;

            values.extend_from_slice(&[
                row.sepal_length,
                row.sepal_width,
                row.petal_length,
                row.petal_width,
            ]);
            labels.push(species.index());
        }

        if labels.is_empty() {
            return Err(ServeError::training("dataset has no rows"));
        }

        let features = Array2::from_shape_vec((labels.len(), N_FEATURES), values)
            .map_err(|e| ServeError::training(format!("malformed dataset: {}", e)))?;

        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Splits into `(train, test)` keeping class proportions.
    ///
    /// Each class contributes `round(test_size × class_count)` samples to the
    /// test split, chosen by a seeded shuffle; the training split is shuffled
    /// once more so classes are interleaved.
    pub fn stratified_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(ServeError::training(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let n_classes = self.labels.iter().max().map_or(0, |m| m + 1);
        let mut train = Vec::new();
        let mut test = Vec::new();

        for class in 0..n_classes {
            let mut indices: Vec<usize> = (0..self.len()).filter(|&i| self.labels[i] == class).collect();
            indices.shuffle(&mut rng);

            let n_test = (test_size * indices.len() as f64).round() as usize;
            test.extend_from_slice(&indices[..n_test]);
            train.extend_from_slice(&indices[n_test..]);
        }

        train.shuffle(&mut rng);
        test.sort_unstable();

        tracing::debug!("Dataset split: {} training, {} test", train.len(), test.len());
        Ok((self.select(&train), self.select(&test)))
    }
}
