//! K-Means clustering behind a standard scaler.
//!
//! `linfa-clustering` runs k-means++ seeding and Lloyd iterations,
//! restarted `n_init` times; the run with the lowest inertia is kept.

use crate::core::scaler::StandardScaler;
use crate::domain::model::N_FEATURES;
use crate::utils::error::{Result, ServeError};
use crate::utils::validation::Validate;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2, ArrayView2};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringParams {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iter: u64,
    /// Convergence threshold on the centroid shift.
    pub tol: f64,
    pub random_state: u64,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            random_state: 42,
        }
    }
}

/// `StandardScaler` followed by fitted k-means centroids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansPipeline {
    pub scaler: StandardScaler,
    pub kmeans: KMeans<f64, L2Dist>,
}

impl KMeansPipeline {
    pub fn fit(x: ArrayView2<f64>, params: &ClusteringParams) -> Result<Self> {
        if params.n_clusters == 0 {
            return Err(ServeError::training("n_clusters must be at least 1"));
        }
        if x.nrows() < params.n_clusters {
            return Err(ServeError::training(format!(
                "need at least {} samples, got {}",
                params.n_clusters,
                x.nrows()
            )));
        }

        let mut scaler = StandardScaler::new();
        let dataset = DatasetBase::from(scaler.fit_transform(x)?);
        let rng = Xoshiro256Plus::seed_from_u64(params.random_state);

        let kmeans = KMeans::params_with_rng(params.n_clusters, rng)
            .n_runs(params.n_init.max(1))
            .max_n_iterations(params.max_iter)
            .tolerance(params.tol)
            .fit(&dataset)
            .map_err(|e| ServeError::training(format!("k-means: {}", e)))?;

        tracing::debug!("k-means fitted: inertia {:.4}", kmeans.inertia());
        Ok(Self { scaler, kmeans })
    }

    pub fn n_clusters(&self) -> usize {
        self.kmeans.centroids().nrows()
    }

    pub fn centroids(&self) -> &Array2<f64> {
        self.kmeans.centroids()
    }

    /// Cluster ids for each row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        let scaled = self.scaler.transform(x)?;
        let clusters: Array1<usize> = self.kmeans.predict(&scaled);
        Ok(clusters.to_vec())
    }
}

impl Validate for KMeansPipeline {
    fn validate(&self) -> Result<()> {
        self.scaler.check_shape(N_FEATURES)?;

        let centroids = self.kmeans.centroids();
        if centroids.nrows() == 0 {
            return Err(ServeError::validation("k-means has no centroids"));
        }
        if centroids.ncols() != N_FEATURES {
            return Err(ServeError::validation(format!(
                "centroids have {} features, expected {}",
                centroids.ncols(),
                N_FEATURES
            )));
        }
        Ok(())
    }
}
