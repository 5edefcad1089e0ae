use crate::core::artifact::{save_artifact, KMeansArtifact};
use crate::core::dataset::IrisDataset;
use crate::core::kmeans::{ClusteringParams, KMeansPipeline};
use crate::core::logistic::{accuracy, LogisticParams, LogisticPipeline};
use crate::core::mapping::{cluster_to_class, ClusterMapping};
use crate::domain::ports::ArtifactStore;
use crate::utils::error::{Result, ServeError};
use crate::utils::validation::{validate_positive_number, Validate};
use serde::Serialize;

pub const DEFAULT_LOGISTIC_FILE: &str = "logistic_model.json";
pub const DEFAULT_KMEANS_FILE: &str = "kmeans_model.json";

const N_CLUSTERS: usize = 3;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub test_size: f64,
    pub seed: u64,
    pub n_init: usize,
    pub max_iter: usize,
    /// Inverse L2 regularization strength of the logistic regression.
    pub c: f64,
    pub logistic_file: String,
    pub kmeans_file: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            n_init: 10,
            max_iter: 1000,
            c: 1.0,
            logistic_file: DEFAULT_LOGISTIC_FILE.to_string(),
            kmeans_file: DEFAULT_KMEANS_FILE.to_string(),
        }
    }
}

impl Validate for TrainingConfig {
    fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ServeError::InvalidConfigValueError {
                field: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "Value must be strictly between 0 and 1".to_string(),
            });
        }
        if self.c <= 0.0 {
            return Err(ServeError::InvalidConfigValueError {
                field: "c".to_string(),
                value: self.c.to_string(),
                reason: "Value must be positive".to_string(),
            });
        }
        validate_positive_number("n_init", self.n_init, 1)?;
        validate_positive_number("max_iter", self.max_iter, 1)?;
        crate::utils::validation::validate_non_empty_string("logistic_file", &self.logistic_file)?;
        crate::utils::validation::validate_non_empty_string("kmeans_file", &self.kmeans_file)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub logreg_train_accuracy: f64,
    pub logreg_test_accuracy: f64,
    pub kmeans_test_accuracy: f64,
    pub mapping: ClusterMapping,
    pub logistic_path: String,
    pub kmeans_path: String,
}

/// Fitted models, before they are written anywhere.
#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub logistic: LogisticPipeline,
    pub kmeans: KMeansArtifact,
    pub logreg_train_accuracy: f64,
    pub logreg_test_accuracy: f64,
    pub kmeans_test_accuracy: f64,
}

pub struct Trainer<'a> {
    store: &'a dyn ArtifactStore,
    config: TrainingConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(store: &'a dyn ArtifactStore, config: TrainingConfig) -> Self {
        Self { store, config }
    }

    /// Fits both pipelines on `dataset` without persisting them.
    pub fn fit(&self, dataset: &IrisDataset) -> Result<TrainedModels> {
        self.config.validate()?;
        let (train, test) = dataset.stratified_split(self.config.test_size, self.config.seed)?;

        let logistic = LogisticPipeline::fit(
            train.features.view(),
            &train.labels,
            &LogisticParams {
                c: self.config.c,
                max_iter: self.config.max_iter as u64,
                ..LogisticParams::default()
            },
        )?;
        let logreg_train_accuracy = logistic.score(train.features.view(), &train.labels)?;
        let logreg_test_accuracy = logistic.score(test.features.view(), &test.labels)?;
        tracing::info!(
            "LogReg accuracy train={:.3} test={:.3}",
            logreg_train_accuracy,
            logreg_test_accuracy
        );

        let kmeans = KMeansPipeline::fit(
            train.features.view(),
            &ClusteringParams {
                n_clusters: N_CLUSTERS,
                n_init: self.config.n_init,
                random_state: self.config.seed,
                ..ClusteringParams::default()
            },
        )?;
        let clusters_train = kmeans.predict(train.features.view())?;

        let mapping = cluster_to_class(&clusters_train, &train.labels, N_CLUSTERS);
        tracing::info!("Cluster -> class mapping: {:?}", mapping);

        let kmeans = KMeansArtifact::new(kmeans, mapping);
        let mapped_test: Vec<usize> = kmeans
            .pipeline
            .predict(test.features.view())?
            .into_iter()
            .map(|cluster| kmeans.class_for_cluster(cluster))
            .collect();
        let kmeans_test_accuracy = accuracy(&mapped_test, &test.labels);
        tracing::info!("KMeans(mapped) accuracy test={:.3}", kmeans_test_accuracy);

        Ok(TrainedModels {
            logistic,
            kmeans,
            logreg_train_accuracy,
            logreg_test_accuracy,
            kmeans_test_accuracy,
        })
    }

    /// Fits both pipelines and writes the artifacts to the store.
    pub async fn run(&self, dataset: &IrisDataset) -> Result<TrainingReport> {
        let models = self.fit(dataset)?;

        let logistic_path =
            save_artifact(self.store, &self.config.logistic_file, &models.logistic).await?;
        let kmeans_path = save_artifact(self.store, &self.config.kmeans_file, &models.kmeans).await?;
        tracing::info!("Saved models to {} and {}", logistic_path, kmeans_path);

        Ok(TrainingReport {
            logreg_train_accuracy: models.logreg_train_accuracy,
            logreg_test_accuracy: models.logreg_test_accuracy,
            kmeans_test_accuracy: models.kmeans_test_accuracy,
            mapping: models.kmeans.mapping.clone().unwrap_or_default(),
            logistic_path,
            kmeans_path,
        })
    }
}
