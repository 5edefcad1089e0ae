use crate::core::artifact::{load_artifact, KMeansArtifact};
use crate::core::logistic::LogisticPipeline;
use crate::domain::model::{FeatureVector, ModelType, Prediction};
use crate::domain::ports::{ArtifactStore, Classifier};
use crate::utils::error::{Result, ServeError};
use crate::utils::validation::Validate;

/// Both fitted pipelines, loaded once and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    logistic: LogisticPipeline,
    kmeans: KMeansArtifact,
}

impl ModelRegistry {
    pub fn new(logistic: LogisticPipeline, kmeans: KMeansArtifact) -> Self {
        if kmeans.is_legacy() {
            tracing::warn!(
                "k-means artifact has no cluster -> class mapping; raw cluster ids will be returned as class ids"
            );
        }
        Self { logistic, kmeans }
    }

    pub async fn load(store: &dyn ArtifactStore, logistic_file: &str, kmeans_file: &str) -> Result<Self> {
        tracing::info!("Loading logistic model from {}", store.describe(logistic_file));
        let logistic: LogisticPipeline = load_artifact(store, logistic_file).await?;
        check_artifact(store, logistic_file, &logistic)?;

        tracing::info!("Loading k-means model from {}", store.describe(kmeans_file));
        let kmeans: KMeansArtifact = load_artifact(store, kmeans_file).await?;
        check_artifact(store, kmeans_file, &kmeans.pipeline)?;

        Ok(Self::new(logistic, kmeans))
    }

    pub fn classifier(&self, model_type: ModelType) -> &dyn Classifier {
        match model_type {
            ModelType::Logreg => &self.logistic,
            ModelType::Kmeans => &self.kmeans,
        }
    }

    pub fn kmeans(&self) -> &KMeansArtifact {
        &self.kmeans
    }

    pub fn predict(&self, model_type: ModelType, features: &FeatureVector) -> Result<Prediction> {
        let class_id = self.classifier(model_type).predict(features)?;
        tracing::debug!("{} predicted class {} for {:?}", model_type, class_id, features.as_slice());
        Ok(Prediction::new(model_type, features, class_id))
    }
}

/// A deserialized artifact must have consistent shapes before it may serve.
fn check_artifact(store: &dyn ArtifactStore, name: &str, artifact: &dyn Validate) -> Result<()> {
    artifact.validate().map_err(|e| ServeError::ModelLoadError {
        path: store.describe(name),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::core::dataset::IrisDataset;
    use crate::core::training::{Trainer, TrainingConfig};
    use crate::utils::error::ServeError;

    fn registry() -> ModelRegistry {
        let store = LocalStorage::new("unused");
        let models = Trainer::new(&store, TrainingConfig::default())
            .fit(&IrisDataset::load().unwrap())
            .unwrap();
        ModelRegistry::new(models.logistic, models.kmeans)
    }

    #[test]
    fn test_logreg_predicts_species() {
        let registry = registry();

        let setosa = registry
            .predict(ModelType::Logreg, &FeatureVector::new([5.1, 3.5, 1.4, 0.2]))
            .unwrap();
        assert_eq!(setosa.prediction, 0);
        assert_eq!(setosa.label.as_deref(), Some("setosa"));

        let virginica = registry
            .predict(ModelType::Logreg, &FeatureVector::new([6.3, 3.3, 6.0, 2.5]))
            .unwrap();
        assert_eq!(virginica.prediction, 2);
        assert_eq!(virginica.label.as_deref(), Some("virginica"));
    }

    #[test]
    fn test_kmeans_returns_mapped_class() {
        let registry = registry();
        let features = FeatureVector::new([5.1, 3.5, 1.4, 0.2]);

        let cluster = registry.kmeans().predict_cluster(&features).unwrap();
        let expected = registry.kmeans().mapping.as_ref().unwrap()[&cluster];

        let prediction = registry.predict(ModelType::Kmeans, &features).unwrap();
        assert_eq!(prediction.prediction, expected);
        assert_eq!(prediction.prediction, 0);
    }

    #[tokio::test]
    async fn test_load_missing_artifact_names_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = LocalStorage::new(temp_dir.path());

        let err = ModelRegistry::load(&store, "logistic_model.json", "kmeans_model.json")
            .await
            .unwrap_err();
        match err {
            ServeError::ModelLoadError { path, .. } => assert!(path.ends_with("logistic_model.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
