use crate::core::kmeans::KMeansPipeline;
use crate::core::mapping::ClusterMapping;
use crate::domain::model::FeatureVector;
use crate::domain::ports::{ArtifactStore, Classifier};
use crate::utils::error::{Result, ServeError};
use ndarray::{ArrayView1, Axis};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Serialized k-means pipeline plus its cluster → class mapping.
///
/// Artifacts from older trainers carry no `mapping`; they still load and
/// answer with raw cluster ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansArtifact {
    pub pipeline: KMeansPipeline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ClusterMapping>,
}

impl KMeansArtifact {
    pub fn new(pipeline: KMeansPipeline, mapping: ClusterMapping) -> Self {
        Self {
            pipeline,
            mapping: Some(mapping),
        }
    }

    pub fn legacy(pipeline: KMeansPipeline) -> Self {
        Self {
            pipeline,
            mapping: None,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.mapping.is_none()
    }

    pub fn predict_cluster(&self, features: &FeatureVector) -> Result<usize> {
        let row = ArrayView1::from(features.as_slice()).insert_axis(Axis(0));
        self.pipeline
            .predict(row)?
            .first()
            .copied()
            .ok_or_else(|| ServeError::inference("model returned no prediction"))
    }

    /// Translates a cluster id; unmapped ids pass through unchanged.
    pub fn class_for_cluster(&self, cluster: usize) -> usize {
        self.mapping
            .as_ref()
            .and_then(|m| m.get(&cluster).copied())
            .unwrap_or(cluster)
    }
}

impl Classifier for KMeansArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let cluster = self.predict_cluster(features)?;
        Ok(self.class_for_cluster(cluster))
    }
}

pub async fn save_artifact<T: Serialize>(
    store: &dyn ArtifactStore,
    name: &str,
    artifact: &T,
) -> Result<String> {
    let data = serde_json::to_vec_pretty(artifact)?;
    store.write_file(name, &data).await?;

    let location = store.describe(name);
    tracing::debug!("Wrote {} ({} bytes)", location, data.len());
    Ok(location)
}

pub async fn load_artifact<T: DeserializeOwned>(store: &dyn ArtifactStore, name: &str) -> Result<T> {
    let location = store.describe(name);

    let data = store
        .read_file(name)
        .await
        .map_err(|e| ServeError::ModelLoadError {
            path: location.clone(),
            message: e.to_string(),
        })?;

    serde_json::from_slice(&data).map_err(|e| ServeError::ModelLoadError {
        path: location,
        message: e.to_string(),
    })
}
