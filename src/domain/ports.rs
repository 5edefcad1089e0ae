use crate::domain::model::FeatureVector;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where model artifacts live. The trainer writes through it, the server reads.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Human-readable location of `path`, used in logs and error messages.
    fn describe(&self, path: &str) -> String {
        path.to_string()
    }
}

/// A fitted pipeline that maps one measurement to a class id.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<usize>;
}
