pub mod artifact;
pub mod dataset;
pub mod kmeans;
pub mod logistic;
pub mod mapping;
pub mod registry;
pub mod scaler;
pub mod training;

pub use crate::domain::model::{FeatureVector, ModelType, Prediction};
pub use crate::domain::ports::{ArtifactStore, Classifier};
pub use crate::utils::error::Result;
