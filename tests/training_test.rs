use iris_serve::core::artifact::{load_artifact, KMeansArtifact};
use iris_serve::core::dataset::IrisDataset;
use iris_serve::core::{FeatureVector, ModelType};
use iris_serve::domain::ports::ArtifactStore;
use iris_serve::{LocalStorage, ModelRegistry, Trainer, TrainingConfig};
use tempfile::TempDir;

#[tokio::test]
async fn test_training_writes_loadable_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().join("models"));

    let report = Trainer::new(&storage, TrainingConfig::default())
        .run(&IrisDataset::load().unwrap())
        .await
        .unwrap();

    assert!(report.logistic_path.ends_with("logistic_model.json"));
    assert!(report.kmeans_path.ends_with("kmeans_model.json"));
    assert_eq!(report.mapping.len(), 3);

    let artifact: KMeansArtifact = load_artifact(&storage, "kmeans_model.json").await.unwrap();
    assert_eq!(artifact.mapping.as_ref(), Some(&report.mapping));
}

#[tokio::test]
async fn test_training_is_deterministic() {
    let dataset = IrisDataset::load().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let a = Trainer::new(&LocalStorage::new(first.path()), TrainingConfig::default())
        .run(&dataset)
        .await
        .unwrap();
    let b = Trainer::new(&LocalStorage::new(second.path()), TrainingConfig::default())
        .run(&dataset)
        .await
        .unwrap();

    assert_eq!(a.mapping, b.mapping);
    assert_eq!(a.logreg_test_accuracy, b.logreg_test_accuracy);
    assert_eq!(
        std::fs::read(first.path().join("logistic_model.json")).unwrap(),
        std::fs::read(second.path().join("logistic_model.json")).unwrap()
    );
}

#[tokio::test]
async fn test_legacy_kmeans_artifact_returns_raw_cluster_ids() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    Trainer::new(&storage, TrainingConfig::default())
        .run(&IrisDataset::load().unwrap())
        .await
        .unwrap();

    // strip the mapping, as an older trainer would have written it
    let raw = storage.read_file("kmeans_model.json").await.unwrap();
    let mut value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    value.as_object_mut().unwrap().remove("mapping");
    storage
        .write_file("kmeans_model.json", &serde_json::to_vec(&value).unwrap())
        .await
        .unwrap();

    let registry = ModelRegistry::load(&storage, "logistic_model.json", "kmeans_model.json")
        .await
        .unwrap();
    assert!(registry.kmeans().is_legacy());

    for features in [[5.1, 3.5, 1.4, 0.2], [6.0, 2.9, 4.5, 1.5], [6.3, 3.3, 6.0, 2.5]] {
        let features = FeatureVector::new(features);
        let cluster = registry.kmeans().predict_cluster(&features).unwrap();
        let prediction = registry.predict(ModelType::Kmeans, &features).unwrap();
        assert_eq!(prediction.prediction, cluster);
    }
}

#[tokio::test]
async fn test_corrupt_artifact_is_model_load_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    storage.write_file("logistic_model.json", b"{\"scaler\": 1}").await.unwrap();

    let err = ModelRegistry::load(&storage, "logistic_model.json", "kmeans_model.json")
        .await
        .unwrap_err();
    assert!(matches!(err, iris_serve::ServeError::ModelLoadError { .. }));
}

async fn rewrite_artifact(storage: &LocalStorage, name: &str, pointer: &str, replacement: serde_json::Value) {
    let raw = storage.read_file(name).await.unwrap();
    let mut value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    *value.pointer_mut(pointer).unwrap() = replacement;
    storage
        .write_file(name, &serde_json::to_vec(&value).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_artifacts_with_inconsistent_shapes_are_rejected_at_load() {
    let cases = [
        (
            "logistic_model.json",
            "/scaler/std",
            serde_json::json!({"v": 1, "dim": [2], "data": [1.0, 1.0]}),
        ),
        (
            "kmeans_model.json",
            "/pipeline/scaler/mean",
            serde_json::json!({"v": 1, "dim": [3], "data": [0.0, 0.0, 0.0]}),
        ),
    ];

    for (name, pointer, replacement) in cases {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        Trainer::new(&storage, TrainingConfig::default())
            .run(&IrisDataset::load().unwrap())
            .await
            .unwrap();

        rewrite_artifact(&storage, name, pointer, replacement).await;

        let err = ModelRegistry::load(&storage, "logistic_model.json", "kmeans_model.json")
            .await
            .unwrap_err();
        match err {
            iris_serve::ServeError::ModelLoadError { path, message } => {
                assert!(path.ends_with(name), "{} for {}", path, name);
                assert!(message.contains("expected 4"), "{}", message);
            }
            other => panic!("unexpected error for {}: {}", name, other),
        }
    }
}
