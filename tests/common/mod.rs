#![allow(dead_code)]

use iris_serve::app::{AppInfo, AppState, StaticFiles};
use iris_serve::config::StaticFilesConfig;
use iris_serve::core::dataset::IrisDataset;
use iris_serve::{LocalStorage, ModelRegistry, Trainer, TrainingConfig};
use std::path::Path;
use tempfile::TempDir;

pub struct TestApp {
    pub state: AppState,
    pub models_dir: TempDir,
    pub static_dir: TempDir,
}

/// Trains both models into a temp dir, loads them back and sets up a UI dir.
pub async fn spawn_state() -> TestApp {
    let models_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(models_dir.path());
    Trainer::new(&storage, TrainingConfig::default())
        .run(&IrisDataset::load().unwrap())
        .await
        .unwrap();

    let registry = ModelRegistry::load(&storage, "logistic_model.json", "kmeans_model.json")
        .await
        .unwrap();

    let static_dir = TempDir::new().unwrap();
    write_ui(static_dir.path());

    let static_files = StaticFiles::new(&StaticFilesConfig {
        dir: static_dir.path().join("ui"),
        ..StaticFilesConfig::default()
    });

    TestApp {
        state: AppState::new(registry, static_files, AppInfo::current()),
        models_dir,
        static_dir,
    }
}

/// `<root>/ui/{index.html,app.js,css/site.css}` plus `<root>/secret.txt`
/// sitting just outside the served directory.
fn write_ui(root: &Path) {
    let ui = root.join("ui");
    std::fs::create_dir_all(ui.join("css")).unwrap();
    std::fs::write(ui.join("index.html"), "<!doctype html><title>iris</title>").unwrap();
    std::fs::write(ui.join("app.js"), "console.log('iris');").unwrap();
    std::fs::write(ui.join("css/site.css"), "body{}").unwrap();
    std::fs::write(root.join("secret.txt"), "do not serve").unwrap();
}
