pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use app::{build_router, AppState};
pub use config::{ServeArgs, ServiceConfig};
pub use crate::core::registry::ModelRegistry;
pub use crate::core::training::{Trainer, TrainingConfig, TrainingReport};
pub use utils::error::{Result, ServeError};
