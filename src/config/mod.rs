pub mod toml_config;

pub use toml_config::{LoggingConfig, ModelsConfig, ServerConfig, ServiceConfig, StaticFilesConfig};

use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags of the server. Every flag overrides the TOML file,
/// which in turn overrides the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "iris-serve")]
#[command(about = "Serve Iris logistic-regression and k-means classifiers over HTTP")]
pub struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding logistic_model.json and kmeans_model.json
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Directory served at / (index.html and assets)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServeArgs {
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.models_dir {
            config.models.dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_files.dir = dir.clone();
        }
        config.logging.json |= self.log_json;
        config.logging.verbose |= self.verbose;

        Ok(config)
    }
}
