use crate::core::training::{DEFAULT_KMEANS_FILE, DEFAULT_LOGISTIC_FILE};
use crate::utils::error::{Result, ServeError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX_CACHE_CONTROL: &str = "no-cache";
pub const DEFAULT_ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub static_files: StaticFilesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: PathBuf,
    pub logistic_file: String,
    pub kmeans_file: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            logistic_file: DEFAULT_LOGISTIC_FILE.to_string(),
            kmeans_file: DEFAULT_KMEANS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub dir: PathBuf,
    pub index_cache_control: String,
    pub asset_cache_control: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("ui"),
            index_cache_control: DEFAULT_INDEX_CACHE_CONTROL.to_string(),
            asset_cache_control: DEFAULT_ASSET_CACHE_CONTROL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub verbose: bool,
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ServeError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ServeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PORT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ServeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e| ServeError::InvalidConfigValueError {
            field: "server.host".to_string(),
            value: addr.clone(),
            reason: format!("not a valid socket address: {}", e),
        })
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        self.bind_addr()?;

        validate_path("models.dir", &self.models.dir.to_string_lossy())?;
        validate_non_empty_string("models.logistic_file", &self.models.logistic_file)?;
        validate_non_empty_string("models.kmeans_file", &self.models.kmeans_file)?;

        validate_path("static_files.dir", &self.static_files.dir.to_string_lossy())?;
        validate_non_empty_string(
            "static_files.index_cache_control",
            &self.static_files.index_cache_control,
        )?;
        validate_non_empty_string(
            "static_files.asset_cache_control",
            &self.static_files.asset_cache_control,
        )?;

        Ok(())
    }
}
