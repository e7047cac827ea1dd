use std::path::{
    Path,
    PathBuf,
};

use reana_status_api::StatusError;
use thiserror::Error;

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::{
    StatusConfig,
    DEFAULT_CONFIG_TEMPLATE,
};

pub const CONFIG_PATH_ENV: &str = "REANA_STATUS_CONFIG_PATH";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/reana-status/config.toml";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

impl From<ConfigLoadError> for StatusError {
    fn from(err: ConfigLoadError) -> Self {
        StatusError::InvalidConfig(err.to_string())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return PathBuf::from(path);
        }

        let system_path = PathBuf::from(SYSTEM_CONFIG_PATH);
        if system_path.exists() {
            tracing::debug!("Using system config path: {}", system_path.display());
            return system_path;
        }

        let fallback = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reana-status")
            .join("config.toml");
        tracing::debug!("Using fallback config path: {}", fallback.display());
        fallback
    }

    /// Load the discovered config file, or the environment-driven defaults
    /// when there is none
    pub fn load_default() -> ConfigLoadResult<StatusConfig> {
        let path = Self::discover_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::parse(DEFAULT_CONFIG_TEMPLATE)
        }
    }

    pub fn load(path: &Path) -> ConfigLoadResult<StatusConfig> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ConfigLoadResult<StatusConfig> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: StatusConfig = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        config
            .validate()
            .map_err(|errors| ConfigLoadError::InvalidConfig(errors.join("; ")))?;

        tracing::debug!(
            backend = %config.database.backend,
            infrastructure_namespace = %config.kubernetes.infrastructure_namespace,
            runtime_namespace = %config.kubernetes.runtime_namespace,
            "Loaded config"
        );

        Ok(config)
    }
}
