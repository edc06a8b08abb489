//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SOUQ_*)
//! 2. TOML config file (if SOUQ_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SOUQ_*)
/// 2. TOML config file (if SOUQ_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite catalog database.
    ///
    /// Set via SOUQ_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory holding content-addressed image blobs and `default.jpg`.
    ///
    /// Set via SOUQ_IMAGE_DIR environment variable.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Socket address the HTTP server binds to.
    ///
    /// Set via SOUQ_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Front-end origin allowed by CORS.
    ///
    /// Set via SOUQ_FRONT_ORIGIN environment variable.
    #[serde(default = "default_front_origin")]
    pub front_origin: String,

    /// Maximum accepted size of an uploaded image, in bytes.
    ///
    /// Set via SOUQ_MAX_IMAGE_BYTES environment variable.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./souq.sqlite")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("./images")
}

fn default_bind_addr() -> String {
    "0.0.0.0:9000".into()
}

fn default_front_origin() -> String {
    "http://localhost:3000".into()
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            image_dir: default_image_dir(),
            bind_addr: default_bind_addr(),
            front_origin: default_front_origin(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SOUQ_`
    /// 2. TOML file from `SOUQ_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SOUQ_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SOUQ_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
