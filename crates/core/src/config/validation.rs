//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_image_bytes` is 0 or exceeds 50MB
    /// - `bind_addr` is not a parseable socket address
    /// - `front_origin` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_image_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_image_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid {
                field: "max_image_bytes".into(),
                reason: "must not exceed 50MB".into(),
            });
        }

        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "bind_addr".into(),
                reason: "must be a socket address like 0.0.0.0:9000".into(),
            });
        }

        if self.front_origin.is_empty() {
            return Err(ConfigError::Invalid { field: "front_origin".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
