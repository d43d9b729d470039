//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default photo upload limit (25 MiB)
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 25 * 1024 * 1024;

/// HTTP listener settings
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
            port: 8000,
        }
    }
}

/// Photo bucket and blob-store call settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket holding photo objects
    pub bucket: String,

    /// Base of the public photo URLs
    pub public_base_url: String,

    /// Upper bound on a single blob-store phase (upload or delete)
    pub operation_timeout_secs: u64,

    /// How many times a photo-list commit is attempted under concurrent writes
    pub max_commit_attempts: u32,

    /// Largest accepted photo upload request body, in bytes
    pub max_photo_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: "car-finder-dev-photos".to_string(),
            public_base_url: "https://storage.googleapis.com".to_string(),
            operation_timeout_secs: 30,
            max_commit_attempts: 5,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

/// Record store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; in-memory storage is used when absent
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

/// Runtime knobs of the photo attachment manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSettings {
    pub operation_timeout: Duration,
    pub max_commit_attempts: u32,
    pub max_photo_bytes: usize,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        StorageConfig::default().photo_settings()
    }
}

impl StorageConfig {
    pub fn photo_settings(&self) -> PhotoSettings {
        PhotoSettings {
            operation_timeout: Duration::from_secs(self.operation_timeout_secs),
            max_commit_attempts: self.max_commit_attempts,
            max_photo_bytes: self.max_photo_bytes,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// File (if any), then process environment, then validation
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    ///
    /// Recognised variables: `DATABASE_URL`, `SERVER_HOST`, `SERVER_PORT`,
    /// `PHOTO_BUCKET`, `PHOTO_PUBLIC_BASE_URL`, `RUST_LOG`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SERVER_PORT".to_string(),
                value: port.clone(),
                message: "expected a port number".to_string(),
            })?;
        }
        if let Some(bucket) = lookup("PHOTO_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(base) = lookup("PHOTO_PUBLIC_BASE_URL") {
            self.storage.public_base_url = base;
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.operation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.operation_timeout_secs".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.storage.max_commit_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.max_commit_attempts".to_string(),
                value: "0".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        if self.storage.max_photo_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "storage.max_photo_bytes".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.bucket".to_string(),
                value: self.storage.bucket.clone(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// `host:port` to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Public URL prefix for objects in the configured bucket
    pub fn bucket_url(&self) -> String {
        format!(
            "{}/{}",
            self.storage.public_base_url.trim_end_matches('/'),
            self.storage.bucket
        )
    }
}
