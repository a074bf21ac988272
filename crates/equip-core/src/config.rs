//! Application configuration.
//!
//! ```toml
//! data_dir = "/var/lib/equipment"
//! max_upload_bytes = 10485760
//!
//! [auth.tokens]
//! "9f2c61d0" = "alice"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use equip_model::UserId;

use crate::scope::StaticTokenProvider;

/// File name looked up inside the data directory when no config path is given.
pub const CONFIG_FILE_NAME: &str = "equipment.toml";

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A token maps to a blank user id. The token itself is not reported.
    #[error("auth token #{position} maps to an empty user id")]
    InvalidTokenUser { position: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Bearer token to user id.
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Snapshot directory; history is in-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`; the file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        tracing::info!(
            path = %path.display(),
            tokens = config.auth.tokens.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content, path)?;
                tracing::info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Token table from `[auth.tokens]`.
    pub fn token_provider(&self) -> Result<StaticTokenProvider, ConfigError> {
        let mut provider = StaticTokenProvider::new();
        for (position, (token, user)) in self.auth.tokens.iter().enumerate() {
            let user_id = UserId::new(user.as_str())
                .map_err(|_| ConfigError::InvalidTokenUser { position: position + 1 })?;
            provider.insert(token.as_str(), user_id);
        }
        Ok(provider)
    }
}
