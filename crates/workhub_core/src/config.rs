//! Portal configuration: record backend plus logging settings.
//!
//! Values come from an optional JSON file and are then overridden by
//! `WORKHUB_*` environment variables. A configured API URL selects the
//! HTTP record service; otherwise the local SQLite record store is used.

use crate::adapter::portal_schemas;
use crate::db::DbError;
use crate::logging::default_log_level;
use crate::record::{HttpRecordClient, LocalRecordStore, RecordClient, TransportError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const ENV_API_URL: &str = "WORKHUB_API_URL";
pub const ENV_API_KEY: &str = "WORKHUB_API_KEY";
pub const ENV_DB_PATH: &str = "WORKHUB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "WORKHUB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WORKHUB_LOG_DIR";

const DEFAULT_DB_FILE: &str = "workhub.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("failed to open local record store: {0}")]
    LocalStore(#[from] DbError),
    #[error("failed to build record service client: {0}")]
    Remote(#[from] TransportError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// SQLite-backed record store; `None` uses a file in the temp directory.
    Local {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        db_path: Option<PathBuf>,
    },
    Remote {
        base_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Local { db_path: None }
    }
}

impl BackendConfig {
    /// Opens the configured record client.
    pub fn connect(&self) -> Result<Arc<dyn RecordClient>, ConfigError> {
        match self {
            Self::Local { db_path } => {
                let path = db_path.clone().unwrap_or_else(default_db_path);
                Ok(Arc::new(LocalRecordStore::open(path, portal_schemas())?))
            }
            Self::Remote { base_url, api_key } => {
                if base_url.trim().is_empty() {
                    return Err(ConfigError::Empty("base_url"));
                }
                Ok(Arc::new(HttpRecordClient::new(
                    base_url.as_str(),
                    api_key.clone(),
                )?))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Local { db_path } => format!(
                "local:{}",
                db_path.clone().unwrap_or_else(default_db_path).display()
            ),
            Self::Remote { base_url, .. } => format!("remote:{base_url}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub backend: BackendConfig,
    pub log_level: String,
    /// Rolling log files go here; stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PortalConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File values (when `path` is given) overridden by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = read(ENV_API_URL) {
            let api_key = match &self.backend {
                BackendConfig::Remote { api_key, .. } => api_key.clone(),
                BackendConfig::Local { .. } => None,
            };
            self.backend = BackendConfig::Remote { base_url, api_key };
        }
        if let Some(key) = read(ENV_API_KEY) {
            if let BackendConfig::Remote { api_key, .. } = &mut self.backend {
                *api_key = Some(key);
            }
        }
        if let Some(path) = read(ENV_DB_PATH) {
            if let BackendConfig::Local { db_path } = &mut self.backend {
                *db_path = Some(PathBuf::from(path));
            }
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }
}

pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE)
}
