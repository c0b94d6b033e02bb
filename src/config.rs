//! Settings for the management client and logging.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (an explicit path, or `<config dir>/logicapps/config.toml`)
//! 3. environment variables
//!
//! ```toml
//! subscription_id = "00000000-0000-0000-0000-000000000000"
//! endpoint = "https://management.azure.com"
//! log_level = "debug"
//! ```

use crate::error::ConfigError;
use crate::management::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";
pub const ENV_ENDPOINT: &str = "LOGICAPPS_ENDPOINT";
pub const ENV_API_VERSION: &str = "LOGICAPPS_API_VERSION";
pub const ENV_LOG_LEVEL: &str = "LOGICAPPS_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub subscription_id: Option<String>,
    /// Base URL of the Azure Resource Manager endpoint.
    pub endpoint: String,
    /// `api-version` sent with every management request.
    pub api_version: String,
    /// Bearer token for the management API.
    pub access_token: Option<String>,
    pub log_level: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            subscription_id: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ManagerConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logicapps").join("config.toml"))
    }

    /// Loads the file at `path` (or the default location, if it exists) and
    /// applies environment overrides from the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overrides fields from environment variables read through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(subscription_id) = read(ENV_SUBSCRIPTION_ID) {
            self.subscription_id = Some(subscription_id);
        }
        if let Some(access_token) = read(ENV_ACCESS_TOKEN) {
            self.access_token = Some(access_token);
        }
        if let Some(endpoint) = read(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(api_version) = read(ENV_API_VERSION) {
            self.api_version = api_version;
        }
        if let Some(log_level) = read(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }
    }

    /// Returns the subscription id and access token needed to reach the
    /// management API.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let subscription_id = self
            .subscription_id
            .as_deref()
            .ok_or(ConfigError::MissingSubscription)?;
        let access_token = self
            .access_token
            .as_deref()
            .ok_or(ConfigError::MissingAccessToken)?;
        Ok((subscription_id, access_token))
    }
}
