//! # Configuration
//!
//! Layered configuration, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file (`--config <path>`, else `ROLLBOOK_CONFIG`, else `rollbook.toml`)
//! 3. Environment (`PORT`, `ROLLBOOK_CORS_ORIGINS`, `ROLLBOOK_RATE_LIMIT`, `ROLLBOOK_API_KEY`)
//! 4. CLI flags (applied by the caller)
//!
//! A missing `rollbook.toml` in the working directory is not an error. A
//! missing file named explicitly is.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//!
//! [storage]
//! backend = "redb"
//! database = "rollbook.redb"
//!
//! [api]
//! cors_origins = "http://localhost:5000"
//! rate_limit = 100
//! body_limit_bytes = 65536
//! ```

use crate::api::{
    API_KEY_ENV, ApiSettings, CORS_ORIGINS_ENV, DEFAULT_BODY_LIMIT, DEFAULT_RATE_LIMIT,
    RATE_LIMIT_ENV,
};
use rollbook_core::{RecordError, Registry};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
const DEFAULT_CONFIG_NAME: &str = "rollbook.toml";
/// Environment variable override for the config path.
pub const CONFIG_ENV_VAR: &str = "ROLLBOOK_CONFIG";
/// Environment variable override for the listen port.
pub const PORT_ENV_VAR: &str = "PORT";
/// Maximum allowed config file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// ERRORS
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("config io error: {0}")]
    Io(String),
    /// Parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Disk-backed redb database.
    #[default]
    Redb,
    /// Volatile in-memory store.
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redb => "redb",
            Self::Memory => "memory",
        }
    }

    /// Open a registry with this backend. `database` is ignored for memory.
    pub fn open(self, database: &Path) -> Result<Registry, RecordError> {
        match self {
            Self::Redb => Registry::with_redb(database),
            Self::Memory => Ok(Registry::new()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid(format!(
                "unknown storage backend '{other}' (expected \"redb\" or \"memory\")"
            ))),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Redb,
            database: PathBuf::from("rollbook.redb"),
        }
    }
}

/// `[api]` section. The API key is only read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub cors_origins: Option<String>,
    pub rate_limit: u32,
    pub body_limit_bytes: usize,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            api_key: None,
        }
    }
}

impl From<&ApiConfig> for ApiSettings {
    fn from(api: &ApiConfig) -> Self {
        Self {
            cors_origins: api.cors_origins.clone(),
            rate_limit: api.rate_limit,
            api_key: api.api_key.clone(),
            body_limit_bytes: api.body_limit_bytes,
        }
    }
}

// =============================================================================
// ROOT CONFIG
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RollbookConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

impl RollbookConfig {
    /// Load defaults, the config file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the config file, if one is found.
    pub fn from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(env_path) if !env_path.is_empty() => (PathBuf::from(env_path), true),
                _ => (PathBuf::from(DEFAULT_CONFIG_NAME), false),
            },
        };

        if !resolved.exists() {
            if explicit {
                return Err(ConfigError::Io(format!(
                    "config file not found: {}",
                    resolved.display()
                )));
            }
            return Ok(Self::default());
        }

        let metadata = fs::metadata(&resolved).map_err(|e| ConfigError::Io(e.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid(
                "config file exceeds size limit".to_string(),
            ));
        }
        let content = fs::read_to_string(&resolved).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::parse(&content)?;
        tracing::debug!(event = "config_loaded", path = %resolved.display());
        Ok(config)
    }

    /// Parse TOML text over the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay environment variables fetched through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV_VAR) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{PORT_ENV_VAR} must be a port number")))?;
        }
        if let Some(origins) = lookup(CORS_ORIGINS_ENV) {
            self.api.cors_origins = Some(origins);
        }
        if let Some(limit) = lookup(RATE_LIMIT_ENV) {
            self.api.rate_limit = limit.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{RATE_LIMIT_ENV} must be a non-negative integer"))
            })?;
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        if self.api.body_limit_bytes == 0 {
            return Err(ConfigError::Invalid(
                "api.body_limit_bytes must be greater than zero".to_string(),
            ));
        }
        if self.storage.backend == BackendKind::Redb
            && self.storage.database.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.database is required for the redb backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Router settings derived from the `[api]` section.
    #[must_use]
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings::from(&self.api)
    }

    /// `host:port` listen address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_sane() {
        let config = RollbookConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.backend, BackendKind::Redb);
        assert_eq!(config.storage.database, PathBuf::from("rollbook.redb"));
        assert_eq!(config.api.body_limit_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = RollbookConfig::parse(
            r#"
            [server]
            port = 8088

            [storage]
            backend = "memory"
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, BackendKind::Memory);
        assert_eq!(config.api.rate_limit, DEFAULT_RATE_LIMIT);
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let result = RollbookConfig::parse("[storage]\nbackend = \"sqlite\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let result = RollbookConfig::parse("[server]\nprot = 1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = RollbookConfig::parse("[server]\nport = 8088\n").expect("parse");
        config
            .apply_env(env(&[
                ("PORT", "9090"),
                ("ROLLBOOK_RATE_LIMIT", "0"),
                ("ROLLBOOK_API_KEY", "k"),
                ("ROLLBOOK_CORS_ORIGINS", "*"),
            ]))
            .expect("env");

        assert_eq!(config.server.port, 9090);
        let settings = config.api_settings();
        assert_eq!(settings.rate_limit, 0);
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.cors_origins.as_deref(), Some("*"));
    }

    #[test]
    fn malformed_environment_is_rejected() {
        let mut config = RollbookConfig::default();
        assert!(matches!(
            config.apply_env(env(&[("PORT", "http")])),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = RollbookConfig::default();
        assert!(matches!(
            config.apply_env(env(&[(RATE_LIMIT_ENV, "lots")])),
            Err(ConfigError::Invalid(msg)) if msg.contains(RATE_LIMIT_ENV)
        ));
    }

    #[test]
    fn zero_port_and_body_limit_fail_validation() {
        let mut config = RollbookConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = RollbookConfig::default();
        config.api.body_limit_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempdir().expect("temp dir");
        let result = RollbookConfig::from_file(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn file_is_read_from_disk() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("rollbook.toml");
        fs::write(&path, "[api]\nrate_limit = 7\n").expect("write");

        let config = RollbookConfig::from_file(Some(&path)).expect("load");
        assert_eq!(config.api.rate_limit, 7);
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!("REDB".parse::<BackendKind>().expect("parse"), BackendKind::Redb);
        assert_eq!("memory".parse::<BackendKind>().expect("parse"), BackendKind::Memory);
        assert!("file".parse::<BackendKind>().is_err());
    }
}
