// crates/background-store-config/src/config.rs
// ============================================================================
// Module: Background Store Configuration
// Description: Configuration loading and validation for the background store.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: background-store-core, background-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits:
//!
//! ```toml
//! [durable]
//! path = "/var/lib/app/session.db"
//! busy_timeout_ms = 5000
//! journal_mode = "wal"
//! sync_mode = "full"
//!
//! [audit]
//! sink = "file"
//! path = "/var/log/app/background-store.jsonl"
//! ```
//!
//! The `[durable]` section is required. `[audit]` defaults to no sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use background_store_core::FileAuditSink;
use background_store_core::NoopAuditSink;
use background_store_core::StderrAuditSink;
use background_store_core::StoreAuditSink;
use background_store_sqlite::SqliteStoreConfig;
use background_store_sqlite::SqliteStoreMode;
use background_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "background-store.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "BACKGROUND_STORE_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default busy timeout for the durable store (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Background store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundStoreConfig {
    /// Durable store configuration.
    pub durable: DurableSection,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditSection,
}

impl BackgroundStoreConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then [`CONFIG_ENV_VAR`], then
    /// `background-store.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.durable.validate()?;
        self.audit.validate()
    }
}

/// Durable store section.
#[derive(Debug, Clone, Deserialize)]
pub struct DurableSection {
    /// `SQLite` database path.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl DurableSection {
    /// Validates durable store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("durable.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "durable.busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the `SQLite` store configuration for this section.
    #[must_use]
    pub fn to_store_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Drop audit events.
    #[default]
    None,
    /// Write JSON lines to stderr.
    Stderr,
    /// Append JSON lines to `audit.path`.
    File,
}

/// Audit section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditSection {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path; required for the file sink only.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditSection {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only allowed for the file sink".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file sink cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn StoreAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }
}

/// Returns the default durable store busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
