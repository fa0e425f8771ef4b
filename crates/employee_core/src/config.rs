//! Core configuration document.
//!
//! # Responsibility
//! - Describe which backing store to open and how logging is set up.
//! - Parse that description from JSON.
//!
//! # Invariants
//! - Missing keys fall back to defaults: in-memory store, build-mode log
//!   level, no file logging.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Backing store selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreTarget {
    /// Fresh in-memory database, discarded on close.
    #[default]
    Memory,
    /// SQLite database file, created when missing.
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_level_string")]
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default)]
    pub store: StoreTarget,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_level_string(),
            log_dir: None,
            store: StoreTarget::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Opens the configured store with schema setup applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match &self.store {
            StoreTarget::Memory => open_db_in_memory(),
            StoreTarget::File { path } => open_db(path),
        }
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when file logging is not configured.
    pub fn init_logging(&self) -> Result<bool, String> {
        match self.log_dir.as_deref() {
            Some(log_dir) => init_logging(&self.log_level, log_dir).map(|()| true),
            None => Ok(false),
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}
