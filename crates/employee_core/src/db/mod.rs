//! SQLite document-store bootstrap and schema setup.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing the employee store.
//! - Create the `employees` document table in deterministic order.
//! - Provide an ephemeral in-memory database for isolated test runs.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repositories must not read/write documents before setup succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod ephemeral;
pub mod migrations;
mod open;

pub use ephemeral::EphemeralDatabase;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, StoreError>;

/// Backing store failure, raised at the I/O boundary.
///
/// Surfaced as-is to callers; nothing in this crate retries it.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Store cannot be reached (closed or disconnected).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
