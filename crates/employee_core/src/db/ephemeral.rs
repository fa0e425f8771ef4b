//! Ephemeral in-memory employee database for isolated test runs.
//!
//! # Invariants
//! - Every instance owns its own in-memory SQLite database; instances never
//!   observe each other's records.
//! - Teardown is explicit via [`EphemeralDatabase::close`]; dropping also
//!   releases the database but swallows close errors.

use crate::db::{open_db_in_memory, DbResult};
use crate::model::query::EmployeeFilter;
use crate::repo::employee_repo::{EmployeeRepository, RepoResult, SqliteEmployeeRepository};
use log::info;
use rusqlite::Connection;

/// Fresh, schema-ready in-memory database.
#[derive(Debug)]
pub struct EphemeralDatabase {
    conn: Connection,
}

impl EphemeralDatabase {
    /// Opens a fresh database with the employee schema applied.
    pub fn start() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        info!("event=ephemeral_db_start module=db status=ok");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Borrows a document-store repository bound to this database.
    pub fn repository(&self) -> RepoResult<SqliteEmployeeRepository<'_>> {
        SqliteEmployeeRepository::try_new(&self.conn)
    }

    /// Removes every record; returns how many were removed.
    pub fn clear(&self) -> RepoResult<usize> {
        let removed = self
            .repository()?
            .delete_many_employees(&EmployeeFilter::all())?;
        info!("event=ephemeral_db_clear module=db status=ok removed={removed}");
        Ok(removed)
    }

    /// Closes the underlying connection and surfaces close failures.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| err)?;
        info!("event=ephemeral_db_close module=db status=ok");
        Ok(())
    }
}
