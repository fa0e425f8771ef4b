//! Employee repository contract and SQLite document-store implementation.
//!
//! # Responsibility
//! - Define the pluggable store boundary used by the model layer.
//! - Persist employees as JSON documents inside the `employees` table.
//!
//! # Invariants
//! - Write paths validate records/patches before any SQL runs.
//! - Result order is insertion order; overwriting by `_id` keeps the slot.
//! - Read paths reject invalid persisted documents instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::StoreError;
use crate::model::employee::{Employee, EmployeeDraft, EmployeeField, EmployeeValidationError};
use crate::model::query::{EmployeeFilter, EmployeePatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed validation; nothing was sent to the store.
    Validation(EmployeeValidationError),
    /// Store unreachable or operation rejected.
    Store(StoreError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn validation_errors(&self) -> Option<&EmployeeValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Store(_) => "store_error",
            Self::InvalidData(_) => "invalid_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) => "missing_table",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(value))
    }
}

/// Counts reported by update operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Records selected by the filter.
    pub matched: usize,
    /// Records whose stored values actually changed.
    pub modified: usize,
}

/// Backing store interface for employee documents.
pub trait EmployeeRepository {
    /// Inserts a new record or overwrites the one with the same `_id`.
    fn save_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>>;
    fn find_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>>;
    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    fn update_one_employee(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome>;
    fn update_many_employees(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome>;
    /// Removes the first match; returns how many records were removed.
    fn delete_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
    fn delete_many_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for &R {
    fn save_employee(&self, employee: &Employee) -> RepoResult<()> {
        (**self).save_employee(employee)
    }

    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        (**self).find_employees(filter)
    }

    fn find_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        (**self).find_one_employee(filter)
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        (**self).count_employees(filter)
    }

    fn update_one_employee(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        (**self).update_one_employee(filter, patch)
    }

    fn update_many_employees(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        (**self).update_many_employees(filter, patch)
    }

    fn delete_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        (**self).delete_one_employee(filter)
    }

    fn delete_many_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        (**self).delete_many_employees(filter)
    }
}

const EMPLOYEES_TABLE: &str = "employees";
const EMPLOYEE_SELECT_SQL: &str = "SELECT seq, uuid, document FROM employees";

/// SQLite-backed employee document store.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a connection with schema setup applied.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is behind this binary.
    /// - `MissingRequiredTable` when `employees` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn select_rows(
        &self,
        filter: &EmployeeFilter,
        limit: Option<u32>,
    ) -> RepoResult<Vec<(i64, Employee)>> {
        let (where_sql, mut bind_values) = filter_clause(filter);
        let mut sql = format!("{EMPLOYEE_SELECT_SQL}{where_sql} ORDER BY seq ASC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            let seq: i64 = row.get("seq")?;
            employees.push((seq, parse_employee_row(row)?));
        }
        Ok(employees)
    }

    fn write_document(&self, seq: i64, employee: &Employee) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE employees
             SET
                document = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE seq = ?2;",
            params![encode_document(employee)?, seq],
        )?;
        Ok(())
    }

    fn patch_rows(
        &self,
        rows: Vec<(i64, Employee)>,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        let mut outcome = UpdateOutcome {
            matched: rows.len(),
            modified: 0,
        };
        for (seq, mut employee) in rows {
            if patch.apply(&mut employee) {
                self.write_document(seq, &employee)?;
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;

        self.conn.execute(
            "INSERT INTO employees (uuid, document) VALUES (?1, ?2)
             ON CONFLICT(uuid) DO UPDATE SET
                document = excluded.document,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![employee.id.to_string(), encode_document(employee)?],
        )?;
        Ok(())
    }

    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        let rows = self.select_rows(filter, None)?;
        Ok(rows.into_iter().map(|(_, employee)| employee).collect())
    }

    fn find_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        let rows = self.select_rows(filter, Some(1))?;
        Ok(rows.into_iter().next().map(|(_, employee)| employee))
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM employees{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative employee count `{count}`")))
    }

    fn update_one_employee(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        patch.validate()?;

        let rows = self.select_rows(filter, Some(1))?;
        self.patch_rows(rows, patch)
    }

    fn update_many_employees(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        patch.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let rows = self.select_rows(filter, None)?;
        let outcome = self.patch_rows(rows, patch)?;
        tx.commit()?;
        Ok(outcome)
    }

    fn delete_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let seq: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT seq FROM employees{where_sql} ORDER BY seq ASC LIMIT 1;"),
                params_from_iter(bind_values),
                |row| row.get(0),
            )
            .optional()?;

        match seq {
            Some(seq) => Ok(self
                .conn
                .execute("DELETE FROM employees WHERE seq = ?1;", [seq])?),
            None => Ok(0),
        }
    }

    fn delete_many_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let (where_sql, bind_values) = filter_clause(filter);
        let removed = self.conn.execute(
            &format!("DELETE FROM employees{where_sql};"),
            params_from_iter(bind_values),
        )?;
        Ok(removed)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [EMPLOYEES_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
    }

    Ok(())
}

/// Builds the ` WHERE ...` clause and positional binds for a filter.
fn filter_clause(filter: &EmployeeFilter) -> (String, Vec<Value>) {
    let mut sql = String::from(" WHERE 1 = 1");
    let mut bind_values = Vec::new();

    if let Some(id) = filter.id {
        sql.push_str(" AND uuid = ?");
        bind_values.push(Value::Text(id.to_string()));
    }

    for field in EmployeeField::ALL {
        if let Some(expected) = filter.expected(field) {
            sql.push_str(&format!(
                " AND json_extract(document, '$.{}') = ?",
                field.as_str()
            ));
            bind_values.push(Value::Text(expected.to_string()));
        }
    }

    (sql, bind_values)
}

fn encode_document(employee: &Employee) -> RepoResult<String> {
    serde_json::to_string(employee)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode employee document: {err}")))
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in employees.uuid"))
    })?;

    let document_text: String = row.get("document")?;
    let document: serde_json::Value = serde_json::from_str(&document_text).map_err(|err| {
        RepoError::InvalidData(format!("malformed document for employee {id}: {err}"))
    })?;

    let mut employee = EmployeeDraft::from_fields(document)
        .with_id(id)
        .into_employee()
        .map_err(|err| RepoError::InvalidData(format!("employee {id}: {err}")))?;
    employee.mark_persisted();
    Ok(employee)
}
