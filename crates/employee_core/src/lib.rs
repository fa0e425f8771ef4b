//! Employee record model over a pluggable document store.
//!
//! The model layer validates records and proxies CRUD calls to an
//! [`EmployeeRepository`]; the SQLite document store backs production use and
//! [`EphemeralDatabase`] / [`InMemoryEmployeeRepository`] back tests.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, StoreTarget};
pub use db::{EphemeralDatabase, StoreError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{
    Employee, EmployeeDraft, EmployeeField, EmployeeId, EmployeeValidationError, FieldViolation,
};
pub use model::query::{EmployeeFilter, EmployeePatch};
pub use repo::employee_repo::{
    EmployeeRepository, RepoError, RepoResult, SqliteEmployeeRepository, UpdateOutcome,
};
pub use repo::memory_repo::InMemoryEmployeeRepository;
pub use service::employee_service::EmployeeService;

