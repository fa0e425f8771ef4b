//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record, its validation rules and its query shapes.
//!
//! # Invariants
//! - Every record is identified by a stable `EmployeeId`.
//! - Records are independent; there are no relationships between them.

pub mod employee;
pub mod query;
