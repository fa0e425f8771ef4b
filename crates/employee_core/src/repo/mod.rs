//! Repository layer: the pluggable backing-store boundary.
//!
//! # Responsibility
//! - Define the store contract the model layer talks to.
//! - Provide the SQLite document store and an in-memory test double.
//!
//! # Invariants
//! - Repository writes validate input before touching the store.
//! - Validation and store failures stay distinct (`RepoError::Validation`
//!   vs `RepoError::Store`).

pub mod employee_repo;
pub mod memory_repo;
