//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the employee model API.
//! - Keep callers decoupled from the concrete backing store.

pub mod employee_service;
