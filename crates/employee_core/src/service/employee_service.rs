//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points callers use (save, find, update, delete).
//! - Delegate persistence to any `EmployeeRepository` implementation.
//!
//! # Invariants
//! - Validation runs before the repository is called, so invalid input never
//!   reaches the store (connected or not).
//! - Service layer remains storage-agnostic.
//! - Store errors are returned unchanged; nothing is retried here.

use crate::model::employee::{Employee, EmployeeDraft};
use crate::model::query::{EmployeeFilter, EmployeePatch};
use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult, UpdateOutcome};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Use-case service wrapper for employee CRUD operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Persists a new record or overwrites the stored one with the same `_id`.
    ///
    /// On success `employee.is_new()` becomes `false` and a copy of the
    /// persisted record is returned.
    pub fn save(&self, employee: &mut Employee) -> RepoResult<Employee> {
        let started_at = Instant::now();
        let was_new = employee.is_new();
        let result = match employee.validate() {
            Ok(()) => self.repo.save_employee(employee),
            Err(err) => Err(err.into()),
        };
        log_outcome("employee_save", started_at, &result, |()| {
            format!("created={was_new}")
        });
        result?;

        employee.mark_persisted();
        Ok(employee.clone())
    }

    /// Validates a dynamic candidate and persists it.
    pub fn save_draft(&self, draft: EmployeeDraft) -> RepoResult<Employee> {
        let mut employee = draft.into_employee().map_err(|err| {
            warn!(
                "event=employee_save module=service status=error error_code=validation_failed fields={}",
                err.len()
            );
            RepoError::from(err)
        })?;
        self.save(&mut employee)
    }

    /// Returns every match in insertion order.
    pub fn find(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        let started_at = Instant::now();
        let result = self.repo.find_employees(filter);
        log_outcome("employee_find", started_at, &result, |found| {
            format!("count={}", found.len())
        });
        result
    }

    /// Returns the first match in insertion order, if any.
    pub fn find_one(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        let started_at = Instant::now();
        let result = self.repo.find_one_employee(filter);
        log_outcome("employee_find_one", started_at, &result, |found| {
            format!("found={}", found.is_some())
        });
        result
    }

    pub fn count(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.repo.count_employees(filter)
    }

    /// Patches the first match. Zero matches is a no-op.
    pub fn update_one(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.update_with("employee_update_one", patch, |repo| {
            repo.update_one_employee(filter, patch)
        })
    }

    /// Patches every match. Zero matches is a no-op.
    pub fn update_many(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.update_with("employee_update_many", patch, |repo| {
            repo.update_many_employees(filter, patch)
        })
    }

    /// Removes the first match; returns the number removed (0 or 1).
    pub fn delete_one(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete_one_employee(filter);
        log_outcome("employee_delete_one", started_at, &result, |removed| {
            format!("removed={removed}")
        });
        result
    }

    /// Removes every match; returns the number removed.
    pub fn delete_many(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.delete_many_employees(filter);
        log_outcome("employee_delete_many", started_at, &result, |removed| {
            format!("removed={removed}")
        });
        result
    }

    /// Removes this record from the store by `_id`.
    ///
    /// Same effect as `delete_one(&EmployeeFilter::by_id(employee.id))`.
    pub fn remove(&self, employee: &Employee) -> RepoResult<usize> {
        self.delete_one(&EmployeeFilter::by_id(employee.id))
    }

    fn update_with(
        &self,
        event: &'static str,
        patch: &EmployeePatch,
        run: impl FnOnce(&R) -> RepoResult<UpdateOutcome>,
    ) -> RepoResult<UpdateOutcome> {
        let started_at = Instant::now();
        let result = patch
            .validate()
            .map_err(RepoError::from)
            .and_then(|()| run(&self.repo));
        log_outcome(event, started_at, &result, |outcome| {
            format!("matched={} modified={}", outcome.matched, outcome.modified)
        });
        result
    }
}

fn log_outcome<T>(
    event: &'static str,
    started_at: Instant,
    result: &RepoResult<T>,
    describe: impl FnOnce(&T) -> String,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => debug!(
            "event={event} module=service status=ok duration_ms={duration_ms} {}",
            describe(value)
        ),
        Err(err) => {
            let error_code = err.code();
            match err {
                RepoError::Validation(validation) => warn!(
                    "event={event} module=service status=error duration_ms={duration_ms} error_code={error_code} fields={}",
                    validation.len()
                ),
                RepoError::Store(_) => error!(
                    "event={event} module=service status=error duration_ms={duration_ms} error_code={error_code} error={err}"
                ),
                _ => info!(
                    "event={event} module=service status=error duration_ms={duration_ms} error_code={error_code}"
                ),
            }
        }
    }
}
