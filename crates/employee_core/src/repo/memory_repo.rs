//! In-memory employee store used as a test double.
//!
//! # Invariants
//! - Records keep insertion order; overwriting by `_id` keeps the position.
//! - While disconnected, every store call fails with `StoreError::Unavailable`.
//!   Validation still runs first, so invalid input reports `Validation`.

use crate::db::StoreError;
use crate::model::employee::Employee;
use crate::model::query::{EmployeeFilter, EmployeePatch};
use crate::repo::employee_repo::{EmployeeRepository, RepoResult, UpdateOutcome};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ordered, lock-guarded employee store with a simulated connection switch.
#[derive(Debug)]
pub struct InMemoryEmployeeRepository {
    records: RwLock<Vec<Employee>>,
    connected: AtomicBool,
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// Makes every subsequent store call fail until [`Self::reconnect`].
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ensure_connected(&self) -> RepoResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is disconnected".to_string()).into())
        }
    }

    fn update_matching(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
        limit: Option<usize>,
    ) -> RepoResult<UpdateOutcome> {
        patch.validate()?;
        self.ensure_connected()?;

        let mut records = self.records.write();
        let mut outcome = UpdateOutcome::default();
        for employee in records
            .iter_mut()
            .filter(|employee| filter.matches(employee))
            .take(limit.unwrap_or(usize::MAX))
        {
            outcome.matched += 1;
            if patch.apply(employee) {
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn save_employee(&self, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;
        self.ensure_connected()?;

        let mut stored = employee.clone();
        stored.mark_persisted();

        let mut records = self.records.write();
        match records.iter_mut().find(|existing| existing.id == employee.id) {
            Some(existing) => *existing = stored,
            None => records.push(stored),
        }
        Ok(())
    }

    fn find_employees(&self, filter: &EmployeeFilter) -> RepoResult<Vec<Employee>> {
        self.ensure_connected()?;
        Ok(self
            .records
            .read()
            .iter()
            .filter(|employee| filter.matches(employee))
            .cloned()
            .collect())
    }

    fn find_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<Option<Employee>> {
        self.ensure_connected()?;
        Ok(self
            .records
            .read()
            .iter()
            .find(|employee| filter.matches(employee))
            .cloned())
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.ensure_connected()?;
        Ok(self
            .records
            .read()
            .iter()
            .filter(|employee| filter.matches(employee))
            .count())
    }

    fn update_one_employee(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.update_matching(filter, patch, Some(1))
    }

    fn update_many_employees(
        &self,
        filter: &EmployeeFilter,
        patch: &EmployeePatch,
    ) -> RepoResult<UpdateOutcome> {
        self.update_matching(filter, patch, None)
    }

    fn delete_one_employee(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.ensure_connected()?;

        let mut records = self.records.write();
        match records.iter().position(|employee| filter.matches(employee)) {
            Some(index) => {
                records.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_many_employees(&self, filter: &EmployeeFilter) -> RepoResult<usize> {
        self.ensure_connected()?;

        let mut records = self.records.write();
        let before = records.len();
        records.retain(|employee| !filter.matches(employee));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryEmployeeRepository;
    use crate::db::StoreError;
    use crate::model::employee::Employee;
    use crate::model::query::EmployeeFilter;
    use crate::repo::employee_repo::{EmployeeRepository, RepoError};

    #[test]
    fn saved_copies_are_not_new() {
        let repo = InMemoryEmployeeRepository::new();
        let employee = Employee::new("John", "Doe", "IT");
        assert!(employee.is_new());

        repo.save_employee(&employee).unwrap();
        let stored = repo.find_one_employee(&EmployeeFilter::all()).unwrap().unwrap();
        assert!(!stored.is_new());
        assert_eq!(stored.id, employee.id);
    }

    #[test]
    fn disconnected_store_fails_reads_and_writes() {
        let repo = InMemoryEmployeeRepository::new();
        repo.save_employee(&Employee::new("John", "Doe", "IT")).unwrap();
        repo.disconnect();

        let read_err = repo.find_employees(&EmployeeFilter::all()).unwrap_err();
        assert!(matches!(read_err, RepoError::Store(StoreError::Unavailable(_))));

        let write_err = repo
            .save_employee(&Employee::new("Amanda", "Doe", "HR"))
            .unwrap_err();
        assert!(matches!(write_err, RepoError::Store(_)));

        repo.reconnect();
        assert_eq!(repo.count_employees(&EmployeeFilter::all()).unwrap(), 1);
    }

    #[test]
    fn validation_precedes_connectivity_check() {
        let repo = InMemoryEmployeeRepository::new();
        repo.disconnect();

        let err = repo
            .save_employee(&Employee::new("John", "Doe", ""))
            .unwrap_err();
        assert!(err.is_validation());
    }
}
