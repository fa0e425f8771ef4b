//! Filter and patch shapes for employee queries.
//!
//! # Invariants
//! - A filter is a conjunction of exact-equality predicates; the empty
//!   filter matches every record.
//! - A patch only ever sets the three required fields, and every value it
//!   sets must itself be a valid (non-empty) field value.

use crate::model::employee::{
    Employee, EmployeeField, EmployeeId, EmployeeValidationError, FieldViolation,
};
use serde::{Deserialize, Serialize};

/// Field-value predicate selecting zero or more employees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub id: Option<EmployeeId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    /// Matches every stored employee.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches exactly the record with `id`.
    pub fn by_id(id: EmployeeId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<String>) -> Self {
        self.department = Some(value.into());
        self
    }

    /// Expected value for a required field, when constrained.
    pub fn expected(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::FirstName => self.first_name.as_deref(),
            EmployeeField::LastName => self.last_name.as_deref(),
            EmployeeField::Department => self.department.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && EmployeeField::ALL.iter().all(|f| self.expected(*f).is_none())
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if self.id.is_some_and(|id| id != employee.id) {
            return false;
        }
        EmployeeField::ALL.into_iter().all(|field| {
            self.expected(field)
                .map_or(true, |expected| employee.value(field) == expected)
        })
    }
}

/// Partial field update (`$set`) applied to matching employees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl EmployeePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<String>) -> Self {
        self.department = Some(value.into());
        self
    }

    pub fn value(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::FirstName => self.first_name.as_deref(),
            EmployeeField::LastName => self.last_name.as_deref(),
            EmployeeField::Department => self.department.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EmployeeField::ALL.iter().all(|f| self.value(*f).is_none())
    }

    /// Rejects patches that would blank out a required field.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = EmployeeValidationError::default();
        for field in EmployeeField::ALL {
            if self.value(field).is_some_and(str::is_empty) {
                errors.record(field, FieldViolation::Empty);
            }
        }
        errors.into_result()
    }

    /// Applies the patch in place; returns whether any value changed.
    pub fn apply(&self, employee: &mut Employee) -> bool {
        let mut modified = false;
        for field in EmployeeField::ALL {
            if let Some(value) = self.value(field) {
                let slot = employee.value_mut(field);
                if slot.as_str() != value {
                    value.clone_into(slot);
                    modified = true;
                }
            }
        }
        modified
    }
}
