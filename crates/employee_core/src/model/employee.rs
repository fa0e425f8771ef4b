//! Employee domain model and field validation.
//!
//! # Responsibility
//! - Define the canonical employee record and its document wire shape.
//! - Validate candidates before any store I/O happens.
//!
//! # Invariants
//! - `firstName`, `lastName` and `department` are present, string-typed and
//!   non-empty on every persisted record.
//! - `_id` is assigned at construction and never reused for another record.
//! - Construction never performs I/O; `is_new()` stays `true` until a save.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an employee document.
pub type EmployeeId = Uuid;

/// Required employee fields, keyed by their document name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    FirstName,
    LastName,
    Department,
}

impl EmployeeField {
    /// Every required field, in document order.
    pub const ALL: [Self; 3] = [Self::FirstName, Self::LastName, Self::Department];

    /// Document (wire) name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Department => "department",
        }
    }

    /// Resolves a document field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl Display for EmployeeField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldViolation {
    /// Field is absent or `null`.
    Missing,
    /// Field is a zero-length string.
    Empty,
    /// Field holds a value of the wrong JSON type.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl FieldViolation {
    /// Short machine-readable kind, stable for callers and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "required",
            Self::Empty => "empty",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("is required"),
            Self::Empty => f.write_str("must not be empty"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "must be a {expected}, got {found}")
            }
        }
    }
}

/// Validation failure with one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeValidationError {
    errors: BTreeMap<EmployeeField, FieldViolation>,
}

impl EmployeeValidationError {
    /// Returns the violation recorded for `field`, if any.
    pub fn get(&self, field: EmployeeField) -> Option<&FieldViolation> {
        self.errors.get(&field)
    }

    /// Looks up a violation by document field name (`"department"`).
    pub fn field(&self, name: &str) -> Option<&FieldViolation> {
        EmployeeField::from_name(name).and_then(|field| self.get(field))
    }

    pub fn contains(&self, field: EmployeeField) -> bool {
        self.errors.contains_key(&field)
    }

    /// Offending fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = EmployeeField> + '_ {
        self.errors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmployeeField, &FieldViolation)> {
        self.errors.iter().map(|(field, violation)| (*field, violation))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn record(&mut self, field: EmployeeField, violation: FieldViolation) {
        self.errors.insert(field, violation);
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("employee validation failed")?;
        let mut separator = ": ";
        for (field, violation) in &self.errors {
            write!(f, "{separator}{field} {violation}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for EmployeeValidationError {}

/// Canonical employee record.
///
/// Serialized as a document: `{ "_id", "firstName", "lastName", "department" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    /// Not part of the document; records loaded from a store are never new.
    #[serde(skip)]
    is_new: bool,
}

impl Employee {
    /// Creates an unsaved candidate with a generated stable ID.
    ///
    /// Does not validate; call [`Employee::validate`] or save it.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name, department)
    }

    /// Creates an unsaved candidate with a caller-provided ID.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            is_new: true,
        }
    }

    /// Whether this record has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Checks the required-field invariants.
    ///
    /// # Errors
    /// - Returns one `FieldViolation::Empty` entry per empty field.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = EmployeeValidationError::default();
        for field in EmployeeField::ALL {
            if self.value(field).is_empty() {
                errors.record(field, FieldViolation::Empty);
            }
        }
        errors.into_result()
    }

    /// Reads a required field by key.
    pub fn value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::FirstName => &self.first_name,
            EmployeeField::LastName => &self.last_name,
            EmployeeField::Department => &self.department,
        }
    }

    pub(crate) fn value_mut(&mut self, field: EmployeeField) -> &mut String {
        match field {
            EmployeeField::FirstName => &mut self.first_name,
            EmployeeField::LastName => &mut self.last_name,
            EmployeeField::Department => &mut self.department,
        }
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.is_new = false;
    }
}

/// Untyped employee candidate built from dynamic fields.
///
/// Holds raw JSON values so ill-typed input (`department: 0`, `[]`, `null`)
/// survives until validation can report it per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDraft {
    id: Option<EmployeeId>,
    fields: Map<String, Value>,
}

impl EmployeeDraft {
    /// Builds a draft from a JSON object. Non-object input yields no fields.
    ///
    /// An `_id` key is not read here; use [`EmployeeDraft::with_id`].
    pub fn from_fields(fields: Value) -> Self {
        match fields {
            Value::Object(map) => Self { id: None, fields: map },
            _ => Self::default(),
        }
    }

    /// Pins the stable ID the resulting record will carry.
    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn set(&mut self, field: EmployeeField, value: Value) {
        self.fields.insert(field.as_str().to_string(), value);
    }

    /// Validates every required field and reports all offenders at once.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        let mut errors = EmployeeValidationError::default();
        for field in EmployeeField::ALL {
            if let Err(violation) = check_string_value(self.fields.get(field.as_str())) {
                errors.record(field, violation);
            }
        }
        errors.into_result()
    }

    /// Converts into a typed, unsaved record after validation.
    pub fn into_employee(self) -> Result<Employee, EmployeeValidationError> {
        self.validate()?;
        let mut employee = Employee::with_id(
            self.id.unwrap_or_else(Uuid::new_v4),
            String::new(),
            String::new(),
            String::new(),
        );
        for field in EmployeeField::ALL {
            if let Some(Value::String(value)) = self.fields.get(field.as_str()) {
                *employee.value_mut(field) = value.clone();
            }
        }
        Ok(employee)
    }
}

fn check_string_value(value: Option<&Value>) -> Result<(), FieldViolation> {
    match value {
        None | Some(Value::Null) => Err(FieldViolation::Missing),
        Some(Value::String(text)) if text.is_empty() => Err(FieldViolation::Empty),
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(FieldViolation::TypeMismatch {
            expected: "string",
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{check_string_value, EmployeeField, FieldViolation};
    use serde_json::json;

    #[test]
    fn field_names_roundtrip() {
        for field in EmployeeField::ALL {
            assert_eq!(EmployeeField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(EmployeeField::from_name("salary"), None);
    }

    #[test]
    fn check_string_value_classifies_json_types() {
        assert_eq!(check_string_value(None), Err(FieldViolation::Missing));
        assert_eq!(
            check_string_value(Some(&json!(null))),
            Err(FieldViolation::Missing)
        );
        assert_eq!(
            check_string_value(Some(&json!(""))),
            Err(FieldViolation::Empty)
        );
        assert_eq!(
            check_string_value(Some(&json!(true))),
            Err(FieldViolation::TypeMismatch {
                expected: "string",
                found: "boolean"
            })
        );
        assert_eq!(check_string_value(Some(&json!("  "))), Ok(()));
    }
}
