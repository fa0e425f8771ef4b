use employee_core::{Employee, EmployeeDraft, EmployeeField, FieldViolation};
use serde_json::json;
use uuid::Uuid;

#[test]
fn employee_new_is_unsaved_and_valid() {
    let employee = Employee::new("John", "Doe", "IT");

    assert!(!employee.id.is_nil());
    assert!(employee.is_new());
    assert_eq!(employee.first_name, "John");
    assert_eq!(employee.last_name, "Doe");
    assert_eq!(employee.department, "IT");
    employee.validate().unwrap();
}

#[test]
fn validate_reports_every_empty_field() {
    let err = Employee::new("", "Doe", "").validate().unwrap_err();

    assert_eq!(err.len(), 2);
    assert_eq!(err.get(EmployeeField::FirstName), Some(&FieldViolation::Empty));
    assert_eq!(err.field("department"), Some(&FieldViolation::Empty));
    assert!(!err.contains(EmployeeField::LastName));
    assert_eq!(
        err.to_string(),
        "employee validation failed: firstName must not be empty; department must not be empty"
    );
}

#[test]
fn draft_without_fields_reports_all_three_as_required() {
    let err = EmployeeDraft::from_fields(json!({})).validate().unwrap_err();

    let fields: Vec<_> = err.fields().collect();
    assert_eq!(fields, EmployeeField::ALL);
    for (_, violation) in err.iter() {
        assert_eq!(violation, &FieldViolation::Missing);
        assert_eq!(violation.kind(), "required");
    }
}

#[test]
fn draft_rejects_non_string_department() {
    let cases = [
        (json!({ "firstName": "John", "lastName": "Doe" }), FieldViolation::Missing),
        (
            json!({ "firstName": "John", "lastName": "Doe", "department": null }),
            FieldViolation::Missing,
        ),
        (
            json!({ "firstName": "John", "lastName": "Doe", "department": 0 }),
            FieldViolation::TypeMismatch {
                expected: "string",
                found: "number",
            },
        ),
        (
            json!({ "firstName": "John", "lastName": "Doe", "department": [] }),
            FieldViolation::TypeMismatch {
                expected: "string",
                found: "array",
            },
        ),
    ];

    for (fields, expected) in cases {
        let err = EmployeeDraft::from_fields(fields.clone())
            .validate()
            .unwrap_err();
        assert_eq!(err.len(), 1, "unexpected errors for {fields}: {err}");
        assert_eq!(err.field("department"), Some(&expected), "case {fields}");
    }
}

#[test]
fn draft_into_employee_keeps_values_and_pinned_id() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let employee = EmployeeDraft::from_fields(json!({
        "firstName": "Amanda",
        "lastName": "Doe",
        "department": "HR",
        "salary": 1000
    }))
    .with_id(id)
    .into_employee()
    .unwrap();

    assert_eq!(employee.id, id);
    assert_eq!(employee.first_name, "Amanda");
    assert_eq!(employee.department, "HR");
    assert!(employee.is_new());
}

#[test]
fn draft_set_overrides_field_value() {
    let mut draft = EmployeeDraft::from_fields(json!({
        "firstName": "John",
        "lastName": "Doe",
        "department": 42
    }));
    assert!(draft.validate().is_err());

    draft.set(EmployeeField::Department, json!("IT"));
    assert_eq!(draft.get("department"), Some(&json!("IT")));
    draft.validate().unwrap();
}

#[test]
fn non_object_input_yields_empty_draft() {
    let err = EmployeeDraft::from_fields(json!("John Doe"))
        .validate()
        .unwrap_err();
    assert_eq!(err.len(), 3);
}

#[test]
fn employee_serialization_uses_document_field_names() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let employee = Employee::with_id(id, "John", "Doe", "IT");

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(
        json,
        json!({
            "_id": "11111111-2222-4333-8444-555555555555",
            "firstName": "John",
            "lastName": "Doe",
            "department": "IT"
        })
    );

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.id, id);
    assert_eq!(decoded.department, "IT");
    assert!(!decoded.is_new());
}
