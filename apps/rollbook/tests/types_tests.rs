//! Unit tests for API request conversion and response shapes.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use rollbook::api::{
    CreateStudentRequest, HealthResponse, SeedResponse, StudentJson, UpdateStudentRequest,
};
use rollbook_core::{RecordError, Roll, SeedReport, StudentDraft, StudentRecord};

fn create(json: &str) -> Result<StudentDraft, RecordError> {
    serde_json::from_str::<CreateStudentRequest>(json)
        .unwrap()
        .to_draft()
}

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// CREATE REQUEST TESTS
// =============================================================================

#[test]
fn test_create_minimal_request_uses_defaults() {
    let draft = create(r#"{"roll": 12}"#).unwrap();
    assert_eq!(draft, StudentDraft::new(Roll(12)));
}

#[test]
fn test_create_string_numbers_are_trimmed() {
    let draft = create(r#"{"roll": " 42 ", "age": "21", "mark5": " 77"}"#).unwrap();
    assert_eq!(draft.roll, Roll(42));
    assert_eq!(draft.age, 21);
    assert_eq!(draft.marks, [0, 0, 0, 0, 77]);
}

#[test]
fn test_create_null_roll_is_missing() {
    let result = create(r#"{"roll": null, "name": "x"}"#);
    assert!(matches!(result, Err(RecordError::InvalidInput(msg)) if msg.contains("required")));
}

#[test]
fn test_create_empty_string_roll_is_missing() {
    assert!(matches!(
        create(r#"{"roll": ""}"#),
        Err(RecordError::InvalidInput(_))
    ));
}

#[test]
fn test_create_roll_uses_full_unsigned_range() {
    let draft = create(r#"{"roll": 18446744073709551615}"#).unwrap();
    assert_eq!(draft.roll, Roll(u64::MAX));

    let draft = create(r#"{"roll": "9223372036854775808"}"#).unwrap();
    assert_eq!(draft.roll, Roll(9_223_372_036_854_775_808));
}

#[test]
fn test_create_negative_roll_names_the_rule() {
    for body in [r#"{"roll": -5}"#, r#"{"roll": "-5"}"#] {
        let err = create(body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: roll must be a non-negative integer");
    }
    assert_eq!(
        create(r#"{"roll": 1.5}"#).unwrap_err().to_string(),
        "Invalid input: roll must be an integer"
    );
}

#[test]
fn test_create_negative_age_rejected() {
    assert!(matches!(
        create(r#"{"roll": 1, "age": -3}"#),
        Err(RecordError::InvalidInput(msg)) if msg.contains("age")
    ));
}

#[test]
fn test_create_out_of_range_marks_kept_raw_until_record() {
    let draft = create(r#"{"roll": 1, "mark1": 250}"#).unwrap();
    assert!(draft.has_out_of_range_marks());
    let record = StudentRecord::from_draft(draft);
    assert_eq!(record.marks().values()[0], 100);
}

#[test]
fn test_create_error_names_the_field() {
    let err = create(r#"{"roll": 1, "mark4": "ninety"}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid input: mark4 must be an integer");
}

// =============================================================================
// UPDATE REQUEST TESTS
// =============================================================================

#[test]
fn test_update_empty_body_is_empty_patch() {
    let request: UpdateStudentRequest = serde_json::from_str("{}").unwrap();
    assert!(request.to_patch().unwrap().is_empty());
}

#[test]
fn test_update_ignores_roll_and_derived_fields() {
    let request: UpdateStudentRequest =
        serde_json::from_str(r#"{"roll": 9, "percentage": 1.0, "grade": "F", "name": "N"}"#)
            .unwrap();
    let patch = request.to_patch().unwrap();
    assert_eq!(patch.name.as_deref(), Some("N"));
    assert!(patch.marks.iter().all(Option::is_none));
}

#[test]
fn test_update_partial_marks() {
    let request: UpdateStudentRequest =
        serde_json::from_str(r#"{"mark2": "65", "mark5": 12}"#).unwrap();
    let patch = request.to_patch().unwrap();
    assert_eq!(patch.marks, [None, Some(65), None, None, Some(12)]);
    assert_eq!(patch.age, None);
}

// =============================================================================
// RESPONSE TESTS
// =============================================================================

#[test]
fn test_student_json_shape() {
    let record = StudentRecord::from_draft(
        StudentDraft::new(Roll(101))
            .with_name("Rajesh Kumar")
            .with_age(20)
            .with_branch("Computer Science")
            .with_marks([95, 92, 88, 90, 94]),
    );

    let value = serde_json::to_value(StudentJson::from(&record)).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "roll", "name", "age", "branch", "mark1", "mark2", "mark3", "mark4", "mark5",
            "percentage", "grade"
        ]
    );
    assert_eq!(value["percentage"], serde_json::json!(91.8));
    assert_eq!(value["grade"], "A");
}

#[test]
fn test_seed_response_from_report() {
    let report = SeedReport {
        added: 8,
        skipped: vec![Roll(101), Roll(104)],
    };
    let response = SeedResponse::from(&report);
    assert_eq!(response.added, 8);
    assert_eq!(response.skipped, vec![101, 104]);
    assert!(response.message.contains("8"));
}
