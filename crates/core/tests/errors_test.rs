use std::error::Error;
use rollcall_core::errors::{AttendanceError, AttendanceResult};

#[test]
fn test_attendance_error_display() {
    let not_found = AttendanceError::NotFound("Student not found".to_string());
    let validation = AttendanceError::Validation("Invalid session: XX".to_string());
    let authentication = AttendanceError::Authentication("Missing x-user-id header".to_string());
    let authorization = AttendanceError::Authorization("Access denied to this student".to_string());
    let rejected = AttendanceError::Rejected(
        "Forenoon attendance can only be marked between 09:00 - 09:30".to_string(),
    );
    let database = AttendanceError::Database(eyre::eyre!("Database connection failed"));
    let internal = AttendanceError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Student not found"
    );
    assert_eq!(
        validation.to_string(),
        "Validation error: Invalid session: XX"
    );
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Missing x-user-id header"
    );
    assert_eq!(
        authorization.to_string(),
        "Access denied: Access denied to this student"
    );
    // Business-rule rejections surface their message verbatim; the window
    // text is the whole point
    assert_eq!(
        rejected.to_string(),
        "Forenoon attendance can only be marked between 09:00 - 09:30"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let error = AttendanceError::Internal(Box::new(io_error));

    assert!(error.source().is_some());
}

#[test]
fn test_attendance_result() {
    let result: AttendanceResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: AttendanceResult<i32> = Err(AttendanceError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let report = eyre::eyre!("connection reset");
    let error: AttendanceError = report.into();

    assert!(matches!(error, AttendanceError::Database(_)));
}
