use axum::http::StatusCode;
use axum::response::IntoResponse;

use rollcall_api::middleware::error_handling::AppError;
use rollcall_core::errors::AttendanceError;

fn status_for(error: AttendanceError) -> StatusCode {
    AppError(error).into_response().status()
}

#[test]
fn test_error_to_status_mapping() {
    assert_eq!(
        status_for(AttendanceError::NotFound("Student not found".into())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_for(AttendanceError::Validation("Invalid session: XX".into())),
        StatusCode::BAD_REQUEST
    );
    // Business-rule rejections (window violations, disabled sessions) are
    // caller errors, not server faults
    assert_eq!(
        status_for(AttendanceError::Rejected(
            "Forenoon attendance can only be marked between 09:00 - 09:30".into()
        )),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(AttendanceError::Authentication("Missing x-user-id header".into())),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_for(AttendanceError::Authorization("Access denied".into())),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_for(AttendanceError::Database(eyre::eyre!("connection refused"))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_store_failure_detail_is_not_exposed() {
    let response = AppError(AttendanceError::Database(eyre::eyre!(
        "password authentication failed for user postgres"
    )))
    .into_response();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = String::from_utf8_lossy(&body);

    assert!(body.contains("Internal server error"));
    assert!(!body.contains("postgres"));
}

#[tokio::test]
async fn test_rejection_message_reaches_the_caller() {
    let response = AppError(AttendanceError::Rejected(
        "Afternoon attendance can only be marked between 14:00 - 14:30".to_string(),
    ))
    .into_response();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = String::from_utf8_lossy(&body);

    assert!(body.contains("14:00"));
    assert!(body.contains("14:30"));
}
