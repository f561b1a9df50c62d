mod test_utils;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use rollcall_api::middleware::error_handling::AppError;
use rollcall_api::visibility;
use rollcall_core::errors::AttendanceError;
use rollcall_core::models::attendance::{
    AttendanceRecordResponse, AttendanceStatus, BulkMarkAttendanceRequest, MarkAttendanceRequest,
    Session,
};
use rollcall_core::models::auth::{AuthUser, VisibilityScope};
use rollcall_core::sessions;
use rollcall_db::models::DbAttendanceRecord;

use test_utils::*;

// Wrapper that mirrors the mark handler's flow — visibility, then the
// window validator, then the upsert — with the repositories mocked and the
// clock injected.
async fn mark_with_mocks(
    ctx: &TestContext,
    user: AuthUser,
    scope: &VisibilityScope,
    request: &MarkAttendanceRequest,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<AttendanceRecordResponse, AppError> {
    visibility::require_marker(&user)?;

    let student = ctx
        .student_repo
        .get_with_brigade(request.student_id)
        .await?
        .ok_or_else(|| AttendanceError::NotFound("Student not found".to_string()))?;
    visibility::ensure_student_in_scope(scope, &student)?;

    let day = ctx
        .event_repo
        .get_event_day(request.event_day_id)
        .await?
        .ok_or_else(|| AttendanceError::NotFound("Event day not found or inactive".to_string()))?;
    sessions::check_mark_allowed(&day.schedule(), request.session, today, now)?;

    let record = ctx
        .attendance_repo
        .upsert_record(
            request.student_id,
            request.event_day_id,
            request.session.as_str(),
            request.status.as_str(),
            user.id,
        )
        .await?;

    let detail = ctx
        .attendance_repo
        .get_record_detail(record.id)
        .await?
        .ok_or_else(|| AttendanceError::Database(eyre::eyre!("marked record not readable")))?;

    Ok(detail.into_response()?)
}

// Same shape for the bulk path: batch validation happens once, before the
// single transactional write.
async fn bulk_mark_with_mocks(
    ctx: &TestContext,
    user: AuthUser,
    scope: &VisibilityScope,
    request: &BulkMarkAttendanceRequest,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<Vec<DbAttendanceRecord>, AppError> {
    visibility::require_marker(&user)?;

    let batch = ctx
        .student_repo
        .active_by_ids(request.student_ids.clone())
        .await?;
    if batch.len() != request.student_ids.len() {
        return Err(AttendanceError::Validation("Some students not found".to_string()).into());
    }
    if batch.iter().any(|s| !scope.allows_brigade(s.brigade_id)) {
        return Err(
            AttendanceError::Authorization("Access denied to some students".to_string()).into(),
        );
    }

    let day = ctx
        .event_repo
        .get_event_day(request.event_day_id)
        .await?
        .ok_or_else(|| AttendanceError::NotFound("Event day not found or inactive".to_string()))?;
    sessions::check_mark_allowed(&day.schedule(), request.session, today, now)?;

    let records = ctx
        .attendance_repo
        .bulk_upsert_records(
            request.student_ids.clone(),
            request.event_day_id,
            request.session.as_str(),
            request.status.as_str(),
            user.id,
        )
        .await?;

    Ok(records)
}

fn mark_request(student_id: Uuid, event_day_id: Uuid, status: AttendanceStatus) -> MarkAttendanceRequest {
    MarkAttendanceRequest {
        student_id,
        event_day_id,
        session: Session::Forenoon,
        status,
    }
}

#[tokio::test]
async fn test_mark_creates_record_inside_window() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);

    let brigade_id = Uuid::new_v4();
    let student = student_row(Some(brigade_id), Some("Brigade Alpha"));
    let day = event_day_row(today);
    let request = mark_request(student.id, day.id, AttendanceStatus::Present);

    let record = record_row(student.id, day.id, "FN", "PRESENT", user.id);
    let detail = detail_row(&record, &student, &day);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .with(predicate::eq(student.id))
            .returning(move |_| Ok(Some(student.clone())));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .with(predicate::eq(day.id))
            .returning(move |_| Ok(Some(day.clone())));
    }
    {
        let record = record.clone();
        ctx.attendance_repo
            .expect_upsert_record()
            .times(1)
            .returning(move |_, _, _, _, _| Ok(record.clone()));
    }
    {
        let detail = detail.clone();
        ctx.attendance_repo
            .expect_get_record_detail()
            .with(predicate::eq(record.id))
            .returning(move |_| Ok(Some(detail.clone())));
    }

    let response = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(9, 15),
    )
    .await
    .expect("mark should succeed at 09:15");

    assert_eq!(response.id, record.id);
    assert_eq!(response.status, AttendanceStatus::Present);
    assert_eq!(response.session, Session::Forenoon);
    assert_eq!(response.student.id, student.id);
    assert_eq!(
        response.student.brigade.as_ref().map(|b| b.name.as_str()),
        Some("Brigade Alpha")
    );
}

// Marking the same key again overwrites the status and mark-time while the
// creation timestamp survives from the first mark.
#[tokio::test]
async fn test_remark_overwrites_status_and_preserves_creation_time() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);

    let student = student_row(Some(Uuid::new_v4()), Some("Brigade Alpha"));
    let day = event_day_row(today);
    let request = mark_request(student.id, day.id, AttendanceStatus::Late);

    let created_at = Utc::now() - Duration::minutes(10);
    let mut record = record_row(student.id, day.id, "FN", "LATE", user.id);
    record.created_at = created_at;
    let detail = detail_row(&record, &student, &day);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .returning(move |_| Ok(Some(student.clone())));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .returning(move |_| Ok(Some(day.clone())));
    }
    {
        let record = record.clone();
        ctx.attendance_repo
            .expect_upsert_record()
            .with(
                predicate::eq(student.id),
                predicate::eq(day.id),
                predicate::eq("FN"),
                predicate::eq("LATE"),
                predicate::eq(user.id),
            )
            .times(1)
            .returning(move |_, _, _, _, _| Ok(record.clone()));
    }
    {
        let detail = detail.clone();
        ctx.attendance_repo
            .expect_get_record_detail()
            .returning(move |_| Ok(Some(detail.clone())));
    }

    let response = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(9, 20),
    )
    .await
    .expect("overwrite should succeed at 09:20");

    assert_eq!(response.status, AttendanceStatus::Late);
    assert_eq!(response.created_at, created_at);
    assert!(response.marked_at > created_at);
}

#[tokio::test]
async fn test_mark_unknown_student_is_not_found() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);
    let request = mark_request(Uuid::new_v4(), Uuid::new_v4(), AttendanceStatus::Present);

    ctx.student_repo
        .expect_get_with_brigade()
        .returning(|_| Ok(None));
    ctx.attendance_repo.expect_upsert_record().times(0);

    let err = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(9, 15),
    )
    .await
    .expect_err("unknown student must reject");

    assert!(matches!(err.0, AttendanceError::NotFound(_)));
}

#[tokio::test]
async fn test_lead_cannot_mark_student_outside_their_brigades() {
    let mut ctx = TestContext::new();
    let user = lead_user();
    let today = date(2026, 3, 10);

    let led_brigade = Uuid::new_v4();
    let other_brigade = Uuid::new_v4();
    let student = student_row(Some(other_brigade), Some("Brigade Beta"));
    let request = mark_request(student.id, Uuid::new_v4(), AttendanceStatus::Present);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .returning(move |_| Ok(Some(student.clone())));
    }
    // Authorization precedes every later check; nothing may be written
    ctx.event_repo.expect_get_event_day().times(0);
    ctx.attendance_repo.expect_upsert_record().times(0);

    let err = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Brigades(vec![led_brigade]),
        &request,
        today,
        // Outside the window too; the forbidden error must win
        time(23, 0),
    )
    .await
    .expect_err("out-of-scope student must reject");

    match err.0 {
        AttendanceError::Authorization(message) => {
            assert_eq!(message, "Access denied to this student");
        }
        other => panic!("expected Authorization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_lead_can_mark_student_in_their_brigade() {
    let mut ctx = TestContext::new();
    let user = lead_user();
    let today = date(2026, 3, 10);

    let led_brigade = Uuid::new_v4();
    let student = student_row(Some(led_brigade), Some("Brigade Alpha"));
    let day = event_day_row(today);
    let request = mark_request(student.id, day.id, AttendanceStatus::Present);

    let record = record_row(student.id, day.id, "FN", "PRESENT", user.id);
    let detail = detail_row(&record, &student, &day);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .returning(move |_| Ok(Some(student.clone())));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .returning(move |_| Ok(Some(day.clone())));
    }
    {
        let record = record.clone();
        ctx.attendance_repo
            .expect_upsert_record()
            .times(1)
            .returning(move |_, _, _, _, _| Ok(record.clone()));
    }
    {
        let detail = detail.clone();
        ctx.attendance_repo
            .expect_get_record_detail()
            .returning(move |_| Ok(Some(detail.clone())));
    }

    let response = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Brigades(vec![led_brigade]),
        &request,
        today,
        time(9, 10),
    )
    .await
    .expect("in-scope student should succeed");

    assert_eq!(response.student.id, student.id);
}

#[tokio::test]
async fn test_student_role_cannot_mark() {
    let ctx = TestContext::new();
    let user = student_user();
    let today = date(2026, 3, 10);
    let request = mark_request(Uuid::new_v4(), Uuid::new_v4(), AttendanceStatus::Present);

    let err = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::LinkedUser(user.id),
        &request,
        today,
        time(9, 15),
    )
    .await
    .expect_err("students cannot mark");

    assert!(matches!(err.0, AttendanceError::Authorization(_)));
}

#[tokio::test]
async fn test_mark_outside_window_today_is_rejected() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);

    let student = student_row(Some(Uuid::new_v4()), Some("Brigade Alpha"));
    let day = event_day_row(today);
    let request = mark_request(student.id, day.id, AttendanceStatus::Present);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .returning(move |_| Ok(Some(student.clone())));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .returning(move |_| Ok(Some(day.clone())));
    }
    ctx.attendance_repo.expect_upsert_record().times(0);

    let err = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(9, 31),
    )
    .await
    .expect_err("window violation must reject");

    match err.0 {
        AttendanceError::Rejected(message) => {
            assert!(message.contains("09:00") && message.contains("09:30"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mark_on_past_day_skips_window_check() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    // Evaluated two days after the event day's date
    let day_date = date(2026, 3, 10);
    let today = date(2026, 3, 12);

    let student = student_row(Some(Uuid::new_v4()), Some("Brigade Alpha"));
    let day = event_day_row(day_date);
    let request = mark_request(student.id, day.id, AttendanceStatus::Absent);

    let record = record_row(student.id, day.id, "FN", "ABSENT", user.id);
    let detail = detail_row(&record, &student, &day);

    {
        let student = student.clone();
        ctx.student_repo
            .expect_get_with_brigade()
            .returning(move |_| Ok(Some(student.clone())));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .returning(move |_| Ok(Some(day.clone())));
    }
    {
        let record = record.clone();
        ctx.attendance_repo
            .expect_upsert_record()
            .times(1)
            .returning(move |_, _, _, _, _| Ok(record.clone()));
    }
    {
        let detail = detail.clone();
        ctx.attendance_repo
            .expect_get_record_detail()
            .returning(move |_| Ok(Some(detail.clone())));
    }

    let response = mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(23, 45),
    )
    .await
    .expect("no window check applies to a non-today day");

    assert_eq!(response.status, AttendanceStatus::Absent);
}

#[tokio::test]
async fn test_bulk_mark_rejects_whole_batch_on_unknown_student() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);

    // Ten ids requested, only nine resolve; the whole call must reject with
    // zero writes
    let known: Vec<_> = (0..9)
        .map(|_| student_row(Some(Uuid::new_v4()), Some("Brigade Alpha")))
        .collect();
    let mut ids: Vec<Uuid> = known.iter().map(|s| s.id).collect();
    ids.push(Uuid::new_v4());

    let request = BulkMarkAttendanceRequest {
        student_ids: ids,
        event_day_id: Uuid::new_v4(),
        session: Session::Forenoon,
        status: AttendanceStatus::Present,
    };

    ctx.student_repo
        .expect_active_by_ids()
        .returning(move |_| Ok(known.clone()));
    ctx.attendance_repo.expect_bulk_upsert_records().times(0);

    let err = bulk_mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(9, 15),
    )
    .await
    .expect_err("partial unknown batch must reject");

    match err.0 {
        AttendanceError::Validation(message) => assert_eq!(message, "Some students not found"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_mark_rejects_batch_with_out_of_scope_student() {
    let mut ctx = TestContext::new();
    let user = lead_user();
    let today = date(2026, 3, 10);

    let led_brigade = Uuid::new_v4();
    let in_scope = student_row(Some(led_brigade), Some("Brigade Alpha"));
    let out_of_scope = student_row(Some(Uuid::new_v4()), Some("Brigade Beta"));
    let batch = vec![in_scope.clone(), out_of_scope.clone()];

    let request = BulkMarkAttendanceRequest {
        student_ids: vec![in_scope.id, out_of_scope.id],
        event_day_id: Uuid::new_v4(),
        session: Session::Forenoon,
        status: AttendanceStatus::Present,
    };

    ctx.student_repo
        .expect_active_by_ids()
        .returning(move |_| Ok(batch.clone()));
    ctx.attendance_repo.expect_bulk_upsert_records().times(0);

    let err = bulk_mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Brigades(vec![led_brigade]),
        &request,
        today,
        time(9, 15),
    )
    .await
    .expect_err("batch with out-of-scope student must reject");

    assert!(matches!(err.0, AttendanceError::Authorization(_)));
}

#[tokio::test]
async fn test_bulk_mark_applies_whole_batch() {
    let mut ctx = TestContext::new();
    let user = admin_user();
    let today = date(2026, 3, 10);

    let day = event_day_row(today);
    let batch: Vec<_> = (0..3)
        .map(|_| student_row(Some(Uuid::new_v4()), Some("Brigade Alpha")))
        .collect();
    let ids: Vec<Uuid> = batch.iter().map(|s| s.id).collect();

    let request = BulkMarkAttendanceRequest {
        student_ids: ids.clone(),
        event_day_id: day.id,
        session: Session::Afternoon,
        status: AttendanceStatus::Present,
    };

    {
        let batch = batch.clone();
        ctx.student_repo
            .expect_active_by_ids()
            .returning(move |_| Ok(batch.clone()));
    }
    {
        let day = day.clone();
        ctx.event_repo
            .expect_get_event_day()
            .returning(move |_| Ok(Some(day.clone())));
    }
    {
        let day_id = day.id;
        let user_id = user.id;
        ctx.attendance_repo
            .expect_bulk_upsert_records()
            .times(1)
            .returning(move |ids, _, session, status, _| {
                Ok(ids
                    .iter()
                    .map(|&sid| record_row(sid, day_id, session, status, user_id))
                    .collect())
            });
    }

    let records = bulk_mark_with_mocks(
        &ctx,
        user,
        &VisibilityScope::Unrestricted,
        &request,
        today,
        time(14, 10),
    )
    .await
    .expect("bulk mark should succeed at 14:10");

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == "PRESENT" && r.session == "AN"));
}
