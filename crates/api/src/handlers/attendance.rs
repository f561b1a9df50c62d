//! # Attendance Handlers
//!
//! The write path (mark, bulk-mark) runs visibility resolution first, then
//! the session window validator, then the upsert against the record store.
//! Reads (listing, day summary) run through the same visibility filter
//! before touching the store.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::attendance::{
    AttendanceListResponse, AttendanceRecordResponse, AttendanceSummaryResponse,
    BulkMarkAttendanceRequest, BulkMarkAttendanceResponse, MarkAttendanceRequest, Pagination,
    Session,
};
use rollcall_core::models::auth::Role;
use rollcall_core::sessions;
use rollcall_core::stats::{self, SummaryFact};
use rollcall_db::models::AttendanceRecordDetail;
use rollcall_db::repositories::{attendance, events, students, ScopeFilter};

use crate::middleware::{auth::Identity, error_handling::AppError};
use crate::{notify, visibility, ApiState};

const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub event_day_id: Option<Uuid>,
    pub brigade_id: Option<Uuid>,
    pub session: Option<Session>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub session: Option<Session>,
}

fn into_responses(
    details: Vec<AttendanceRecordDetail>,
) -> Result<Vec<AttendanceRecordResponse>, AttendanceError> {
    details
        .into_iter()
        .map(AttendanceRecordDetail::into_response)
        .collect()
}

#[axum::debug_handler]
pub async fn get_attendance(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceListResponse>, AppError> {
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;
    let filter = ScopeFilter::from(&scope);

    // Explicit brigade filtering is an admin-only refinement; other roles
    // are already narrowed by their scope
    let brigade_id = if user.role == Role::Admin {
        query.brigade_id
    } else {
        None
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let offset = i64::from(page - 1) * i64::from(limit);
    let session = query.session.map(|s| s.as_str());

    let records = attendance::query_records(
        &state.db_pool,
        &filter,
        query.event_day_id,
        session,
        brigade_id,
        i64::from(limit),
        offset,
    )
    .await
    .map_err(AttendanceError::Database)?;

    let total = attendance::count_records(
        &state.db_pool,
        &filter,
        query.event_day_id,
        session,
        brigade_id,
    )
    .await
    .map_err(AttendanceError::Database)?;

    let total_items = total.max(0) as u64;
    let total_pages = total_items.div_ceil(u64::from(limit)) as u32;

    Ok(Json(AttendanceListResponse {
        records: into_responses(records)?,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
        },
    }))
}

#[axum::debug_handler]
pub async fn mark_attendance(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Json<AttendanceRecordResponse>, AppError> {
    visibility::require_marker(&user)?;
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;

    // Check the student exists and the caller may touch them
    let student = students::get_with_brigade(&state.db_pool, payload.student_id)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| AttendanceError::NotFound("Student not found".to_string()))?;
    visibility::ensure_student_in_scope(&scope, &student)?;

    // Check the event day exists; the validator handles the inactive and
    // window rules
    let day = events::get_event_day(&state.db_pool, payload.event_day_id)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| AttendanceError::NotFound("Event day not found or inactive".to_string()))?;

    let now = Local::now();
    sessions::check_mark_allowed(&day.schedule(), payload.session, now.date_naive(), now.time())?;

    let record = attendance::upsert_record(
        &state.db_pool,
        payload.student_id,
        payload.event_day_id,
        payload.session.as_str(),
        payload.status.as_str(),
        user.id,
    )
    .await
    .map_err(AttendanceError::Database)?;

    let detail = attendance::get_record_detail(&state.db_pool, record.id)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| {
            AttendanceError::Database(eyre::eyre!("marked record {} not readable", record.id))
        })?;

    // Push toward the student's live channel; delivery failures never roll
    // back the write
    if let Some(user_id) = detail.student_user_id {
        state
            .notifier
            .attendance_marked(notify::AttendanceMarked::new(
                user_id,
                payload.session,
                payload.status,
            ));
    }

    tracing::info!(
        "Attendance marked: {} - {} - {} by {}",
        student.temp_roll_number,
        payload.session,
        payload.status,
        user.id
    );

    Ok(Json(detail.into_response()?))
}

#[axum::debug_handler]
pub async fn bulk_mark_attendance(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Json(payload): Json<BulkMarkAttendanceRequest>,
) -> Result<Json<BulkMarkAttendanceResponse>, AppError> {
    visibility::require_marker(&user)?;
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;

    // Verify every student in the batch before any write
    let batch = students::active_by_ids(&state.db_pool, &payload.student_ids)
        .await
        .map_err(AttendanceError::Database)?;

    if batch.len() != payload.student_ids.len() {
        return Err(AttendanceError::Validation("Some students not found".to_string()).into());
    }

    if batch.iter().any(|s| !scope.allows_brigade(s.brigade_id)) {
        return Err(
            AttendanceError::Authorization("Access denied to some students".to_string()).into(),
        );
    }

    let day = events::get_event_day(&state.db_pool, payload.event_day_id)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| AttendanceError::NotFound("Event day not found or inactive".to_string()))?;

    let now = Local::now();
    sessions::check_mark_allowed(&day.schedule(), payload.session, now.date_naive(), now.time())?;

    // All-or-nothing: the repository applies the whole batch in one
    // transaction
    let records = attendance::bulk_upsert_records(
        &state.db_pool,
        &payload.student_ids,
        payload.event_day_id,
        payload.session.as_str(),
        payload.status.as_str(),
        user.id,
    )
    .await
    .map_err(AttendanceError::Database)?;

    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let details = attendance::get_record_details_by_ids(&state.db_pool, &ids)
        .await
        .map_err(AttendanceError::Database)?;

    for detail in &details {
        if let Some(user_id) = detail.student_user_id {
            state
                .notifier
                .attendance_marked(notify::AttendanceMarked::new(
                    user_id,
                    payload.session,
                    payload.status,
                ));
        }
    }

    tracing::info!(
        "Bulk attendance marked: {} students - {} - {} by {}",
        records.len(),
        payload.session,
        payload.status,
        user.id
    );

    let count = records.len();
    Ok(Json(BulkMarkAttendanceResponse {
        message: format!("Attendance marked for {count} students"),
        count,
        records: into_responses(details)?,
    }))
}

#[axum::debug_handler]
pub async fn attendance_summary(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Path(event_day_id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<AttendanceSummaryResponse>, AppError> {
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;
    let filter = ScopeFilter::from(&scope);

    let rows = attendance::day_records(
        &state.db_pool,
        &filter,
        event_day_id,
        query.session.map(|s| s.as_str()),
    )
    .await
    .map_err(AttendanceError::Database)?;

    let mut facts = Vec::with_capacity(rows.len());
    for row in &rows {
        facts.push(SummaryFact {
            status: row.status.parse()?,
            brigade: row.brigade_name.clone(),
        });
    }

    let (summary, brigade_stats) = stats::summarize(&facts);

    Ok(Json(AttendanceSummaryResponse {
        summary,
        brigade_stats,
        records: into_responses(rows)?,
    }))
}
