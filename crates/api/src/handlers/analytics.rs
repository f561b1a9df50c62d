//! # Analytics Handlers
//!
//! Dashboard, trend, comparison, and session breakdowns. Every aggregation
//! runs over an already-visibility-scoped record set; the math itself lives
//! in `rollcall_core::stats`.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::analytics::{
    AdminStats, BrigadeComparison, CurrentEventSummary, DashboardStats, LeadBrigade, LeadStats,
    SessionAnalysis, StudentInfo, StudentStats, TrendPoint,
};
use rollcall_core::models::attendance::{AttendanceStatus, Percentage};
use rollcall_core::models::auth::Role;
use rollcall_core::stats::{self, SessionFact, TrendFact, NO_BRIGADE};
use rollcall_db::repositories::{attendance, brigades, events, students, users, ScopeFilter};

use crate::middleware::{auth::Identity, error_handling::AppError};
use crate::{visibility, ApiState};

const DEFAULT_TREND_DAYS: i64 = 7;
const MAX_TREND_DAYS: i64 = 3650;

const PRESENT: &str = "PRESENT";

fn non_negative(n: i64) -> u64 {
    n.max(0) as u64
}

fn local_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Today's bounds as a half-open instant range, using the server's local
/// calendar day.
fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Local::now().date_naive();
    (
        local_midnight_utc(today),
        local_midnight_utc(today + Duration::days(1)),
    )
}

#[axum::debug_handler]
pub async fn dashboard_stats(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
) -> Result<Json<DashboardStats>, AppError> {
    let pool = &state.db_pool;
    let mut response = DashboardStats::default();

    match user.role {
        Role::Admin => {
            let total_students = students::count_active(pool)
                .await
                .map_err(AttendanceError::Database)?;
            let total_brigades = brigades::count_active(pool)
                .await
                .map_err(AttendanceError::Database)?;
            let total_brigade_leads = users::count_active_brigade_leads(pool)
                .await
                .map_err(AttendanceError::Database)?;
            let current_event = events::first_active_event_with_day_count(pool)
                .await
                .map_err(AttendanceError::Database)?
                .map(|(event, day_count)| CurrentEventSummary {
                    name: event.name,
                    total_days: non_negative(day_count),
                });

            let unrestricted = ScopeFilter::default();
            let (today_start, today_end) = local_day_bounds();
            let today_attendance = attendance::count_by_status(
                pool,
                &unrestricted,
                Some(PRESENT),
                Some(today_start),
                Some(today_end),
            )
            .await
            .map_err(AttendanceError::Database)?;
            let total_records = attendance::count_by_status(pool, &unrestricted, None, None, None)
                .await
                .map_err(AttendanceError::Database)?;
            let present_records =
                attendance::count_by_status(pool, &unrestricted, Some(PRESENT), None, None)
                    .await
                    .map_err(AttendanceError::Database)?;

            response.admin = Some(AdminStats {
                total_students: non_negative(total_students),
                total_brigades: non_negative(total_brigades),
                total_brigade_leads: non_negative(total_brigade_leads),
                today_attendance: non_negative(today_attendance),
                overall_attendance_percentage: Percentage::from_counts(
                    non_negative(present_records),
                    non_negative(total_records),
                ),
                current_event,
            });
        }
        Role::BrigadeLead => {
            let brigade_rows = brigades::lead_brigades_with_counts(pool, user.id)
                .await
                .map_err(AttendanceError::Database)?;
            let filter = ScopeFilter {
                brigade_ids: Some(brigade_rows.iter().map(|b| b.id).collect()),
                user_id: None,
            };

            let (today_start, today_end) = local_day_bounds();
            let today_attendance = attendance::count_by_status(
                pool,
                &filter,
                Some(PRESENT),
                Some(today_start),
                Some(today_end),
            )
            .await
            .map_err(AttendanceError::Database)?;
            let total_records = attendance::count_by_status(pool, &filter, None, None, None)
                .await
                .map_err(AttendanceError::Database)?;
            let present_records =
                attendance::count_by_status(pool, &filter, Some(PRESENT), None, None)
                    .await
                    .map_err(AttendanceError::Database)?;

            let total_students = brigade_rows
                .iter()
                .map(|b| non_negative(b.student_count))
                .sum();

            response.brigade_lead = Some(LeadStats {
                total_brigades: brigade_rows.len() as u64,
                total_students,
                today_attendance: non_negative(today_attendance),
                brigade_attendance_percentage: Percentage::from_counts(
                    non_negative(present_records),
                    non_negative(total_records),
                ),
                brigades: brigade_rows
                    .into_iter()
                    .map(|b| LeadBrigade {
                        id: b.id,
                        name: b.name,
                        student_count: non_negative(b.student_count),
                    })
                    .collect(),
            });
        }
        Role::Student => {
            // A login with no linked student yields an empty stats object
            if let Some(student) = students::by_user_id(pool, user.id)
                .await
                .map_err(AttendanceError::Database)?
            {
                let rows = attendance::student_day_rows(pool, student.id)
                    .await
                    .map_err(AttendanceError::Database)?;
                let today = Local::now().date_naive();

                let mut total_sessions = 0u64;
                let mut present_sessions = 0u64;
                let mut today_sessions = 0u64;
                let mut today_present = 0u64;
                for row in &rows {
                    let status: AttendanceStatus = row.status.parse()?;
                    let present = status == AttendanceStatus::Present;
                    total_sessions += 1;
                    if present {
                        present_sessions += 1;
                    }
                    if row.day_date == today {
                        today_sessions += 1;
                        if present {
                            today_present += 1;
                        }
                    }
                }

                response.student = Some(StudentStats {
                    student_info: StudentInfo {
                        temp_roll_number: student.temp_roll_number,
                        name: student.name,
                        brigade: student
                            .brigade_name
                            .unwrap_or_else(|| NO_BRIGADE.to_string()),
                    },
                    attendance_percentage: Percentage::from_counts(
                        present_sessions,
                        total_sessions,
                    ),
                    total_sessions,
                    present_sessions,
                    today_sessions,
                    today_present,
                });
            }
        }
    }

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
    pub brigade_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn attendance_trends(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, AppError> {
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;
    let filter = ScopeFilter::from(&scope);

    let brigade_id = if user.role == Role::Admin {
        query.brigade_id
    } else {
        None
    };

    let days = query
        .days
        .unwrap_or(DEFAULT_TREND_DAYS)
        .clamp(0, MAX_TREND_DAYS);
    let to = Utc::now();
    let from = to - Duration::days(days);

    let rows = attendance::trend_rows(&state.db_pool, &filter, from, to, brigade_id)
        .await
        .map_err(AttendanceError::Database)?;

    let mut facts = Vec::with_capacity(rows.len());
    for row in &rows {
        facts.push(TrendFact {
            // Buckets key on the record's creation date, not the event day
            date: row.created_at.date_naive(),
            session: row.session.parse()?,
            status: row.status.parse()?,
        });
    }

    Ok(Json(stats::trend_buckets(&facts)))
}

#[axum::debug_handler]
pub async fn brigade_comparison(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
) -> Result<Json<Vec<BrigadeComparison>>, AppError> {
    visibility::require_admin(&user)?;

    let rows = brigades::comparison_rows(&state.db_pool)
        .await
        .map_err(AttendanceError::Database)?;

    let comparison = rows
        .into_iter()
        .map(|row| {
            let total_records = non_negative(row.total_records);
            let present_records = non_negative(row.present_records);
            BrigadeComparison {
                id: row.id,
                name: row.name,
                total_students: non_negative(row.total_students),
                total_records,
                present_records,
                attendance_percentage: Percentage::from_counts(present_records, total_records),
            }
        })
        .collect();

    Ok(Json(comparison))
}

#[axum::debug_handler]
pub async fn session_analysis(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
) -> Result<Json<SessionAnalysis>, AppError> {
    let scope = visibility::resolve_scope(&state.db_pool, &user).await?;
    let filter = ScopeFilter::from(&scope);

    let rows = attendance::session_rows(&state.db_pool, &filter)
        .await
        .map_err(AttendanceError::Database)?;

    let mut facts = Vec::with_capacity(rows.len());
    for row in &rows {
        facts.push(SessionFact {
            session: row.session.parse()?,
            status: row.status.parse()?,
        });
    }

    Ok(Json(stats::session_analysis(&facts)))
}
