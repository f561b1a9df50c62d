use crate::models::{AttendanceRecordDetail, DbAttendanceRecord, SessionRow, StudentDayRow, TrendRow};
use crate::repositories::ScopeFilter;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Upsert keyed on (student_id, event_day_id, session): the first mark for a
// key creates the record, every later mark overwrites status, marker, and
// mark-time while the creation timestamp is preserved.
const UPSERT_RECORD: &str = r#"
    INSERT INTO attendance_records (
        id, student_id, event_day_id, session, status,
        marked_by, marked_at, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $7, $7)
    ON CONFLICT (student_id, event_day_id, session)
    DO UPDATE SET status = EXCLUDED.status,
                  marked_by = EXCLUDED.marked_by,
                  marked_at = EXCLUDED.marked_at,
                  updated_at = EXCLUDED.updated_at
    RETURNING id, student_id, event_day_id, session, status,
              marked_by, marked_at, created_at, updated_at
"#;

const RECORD_DETAIL: &str = r#"
    SELECT ar.id, ar.student_id, ar.event_day_id, ar.session, ar.status,
           ar.marked_by, ar.marked_at, ar.created_at,
           s.name AS student_name, s.temp_roll_number, s.user_id AS student_user_id,
           s.brigade_id, b.name AS brigade_name,
           d.date AS day_date, e.id AS event_id, e.name AS event_name
    FROM attendance_records ar
    JOIN students s ON s.id = ar.student_id
    LEFT JOIN brigades b ON b.id = s.brigade_id
    JOIN event_days d ON d.id = ar.event_day_id
    JOIN events e ON e.id = d.event_id
"#;

// Scope and filter predicates shared by the listing and count queries; NULL
// parameters apply no restriction.
const RECORD_PREDICATES: &str = r#"
    WHERE ($1::uuid[] IS NULL OR s.brigade_id = ANY($1))
      AND ($2::uuid IS NULL OR s.user_id = $2)
      AND ($3::uuid IS NULL OR ar.event_day_id = $3)
      AND ($4::text IS NULL OR ar.session = $4)
      AND ($5::uuid IS NULL OR s.brigade_id = $5)
"#;

pub async fn upsert_record(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    event_day_id: Uuid,
    session: &str,
    status: &str,
    marked_by: Uuid,
) -> Result<DbAttendanceRecord> {
    let record = sqlx::query_as::<_, DbAttendanceRecord>(UPSERT_RECORD)
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(event_day_id)
        .bind(session)
        .bind(status)
        .bind(marked_by)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

    Ok(record)
}

/// Applies the upsert to every student in one transaction; if any row fails,
/// the whole batch rolls back and no mark takes effect.
pub async fn bulk_upsert_records(
    pool: &Pool<Postgres>,
    student_ids: &[Uuid],
    event_day_id: Uuid,
    session: &str,
    status: &str,
    marked_by: Uuid,
) -> Result<Vec<DbAttendanceRecord>> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let mut records = Vec::with_capacity(student_ids.len());
    for &student_id in student_ids {
        let record = sqlx::query_as::<_, DbAttendanceRecord>(UPSERT_RECORD)
            .bind(Uuid::new_v4())
            .bind(student_id)
            .bind(event_day_id)
            .bind(session)
            .bind(status)
            .bind(marked_by)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        records.push(record);
    }

    tx.commit().await?;

    Ok(records)
}

pub async fn get_record_detail(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<AttendanceRecordDetail>> {
    let detail = sqlx::query_as::<_, AttendanceRecordDetail>(&format!(
        "{RECORD_DETAIL} WHERE ar.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(detail)
}

pub async fn get_record_details_by_ids(
    pool: &Pool<Postgres>,
    ids: &[Uuid],
) -> Result<Vec<AttendanceRecordDetail>> {
    let details = sqlx::query_as::<_, AttendanceRecordDetail>(&format!(
        "{RECORD_DETAIL} WHERE ar.id = ANY($1) ORDER BY ar.created_at DESC"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(details)
}

#[allow(clippy::too_many_arguments)]
pub async fn query_records(
    pool: &Pool<Postgres>,
    scope: &ScopeFilter,
    event_day_id: Option<Uuid>,
    session: Option<&str>,
    brigade_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AttendanceRecordDetail>> {
    let records = sqlx::query_as::<_, AttendanceRecordDetail>(&format!(
        "{RECORD_DETAIL} {RECORD_PREDICATES} ORDER BY ar.created_at DESC LIMIT $6 OFFSET $7"
    ))
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .bind(event_day_id)
    .bind(session)
    .bind(brigade_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn count_records(
    pool: &Pool<Postgres>,
    scope: &ScopeFilter,
    event_day_id: Option<Uuid>,
    session: Option<&str>,
    brigade_id: Option<Uuid>,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*)
        FROM attendance_records ar
        JOIN students s ON s.id = ar.student_id
        {RECORD_PREDICATES}
        "#
    ))
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .bind(event_day_id)
    .bind(session)
    .bind(brigade_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// All scoped records for one event day (optionally one session), with their
/// display context; the day-summary input.
pub async fn day_records(
    pool: &Pool<Postgres>,
    scope: &ScopeFilter,
    event_day_id: Uuid,
    session: Option<&str>,
) -> Result<Vec<AttendanceRecordDetail>> {
    let records = sqlx::query_as::<_, AttendanceRecordDetail>(&format!(
        r#"
        {RECORD_DETAIL}
        WHERE ar.event_day_id = $1
          AND ($2::text IS NULL OR ar.session = $2)
          AND ($3::uuid[] IS NULL OR s.brigade_id = ANY($3))
          AND ($4::uuid IS NULL OR s.user_id = $4)
        ORDER BY ar.created_at DESC
        "#
    ))
    .bind(event_day_id)
    .bind(session)
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Scoped records created inside the given instant range, for trend
/// bucketing.
pub async fn trend_rows(
    pool: &Pool<Postgres>,
    scope: &ScopeFilter,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    brigade_id: Option<Uuid>,
) -> Result<Vec<TrendRow>> {
    let rows = sqlx::query_as::<_, TrendRow>(
        r#"
        SELECT ar.created_at, ar.session, ar.status
        FROM attendance_records ar
        JOIN students s ON s.id = ar.student_id
        WHERE ar.created_at >= $1 AND ar.created_at <= $2
          AND ($3::uuid[] IS NULL OR s.brigade_id = ANY($3))
          AND ($4::uuid IS NULL OR s.user_id = $4)
          AND ($5::uuid IS NULL OR s.brigade_id = $5)
        "#,
    )
    .bind(from)
    .bind(to)
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .bind(brigade_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn session_rows(pool: &Pool<Postgres>, scope: &ScopeFilter) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT ar.session, ar.status
        FROM attendance_records ar
        JOIN students s ON s.id = ar.student_id
        WHERE ($1::uuid[] IS NULL OR s.brigade_id = ANY($1))
          AND ($2::uuid IS NULL OR s.user_id = $2)
        "#,
    )
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// One student's records with the calendar date of each record's event day,
/// for the student dashboard.
pub async fn student_day_rows(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<StudentDayRow>> {
    let rows = sqlx::query_as::<_, StudentDayRow>(
        r#"
        SELECT ar.status, d.date AS day_date
        FROM attendance_records ar
        JOIN event_days d ON d.id = ar.event_day_id
        WHERE ar.student_id = $1
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Scoped record count, optionally restricted to one status and to a
/// creation-instant range; serves the dashboard counters.
pub async fn count_by_status(
    pool: &Pool<Postgres>,
    scope: &ScopeFilter,
    status: Option<&str>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM attendance_records ar
        JOIN students s ON s.id = ar.student_id
        WHERE ($1::uuid[] IS NULL OR s.brigade_id = ANY($1))
          AND ($2::uuid IS NULL OR s.user_id = $2)
          AND ($3::text IS NULL OR ar.status = $3)
          AND ($4::timestamptz IS NULL OR ar.created_at >= $4)
          AND ($5::timestamptz IS NULL OR ar.created_at < $5)
        "#,
    )
    .bind(&scope.brigade_ids)
    .bind(scope.user_id)
    .bind(status)
    .bind(created_from)
    .bind(created_to)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
