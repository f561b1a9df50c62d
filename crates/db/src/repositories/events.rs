use crate::models::{DbEvent, DbEventDay, EventDayWithCount};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Per-day configuration supplied when an event is created.
#[derive(Debug, Clone)]
pub struct NewEventDay {
    pub date: NaiveDate,
    pub fn_enabled: bool,
    pub an_enabled: bool,
    pub fn_start_time: NaiveTime,
    pub fn_end_time: NaiveTime,
    pub an_start_time: NaiveTime,
    pub an_end_time: NaiveTime,
}

pub async fn create_event(
    pool: &Pool<Postgres>,
    name: &str,
    description: Option<&str>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: &[NewEventDay],
) -> Result<(DbEvent, Vec<DbEventDay>)> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        INSERT INTO events (id, name, description, start_date, end_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, name, description, start_date, end_date, is_active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut created_days = Vec::with_capacity(days.len());
    for day in days {
        let created = sqlx::query_as::<_, DbEventDay>(
            r#"
            INSERT INTO event_days (
                id, event_id, date, fn_enabled, an_enabled,
                fn_start_time, fn_end_time, an_start_time, an_end_time,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id, event_id, date, fn_enabled, an_enabled,
                      fn_start_time, fn_end_time, an_start_time, an_end_time,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.id)
        .bind(day.date)
        .bind(day.fn_enabled)
        .bind(day.an_enabled)
        .bind(day.fn_start_time)
        .bind(day.fn_end_time)
        .bind(day.an_start_time)
        .bind(day.an_end_time)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        created_days.push(created);
    }

    tx.commit().await?;

    tracing::debug!("Event created: id={}, days={}", event.id, created_days.len());
    Ok((event, created_days))
}

pub async fn list_active_events(pool: &Pool<Postgres>) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, name, description, start_date, end_date, is_active, created_at, updated_at
        FROM events
        WHERE is_active = TRUE
        ORDER BY start_date DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, name, description, start_date, end_date, is_active, created_at, updated_at
        FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn days_for_event(pool: &Pool<Postgres>, event_id: Uuid) -> Result<Vec<DbEventDay>> {
    let days = sqlx::query_as::<_, DbEventDay>(
        r#"
        SELECT id, event_id, date, fn_enabled, an_enabled,
               fn_start_time, fn_end_time, an_start_time, an_end_time,
               is_active, created_at, updated_at
        FROM event_days
        WHERE event_id = $1
        ORDER BY date ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(days)
}

pub async fn active_days_with_counts(
    pool: &Pool<Postgres>,
    event_id: Uuid,
) -> Result<Vec<EventDayWithCount>> {
    let days = sqlx::query_as::<_, EventDayWithCount>(
        r#"
        SELECT d.id, d.event_id, d.date, d.fn_enabled, d.an_enabled,
               d.fn_start_time, d.fn_end_time, d.an_start_time, d.an_end_time,
               d.is_active, d.created_at, d.updated_at,
               COUNT(ar.id) AS attendance_count
        FROM event_days d
        LEFT JOIN attendance_records ar ON ar.event_day_id = d.id
        WHERE d.event_id = $1 AND d.is_active = TRUE
        GROUP BY d.id
        ORDER BY d.date ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(days)
}

pub async fn get_event_day(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEventDay>> {
    let day = sqlx::query_as::<_, DbEventDay>(
        r#"
        SELECT id, event_id, date, fn_enabled, an_enabled,
               fn_start_time, fn_end_time, an_start_time, an_end_time,
               is_active, created_at, updated_at
        FROM event_days
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(day)
}

pub async fn update_event(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: Option<bool>,
) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        UPDATE events
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            start_date = COALESCE($4, start_date),
            end_date = COALESCE($5, end_date),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, start_date, end_date, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(start_date)
    .bind(end_date)
    .bind(is_active)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_event_day(
    pool: &Pool<Postgres>,
    id: Uuid,
    fn_enabled: Option<bool>,
    an_enabled: Option<bool>,
    fn_start_time: Option<NaiveTime>,
    fn_end_time: Option<NaiveTime>,
    an_start_time: Option<NaiveTime>,
    an_end_time: Option<NaiveTime>,
    is_active: Option<bool>,
) -> Result<Option<DbEventDay>> {
    let day = sqlx::query_as::<_, DbEventDay>(
        r#"
        UPDATE event_days
        SET fn_enabled = COALESCE($2, fn_enabled),
            an_enabled = COALESCE($3, an_enabled),
            fn_start_time = COALESCE($4, fn_start_time),
            fn_end_time = COALESCE($5, fn_end_time),
            an_start_time = COALESCE($6, an_start_time),
            an_end_time = COALESCE($7, an_end_time),
            is_active = COALESCE($8, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, event_id, date, fn_enabled, an_enabled,
                  fn_start_time, fn_end_time, an_start_time, an_end_time,
                  is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(fn_enabled)
    .bind(an_enabled)
    .bind(fn_start_time)
    .bind(fn_end_time)
    .bind(an_start_time)
    .bind(an_end_time)
    .bind(is_active)
    .fetch_optional(pool)
    .await?;

    Ok(day)
}

/// Finds the active event that has an active day on the given calendar date,
/// together with that day. None when no event is running today.
pub async fn current_event_day(
    pool: &Pool<Postgres>,
    today: NaiveDate,
) -> Result<Option<(DbEvent, DbEventDay)>> {
    let row = sqlx::query_as::<_, DbEventDay>(
        r#"
        SELECT d.id, d.event_id, d.date, d.fn_enabled, d.an_enabled,
               d.fn_start_time, d.fn_end_time, d.an_start_time, d.an_end_time,
               d.is_active, d.created_at, d.updated_at
        FROM event_days d
        JOIN events e ON e.id = d.event_id
        WHERE d.date = $1 AND d.is_active = TRUE AND e.is_active = TRUE
        ORDER BY d.date ASC
        LIMIT 1
        "#,
    )
    .bind(today)
    .fetch_optional(pool)
    .await?;

    let Some(day) = row else {
        return Ok(None);
    };

    let event = get_event_by_id(pool, day.event_id)
        .await?
        .ok_or_else(|| eyre::eyre!("event day {} references missing event", day.id))?;

    Ok(Some((event, day)))
}

/// The first active event and its day count, for the admin dashboard.
pub async fn first_active_event_with_day_count(
    pool: &Pool<Postgres>,
) -> Result<Option<(DbEvent, i64)>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, name, description, start_date, end_date, is_active, created_at, updated_at
        FROM events
        WHERE is_active = TRUE
        ORDER BY created_at ASC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(event) = event else {
        return Ok(None);
    };

    let day_count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM event_days WHERE event_id = $1
        "#,
    )
    .bind(event.id)
    .fetch_one(pool)
    .await?;

    Ok(Some((event, day_count)))
}
