//! # Event Schedule Handlers
//!
//! Read surface over the event calendar plus the admin-only schedule
//! management endpoints. The current-day resolution feeds the marking UI:
//! which day is running, which sessions are enabled, and which one is open
//! right now.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::attendance::Session;
use rollcall_core::models::event::{
    CreateEventRequest, CurrentEventResponse, EventDayResponse, EventResponse,
    SessionStatusMap, SessionStatusResponse, UpdateEventDayRequest, UpdateEventRequest,
};
use rollcall_core::sessions;
use rollcall_db::models::DbEvent;
use rollcall_db::repositories::events;

use crate::middleware::{auth::Identity, error_handling::AppError};
use crate::{visibility, ApiState};

fn default_time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn event_response(event: DbEvent, days: Vec<EventDayResponse>) -> EventResponse {
    EventResponse {
        id: event.id,
        name: event.name,
        description: event.description,
        start_date: event.start_date,
        end_date: event.end_date,
        is_active: event.is_active,
        created_at: event.created_at,
        days,
    }
}

#[axum::debug_handler]
pub async fn get_events(
    State(state): State<Arc<ApiState>>,
    Identity(_user): Identity,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let active = events::list_active_events(&state.db_pool)
        .await
        .map_err(AttendanceError::Database)?;

    let mut responses = Vec::with_capacity(active.len());
    for event in active {
        let days = events::days_for_event(&state.db_pool, event.id)
            .await
            .map_err(AttendanceError::Database)?;
        responses.push(event_response(
            event,
            days.iter().map(|d| d.to_response()).collect(),
        ));
    }

    Ok(Json(responses))
}

/// Resolves the active event with an active day dated today, and derives the
/// status of each enabled session at this instant.
#[axum::debug_handler]
pub async fn current_event(
    State(state): State<Arc<ApiState>>,
    Identity(_user): Identity,
) -> Result<Json<CurrentEventResponse>, AppError> {
    let now = Local::now();
    let today = now.date_naive();

    let (event, day) = events::current_event_day(&state.db_pool, today)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| {
            AttendanceError::NotFound("No active event found for today".to_string())
        })?;

    let schedule = day.schedule();
    let time = now.time();

    let forenoon = schedule.forenoon.enabled.then(|| SessionStatusResponse {
        enabled: true,
        window: schedule.forenoon.display(),
        state: sessions::session_state(&schedule, Session::Forenoon, today, time),
    });
    let afternoon = schedule.afternoon.enabled.then(|| SessionStatusResponse {
        enabled: true,
        window: schedule.afternoon.display(),
        state: sessions::session_state(&schedule, Session::Afternoon, today, time),
    });
    let active_session = sessions::active_session(&schedule, today, time);

    let current_day = day.to_response();
    Ok(Json(CurrentEventResponse {
        event: event_response(event, vec![day.to_response()]),
        current_day,
        active_session,
        session_status: SessionStatusMap { forenoon, afternoon },
    }))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Identity(_user): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(AttendanceError::Database)?
        .ok_or_else(|| AttendanceError::NotFound("Event not found".to_string()))?;

    let days = events::days_for_event(&state.db_pool, id)
        .await
        .map_err(AttendanceError::Database)?;

    Ok(Json(event_response(
        event,
        days.iter().map(|d| d.to_response()).collect(),
    )))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    visibility::require_admin(&user)?;

    if payload.name.trim().is_empty() {
        return Err(AttendanceError::Validation("Event name is required".to_string()).into());
    }
    if payload.end_date <= payload.start_date {
        return Err(
            AttendanceError::Validation("End date must be after start date".to_string()).into(),
        );
    }

    let days: Vec<events::NewEventDay> = payload
        .days
        .iter()
        .map(|d| events::NewEventDay {
            date: d.date,
            fn_enabled: d.fn_enabled.unwrap_or(true),
            an_enabled: d.an_enabled.unwrap_or(true),
            fn_start_time: d.fn_start_time.unwrap_or_else(|| default_time(9, 0)),
            fn_end_time: d.fn_end_time.unwrap_or_else(|| default_time(9, 30)),
            an_start_time: d.an_start_time.unwrap_or_else(|| default_time(14, 0)),
            an_end_time: d.an_end_time.unwrap_or_else(|| default_time(14, 30)),
        })
        .collect();

    let (event, created_days) = events::create_event(
        &state.db_pool,
        &payload.name,
        payload.description.as_deref(),
        payload.start_date,
        payload.end_date,
        &days,
    )
    .await
    .map_err(AttendanceError::Database)?;

    tracing::info!("Event created: {} by {}", event.name, user.id);

    Ok(Json(event_response(
        event,
        created_days.iter().map(|d| d.to_response()).collect(),
    )))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    visibility::require_admin(&user)?;

    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if end <= start {
            return Err(
                AttendanceError::Validation("End date must be after start date".to_string())
                    .into(),
            );
        }
    }

    let event = events::update_event(
        &state.db_pool,
        id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.start_date,
        payload.end_date,
        payload.is_active,
    )
    .await
    .map_err(AttendanceError::Database)?
    .ok_or_else(|| AttendanceError::NotFound("Event not found".to_string()))?;

    let days = events::days_for_event(&state.db_pool, id)
        .await
        .map_err(AttendanceError::Database)?;

    tracing::info!("Event updated: {} by {}", event.name, user.id);

    Ok(Json(event_response(
        event,
        days.iter().map(|d| d.to_response()).collect(),
    )))
}

#[axum::debug_handler]
pub async fn update_event_day(
    State(state): State<Arc<ApiState>>,
    Identity(user): Identity,
    Path(day_id): Path<Uuid>,
    Json(payload): Json<UpdateEventDayRequest>,
) -> Result<Json<EventDayResponse>, AppError> {
    visibility::require_admin(&user)?;

    let day = events::update_event_day(
        &state.db_pool,
        day_id,
        payload.fn_enabled,
        payload.an_enabled,
        payload.fn_start_time,
        payload.fn_end_time,
        payload.an_start_time,
        payload.an_end_time,
        payload.is_active,
    )
    .await
    .map_err(AttendanceError::Database)?
    .ok_or_else(|| AttendanceError::NotFound("Event day not found".to_string()))?;

    tracing::info!("Event day updated: {} by {}", day.date, user.id);

    Ok(Json(day.to_response()))
}

#[axum::debug_handler]
pub async fn get_event_days(
    State(state): State<Arc<ApiState>>,
    Identity(_user): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EventDayResponse>>, AppError> {
    let days = events::active_days_with_counts(&state.db_pool, id)
        .await
        .map_err(AttendanceError::Database)?;

    let responses = days
        .into_iter()
        .map(|day| EventDayResponse {
            id: day.id,
            event_id: day.event_id,
            date: day.date,
            fn_enabled: day.fn_enabled,
            an_enabled: day.an_enabled,
            fn_start_time: day.fn_start_time,
            fn_end_time: day.fn_end_time,
            an_start_time: day.an_start_time,
            an_end_time: day.an_end_time,
            is_active: day.is_active,
            attendance_count: Some(day.attendance_count.max(0) as u64),
        })
        .collect();

    Ok(Json(responses))
}
