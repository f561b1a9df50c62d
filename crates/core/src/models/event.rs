use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::attendance::Session;
use crate::sessions::SessionState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDayResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub date: NaiveDate,
    pub fn_enabled: bool,
    pub an_enabled: bool,
    pub fn_start_time: NaiveTime,
    pub fn_end_time: NaiveTime,
    pub an_start_time: NaiveTime,
    pub an_end_time: NaiveTime,
    pub is_active: bool,
    /// Populated on the per-event day listing, where each day carries its
    /// attendance record count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub days: Vec<EventDayResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventDayRequest {
    pub date: NaiveDate,
    pub fn_enabled: Option<bool>,
    pub an_enabled: Option<bool>,
    pub fn_start_time: Option<NaiveTime>,
    pub fn_end_time: Option<NaiveTime>,
    pub an_start_time: Option<NaiveTime>,
    pub an_end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub days: Vec<CreateEventDayRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventDayRequest {
    pub fn_enabled: Option<bool>,
    pub an_enabled: Option<bool>,
    pub fn_start_time: Option<NaiveTime>,
    pub fn_end_time: Option<NaiveTime>,
    pub an_start_time: Option<NaiveTime>,
    pub an_end_time: Option<NaiveTime>,
    pub is_active: Option<bool>,
}

/// Read-only status of one session on the current day, derived per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub enabled: bool,
    /// Display window, e.g. "09:00 - 09:30".
    pub window: String,
    pub state: SessionState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forenoon: Option<SessionStatusResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<SessionStatusResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentEventResponse {
    pub event: EventResponse,
    pub current_day: EventDayResponse,
    pub active_session: Option<Session>,
    pub session_status: SessionStatusMap,
}
