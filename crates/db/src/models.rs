use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::attendance::{
    AttendanceRecordResponse, BrigadeSummary, EventDaySummary, StudentSummary,
};
use rollcall_core::models::event::EventDayResponse;
use rollcall_core::sessions::{DaySchedule, SessionWindow};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEventDay {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbEventDay {
    /// The schedule facts the session window validator operates on.
    pub fn schedule(&self) -> DaySchedule {
        DaySchedule {
            date: self.date,
            is_active: self.is_active,
            forenoon: SessionWindow {
                enabled: self.fn_enabled,
                start: self.fn_start_time,
                end: self.fn_end_time,
            },
            afternoon: SessionWindow {
                enabled: self.an_enabled,
                start: self.an_start_time,
                end: self.an_end_time,
            },
        }
    }

    pub fn to_response(&self) -> EventDayResponse {
        EventDayResponse {
            id: self.id,
            event_id: self.event_id,
            date: self.date,
            fn_enabled: self.fn_enabled,
            an_enabled: self.an_enabled,
            fn_start_time: self.fn_start_time,
            fn_end_time: self.fn_end_time,
            an_start_time: self.an_start_time,
            an_end_time: self.an_end_time,
            is_active: self.is_active,
            attendance_count: None,
        }
    }
}

/// Event day plus its attendance record count, for the per-event day listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventDayWithCount {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attendance_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBrigade {
    pub id: Uuid,
    pub name: String,
    pub leader_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student row joined with its brigade's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentWithBrigade {
    pub id: Uuid,
    pub temp_roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub brigade_id: Option<Uuid>,
    pub brigade_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub event_day_id: Uuid,
    pub session: String,
    pub status: String,
    pub marked_by: Option<Uuid>,
    pub marked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance record joined with the student, brigade, day, and event
/// context the clients render.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecordDetail {
    pub id: Uuid,
    pub student_id: Uuid,
    pub event_day_id: Uuid,
    pub session: String,
    pub status: String,
    pub marked_by: Option<Uuid>,
    pub marked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    pub temp_roll_number: String,
    pub student_user_id: Option<Uuid>,
    pub brigade_id: Option<Uuid>,
    pub brigade_name: Option<String>,
    pub day_date: NaiveDate,
    pub event_id: Uuid,
    pub event_name: String,
}

impl AttendanceRecordDetail {
    pub fn into_response(self) -> Result<AttendanceRecordResponse, AttendanceError> {
        let brigade = match (self.brigade_id, self.brigade_name) {
            (Some(id), Some(name)) => Some(BrigadeSummary { id, name }),
            _ => None,
        };

        Ok(AttendanceRecordResponse {
            id: self.id,
            student: StudentSummary {
                id: self.student_id,
                temp_roll_number: self.temp_roll_number,
                name: self.student_name,
                brigade,
            },
            event_day: EventDaySummary {
                id: self.event_day_id,
                date: self.day_date,
                event_id: self.event_id,
                event_name: self.event_name,
            },
            session: self.session.parse()?,
            status: self.status.parse()?,
            marked_by: self.marked_by,
            marked_at: self.marked_at,
            created_at: self.created_at,
        })
    }
}

/// Aggregated comparison row, one per active brigade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BrigadeComparisonRow {
    pub id: Uuid,
    pub name: String,
    pub total_students: i64,
    pub total_records: i64,
    pub present_records: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadBrigadeRow {
    pub id: Uuid,
    pub name: String,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrendRow {
    pub created_at: DateTime<Utc>,
    pub session: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRow {
    pub session: String,
    pub status: String,
}

/// Status plus the event day's calendar date, for the student dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentDayRow {
    pub status: String,
    pub day_date: NaiveDate,
}
