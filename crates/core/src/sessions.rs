//! Session window validation.
//!
//! Decides whether an attendance mark is currently legal for a given event
//! day and session, and derives the read-only session status shown on
//! dashboards. Everything here is a pure function of the day's schedule and
//! the caller-supplied clock; nothing is stored.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::AttendanceError;
use crate::models::attendance::Session;

/// Configuration of one session slot on an event day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    /// Display form used in status payloads and rejection messages.
    pub fn display(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// The schedule facts the validator needs about one event day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_active: bool,
    pub forenoon: SessionWindow,
    pub afternoon: SessionWindow,
}

impl DaySchedule {
    pub fn window(&self, session: Session) -> &SessionWindow {
        match session {
            Session::Forenoon => &self.forenoon,
            Session::Afternoon => &self.afternoon,
        }
    }
}

/// Derived status of a session slot relative to the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// The day's date is not today's calendar date.
    Inactive,
    /// Today, before the window opens.
    Upcoming,
    /// Today, within the window (inclusive at both ends).
    Active,
    /// Today, after the window closed.
    Ended,
}

// Window bounds have minute resolution, so the current time is truncated to
// the minute before comparing; 09:30:59 still falls inside a window ending
// at 09:30.
fn to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Checks whether marking the given session is currently permitted.
///
/// Rules, in order: the day must be active; the session must be enabled on
/// that day; and only when the day's date equals today's calendar date, the
/// current time of day must lie within the session's window. Marks against
/// past or future days carry no time-of-day restriction at all.
pub fn check_mark_allowed(
    day: &DaySchedule,
    session: Session,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<(), AttendanceError> {
    if !day.is_active {
        return Err(AttendanceError::NotFound(
            "Event day not found or inactive".to_string(),
        ));
    }

    let window = day.window(session);
    if !window.enabled {
        return Err(AttendanceError::Rejected(format!(
            "{} session is not enabled for this day",
            session.label()
        )));
    }

    if day.date == today {
        let current = to_minute(now);
        if current < window.start || current > window.end {
            return Err(AttendanceError::Rejected(format!(
                "{} attendance can only be marked between {}",
                session.label(),
                window.display()
            )));
        }
    }

    Ok(())
}

/// Classifies a session slot for display. Ignores the enabled flag; callers
/// only surface status for enabled sessions.
pub fn session_state(
    day: &DaySchedule,
    session: Session,
    today: NaiveDate,
    now: NaiveTime,
) -> SessionState {
    if day.date != today {
        return SessionState::Inactive;
    }

    let window = day.window(session);
    let current = to_minute(now);
    if current < window.start {
        SessionState::Upcoming
    } else if current > window.end {
        SessionState::Ended
    } else {
        SessionState::Active
    }
}

/// Resolves which session is currently open for marking on a day, if any.
/// Forenoon is evaluated first, so it wins if the windows ever overlap.
pub fn active_session(day: &DaySchedule, today: NaiveDate, now: NaiveTime) -> Option<Session> {
    [Session::Forenoon, Session::Afternoon]
        .into_iter()
        .find(|&session| {
            day.window(session).enabled
                && session_state(day, session, today, now) == SessionState::Active
        })
}
