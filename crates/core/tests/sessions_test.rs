use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use rstest::rstest;

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::attendance::Session;
use rollcall_core::sessions::{
    active_session, check_mark_allowed, session_state, DaySchedule, SessionState, SessionWindow,
};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

fn time_s(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).expect("valid time")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn day_on(day_date: NaiveDate) -> DaySchedule {
    DaySchedule {
        date: day_date,
        is_active: true,
        forenoon: SessionWindow {
            enabled: true,
            start: time(9, 0),
            end: time(9, 30),
        },
        afternoon: SessionWindow {
            enabled: true,
            start: time(14, 0),
            end: time(14, 30),
        },
    }
}

#[test]
fn test_mark_allowed_inside_window_today() {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    let result = check_mark_allowed(&day, Session::Forenoon, today, time(9, 15));
    assert!(result.is_ok());
}

#[rstest]
#[case(time(8, 59))]
#[case(time(9, 31))]
#[case(time(13, 0))]
fn test_mark_rejected_outside_window_today(#[case] now: NaiveTime) {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    let err = check_mark_allowed(&day, Session::Forenoon, today, now)
        .expect_err("window violation expected");

    match err {
        AttendanceError::Rejected(message) => {
            assert!(message.contains("09:00"), "message was: {message}");
            assert!(message.contains("09:30"), "message was: {message}");
            assert!(message.contains("Forenoon"), "message was: {message}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn test_window_bounds_are_inclusive() {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    assert!(check_mark_allowed(&day, Session::Forenoon, today, time(9, 0)).is_ok());
    assert!(check_mark_allowed(&day, Session::Forenoon, today, time(9, 30)).is_ok());
}

#[test]
fn test_seconds_are_truncated_before_comparing() {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    // 09:30:45 is still inside a window that closes at 09:30
    let result = check_mark_allowed(&day, Session::Forenoon, today, time_s(9, 30, 45));
    assert!(result.is_ok());
}

#[rstest]
#[case(time(0, 5))]
#[case(time(9, 15))]
#[case(time(23, 59))]
fn test_no_window_check_for_non_today_days(#[case] now: NaiveTime) {
    // The day is dated yesterday relative to the evaluation date; marking is
    // allowed at any time of day
    let day = day_on(date(2026, 3, 10));
    let today = date(2026, 3, 11);

    assert!(check_mark_allowed(&day, Session::Forenoon, today, now).is_ok());
    assert!(check_mark_allowed(&day, Session::Afternoon, today, now).is_ok());
}

#[test]
fn test_future_day_also_bypasses_window() {
    let day = day_on(date(2026, 3, 20));
    let today = date(2026, 3, 10);

    assert!(check_mark_allowed(&day, Session::Forenoon, today, time(3, 0)).is_ok());
}

#[test]
fn test_inactive_day_is_not_found() {
    let today = date(2026, 3, 10);
    let mut day = day_on(today);
    day.is_active = false;

    let err = check_mark_allowed(&day, Session::Forenoon, today, time(9, 15))
        .expect_err("inactive day must reject");

    match err {
        AttendanceError::NotFound(message) => {
            assert_eq!(message, "Event day not found or inactive");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_disabled_session_is_rejected_even_on_other_days() {
    let mut day = day_on(date(2026, 3, 10));
    day.afternoon.enabled = false;

    // Enabled check applies regardless of the calendar date
    for today in [date(2026, 3, 10), date(2026, 3, 11)] {
        let err = check_mark_allowed(&day, Session::Afternoon, today, time(14, 15))
            .expect_err("disabled session must reject");
        match err {
            AttendanceError::Rejected(message) => {
                assert_eq!(message, "Afternoon session is not enabled for this day");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }
}

#[rstest]
#[case(time(8, 0), SessionState::Upcoming)]
#[case(time(9, 0), SessionState::Active)]
#[case(time(9, 15), SessionState::Active)]
#[case(time(9, 30), SessionState::Active)]
#[case(time(9, 31), SessionState::Ended)]
fn test_session_state_today(#[case] now: NaiveTime, #[case] expected: SessionState) {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    assert_eq!(session_state(&day, Session::Forenoon, today, now), expected);
}

#[test]
fn test_session_state_on_other_dates_is_inactive() {
    let day = day_on(date(2026, 3, 10));

    for today in [date(2026, 3, 9), date(2026, 3, 11)] {
        assert_eq!(
            session_state(&day, Session::Forenoon, today, time(9, 15)),
            SessionState::Inactive
        );
    }
}

#[test]
fn test_active_session_resolution() {
    let today = date(2026, 3, 10);
    let day = day_on(today);

    assert_eq!(
        active_session(&day, today, time(9, 15)),
        Some(Session::Forenoon)
    );
    assert_eq!(
        active_session(&day, today, time(14, 15)),
        Some(Session::Afternoon)
    );
    assert_eq!(active_session(&day, today, time(11, 0)), None);
    assert_eq!(active_session(&day, date(2026, 3, 11), time(9, 15)), None);
}

#[test]
fn test_active_session_skips_disabled_forenoon() {
    let today = date(2026, 3, 10);
    let mut day = day_on(today);
    day.forenoon.enabled = false;

    assert_eq!(active_session(&day, today, time(9, 15)), None);
    assert_eq!(
        active_session(&day, today, time(14, 15)),
        Some(Session::Afternoon)
    );
}

#[test]
fn test_forenoon_wins_when_windows_overlap() {
    let today = date(2026, 3, 10);
    let mut day = day_on(today);
    day.afternoon.start = time(9, 0);
    day.afternoon.end = time(9, 30);

    assert_eq!(
        active_session(&day, today, time(9, 15)),
        Some(Session::Forenoon)
    );
}
