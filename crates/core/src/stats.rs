//! Aggregation over already-visibility-scoped record sets.
//!
//! The database layer fetches raw facts; the math lives here so it can be
//! tested without a store.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::analytics::{SessionAnalysis, SessionBreakdown, TrendPoint};
use crate::models::attendance::{
    AttendanceStatus, AttendanceSummary, BrigadeBucket, Percentage, Session,
};

/// Bucket used when a record's student has no brigade assignment.
pub const NO_BRIGADE: &str = "No Brigade";

pub struct SummaryFact {
    pub status: AttendanceStatus,
    pub brigade: Option<String>,
}

/// Day-summary counts plus the per-brigade breakdown.
pub fn summarize(records: &[SummaryFact]) -> (AttendanceSummary, BTreeMap<String, BrigadeBucket>) {
    let total_records = records.len() as u64;
    let mut present_count = 0;
    let mut absent_count = 0;
    let mut late_count = 0;

    let mut brigade_stats: BTreeMap<String, BrigadeBucket> = BTreeMap::new();

    for record in records {
        match record.status {
            AttendanceStatus::Present => present_count += 1,
            AttendanceStatus::Absent => absent_count += 1,
            AttendanceStatus::Late => late_count += 1,
        }

        let name = record.brigade.clone().unwrap_or_else(|| NO_BRIGADE.to_string());
        let bucket = brigade_stats.entry(name).or_default();
        bucket.total += 1;
        match record.status {
            AttendanceStatus::Present => bucket.present += 1,
            AttendanceStatus::Absent => bucket.absent += 1,
            AttendanceStatus::Late => bucket.late += 1,
        }
    }

    let summary = AttendanceSummary {
        total_records,
        present_count,
        absent_count,
        late_count,
        present_percentage: Percentage::from_counts(present_count, total_records),
    };

    (summary, brigade_stats)
}

pub struct TrendFact {
    /// Calendar date of the record's creation timestamp.
    pub date: NaiveDate,
    pub session: Session,
    pub status: AttendanceStatus,
}

/// Buckets records by creation date, ascending. Dates with no records are
/// simply absent; the series is not zero-filled.
pub fn trend_buckets(records: &[TrendFact]) -> Vec<TrendPoint> {
    let mut daily: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();

    for record in records {
        let point = daily.entry(record.date).or_insert_with(|| TrendPoint {
            date: record.date,
            total: 0,
            present: 0,
            absent: 0,
            late: 0,
            fn_total: 0,
            fn_present: 0,
            an_total: 0,
            an_present: 0,
        });

        point.total += 1;
        match record.status {
            AttendanceStatus::Present => point.present += 1,
            AttendanceStatus::Absent => point.absent += 1,
            AttendanceStatus::Late => point.late += 1,
        }

        let present = record.status == AttendanceStatus::Present;
        match record.session {
            Session::Forenoon => {
                point.fn_total += 1;
                if present {
                    point.fn_present += 1;
                }
            }
            Session::Afternoon => {
                point.an_total += 1;
                if present {
                    point.an_present += 1;
                }
            }
        }
    }

    daily.into_values().collect()
}

pub struct SessionFact {
    pub session: Session,
    pub status: AttendanceStatus,
}

fn breakdown<'a>(records: impl Iterator<Item = &'a SessionFact>) -> SessionBreakdown {
    let mut total = 0;
    let mut present = 0;
    let mut absent = 0;
    let mut late = 0;

    for record in records {
        total += 1;
        match record.status {
            AttendanceStatus::Present => present += 1,
            AttendanceStatus::Absent => absent += 1,
            AttendanceStatus::Late => late += 1,
        }
    }

    SessionBreakdown {
        total,
        present,
        absent,
        late,
        percentage: Percentage::from_counts(present, total),
    }
}

/// Splits the scoped record set into forenoon and afternoon breakdowns.
pub fn session_analysis(records: &[SessionFact]) -> SessionAnalysis {
    SessionAnalysis {
        forenoon: breakdown(
            records
                .iter()
                .filter(|r| r.session == Session::Forenoon),
        ),
        afternoon: breakdown(
            records
                .iter()
                .filter(|r| r.session == Session::Afternoon),
        ),
    }
}
