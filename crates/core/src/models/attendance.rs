use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::AttendanceError;

/// One of the two daily attendance windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Session {
    #[serde(rename = "FN")]
    Forenoon,
    #[serde(rename = "AN")]
    Afternoon,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Forenoon => "FN",
            Session::Afternoon => "AN",
        }
    }

    /// Human-readable name used in rejection messages.
    pub fn label(&self) -> &'static str {
        match self {
            Session::Forenoon => "Forenoon",
            Session::Afternoon => "Afternoon",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FN" => Ok(Session::Forenoon),
            "AN" => Ok(Session::Afternoon),
            other => Err(AttendanceError::Validation(format!(
                "Invalid session: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Late => "LATE",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESENT" => Ok(AttendanceStatus::Present),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            "LATE" => Ok(AttendanceStatus::Late),
            other => Err(AttendanceError::Validation(format!(
                "Invalid status: {other}"
            ))),
        }
    }
}

/// Present-percentage rounded to two decimals. Serializes as a two-decimal
/// string ("75.00"), or as the bare number 0 when there were no records at
/// all, so an empty data set never produces NaN or infinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Percentage(Option<String>);

impl Percentage {
    pub fn from_counts(present: u64, total: u64) -> Self {
        if total == 0 {
            Percentage(None)
        } else {
            let value = present as f64 / total as f64 * 100.0;
            Percentage(Some(format!("{value:.2}")))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("0")
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_u64(0),
        }
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PercentageVisitor;

        impl<'de> Visitor<'de> for PercentageVisitor {
            type Value = Percentage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a two-decimal percentage string or the number 0")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Percentage, E> {
                Ok(Percentage(Some(v.to_owned())))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Percentage, E> {
                if v == 0 {
                    Ok(Percentage(None))
                } else {
                    Err(E::custom("non-zero percentages are strings"))
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Percentage, E> {
                self.visit_u64(v.try_into().map_err(E::custom)?)
            }
        }

        deserializer.deserialize_any(PercentageVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub student_id: Uuid,
    pub event_day_id: Uuid,
    pub session: Session,
    #[serde(default)]
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkAttendanceRequest {
    pub student_ids: Vec<Uuid>,
    pub event_day_id: Uuid,
    pub session: Session,
    #[serde(default)]
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrigadeSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: Uuid,
    pub temp_roll_number: String,
    pub name: String,
    pub brigade: Option<BrigadeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDaySummary {
    pub id: Uuid,
    pub date: NaiveDate,
    pub event_id: Uuid,
    pub event_name: String,
}

/// An attendance record with the denormalized context the clients render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub student: StudentSummary,
    pub event_day: EventDaySummary,
    pub session: Session,
    pub status: AttendanceStatus,
    pub marked_by: Option<Uuid>,
    pub marked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMarkAttendanceResponse {
    pub message: String,
    pub count: usize,
    pub records: Vec<AttendanceRecordResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceListResponse {
    pub records: Vec<AttendanceRecordResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub total_records: u64,
    pub present_count: u64,
    pub absent_count: u64,
    pub late_count: u64,
    pub present_percentage: Percentage,
}

/// Per-brigade status counts within one day's summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrigadeBucket {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummaryResponse {
    pub summary: AttendanceSummary,
    pub brigade_stats: BTreeMap<String, BrigadeBucket>,
    pub records: Vec<AttendanceRecordResponse>,
}
