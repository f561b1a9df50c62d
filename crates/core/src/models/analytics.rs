use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::attendance::Percentage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentEventSummary {
    pub name: String,
    pub total_days: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_students: u64,
    pub total_brigades: u64,
    pub total_brigade_leads: u64,
    pub today_attendance: u64,
    pub overall_attendance_percentage: Percentage,
    pub current_event: Option<CurrentEventSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadBrigade {
    pub id: Uuid,
    pub name: String,
    pub student_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadStats {
    pub total_brigades: u64,
    pub total_students: u64,
    pub today_attendance: u64,
    pub brigade_attendance_percentage: Percentage,
    pub brigades: Vec<LeadBrigade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    pub temp_roll_number: String,
    pub name: String,
    pub brigade: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentStats {
    pub student_info: StudentInfo,
    pub attendance_percentage: Percentage,
    pub total_sessions: u64,
    pub present_sessions: u64,
    pub today_sessions: u64,
    pub today_present: u64,
}

/// Role-shaped dashboard payload; exactly one branch is populated per caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brigade_lead: Option<LeadStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentStats>,
}

/// One day's bucket in the attendance trend series, keyed by the calendar
/// date the records were created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub fn_total: u64,
    pub fn_present: u64,
    pub an_total: u64,
    pub an_present: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrigadeComparison {
    pub id: Uuid,
    pub name: String,
    pub total_students: u64,
    pub total_records: u64,
    pub present_records: u64,
    pub attendance_percentage: Percentage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBreakdown {
    pub total: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    pub percentage: Percentage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnalysis {
    pub forenoon: SessionBreakdown,
    pub afternoon: SessionBreakdown,
}
