use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::AttendanceError;

/// Caller role as a closed set. Visibility and authorization logic dispatch
/// on this variant rather than on string comparisons at every entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    BrigadeLead,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::BrigadeLead => "BRIGADE_LEAD",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "BRIGADE_LEAD" => Ok(Role::BrigadeLead),
            "STUDENT" => Ok(Role::Student),
            other => Err(AttendanceError::Validation(format!(
                "Unknown role: {other}"
            ))),
        }
    }
}

/// Authenticated caller identity, established by the external identity
/// provider and extracted by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    /// Marking attendance is restricted to admins and brigade leads.
    pub fn can_mark(&self) -> bool {
        matches!(self.role, Role::Admin | Role::BrigadeLead)
    }
}

/// The set of students a caller may see or act on, resolved once per request
/// before any business-rule check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Admins see everything.
    Unrestricted,
    /// Brigade leads see students in the brigades they lead.
    Brigades(Vec<Uuid>),
    /// Students see only the student record linked to their own login.
    LinkedUser(Uuid),
}

impl VisibilityScope {
    /// Whether a student in the given brigade (if any) falls inside this
    /// scope for write purposes. A student with no brigade is outside every
    /// brigade-lead scope.
    pub fn allows_brigade(&self, brigade_id: Option<Uuid>) -> bool {
        match self {
            VisibilityScope::Unrestricted => true,
            VisibilityScope::Brigades(ids) => brigade_id.is_some_and(|id| ids.contains(&id)),
            VisibilityScope::LinkedUser(_) => false,
        }
    }
}
