//! # Role-Scoped Visibility
//!
//! Every read and write entry point narrows its view of students and
//! brigades to what the caller's role permits, before any business rule
//! runs. Admins are unrestricted; brigade leads see the brigades they lead;
//! students see only their own linked record.

use rollcall_core::errors::AttendanceError;
use rollcall_core::models::auth::{AuthUser, Role, VisibilityScope};
use sqlx::PgPool;

use rollcall_db::models::StudentWithBrigade;
use rollcall_db::repositories::brigades;

/// Resolves the caller's visibility scope. One resolution arm per role
/// variant; the brigade-lead arm is the only one that touches the store.
pub async fn resolve_scope(
    pool: &PgPool,
    user: &AuthUser,
) -> Result<VisibilityScope, AttendanceError> {
    match user.role {
        Role::Admin => Ok(VisibilityScope::Unrestricted),
        Role::BrigadeLead => {
            let led = brigades::brigades_led_by(pool, user.id)
                .await
                .map_err(AttendanceError::Database)?;
            Ok(VisibilityScope::Brigades(
                led.into_iter().map(|b| b.id).collect(),
            ))
        }
        Role::Student => Ok(VisibilityScope::LinkedUser(user.id)),
    }
}

/// Marking attendance requires the admin or brigade-lead role.
pub fn require_marker(user: &AuthUser) -> Result<(), AttendanceError> {
    if user.can_mark() {
        Ok(())
    } else {
        Err(AttendanceError::Authorization(
            "Only admins and brigade leads can mark attendance".to_string(),
        ))
    }
}

pub fn require_admin(user: &AuthUser) -> Result<(), AttendanceError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(AttendanceError::Authorization("Access denied".to_string()))
    }
}

/// A brigade lead may only touch students inside their brigade set.
pub fn ensure_student_in_scope(
    scope: &VisibilityScope,
    student: &StudentWithBrigade,
) -> Result<(), AttendanceError> {
    if scope.allows_brigade(student.brigade_id) {
        Ok(())
    } else {
        Err(AttendanceError::Authorization(
            "Access denied to this student".to_string(),
        ))
    }
}
