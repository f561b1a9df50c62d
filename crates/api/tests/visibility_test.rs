mod test_utils;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use rollcall_api::visibility;
use rollcall_core::errors::AttendanceError;
use rollcall_core::models::auth::VisibilityScope;
use rollcall_db::repositories::ScopeFilter;

use test_utils::*;

#[test]
fn test_scope_filter_translation() {
    let unrestricted = ScopeFilter::from(&VisibilityScope::Unrestricted);
    assert_eq!(unrestricted, ScopeFilter::default());

    let brigade_ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    let lead = ScopeFilter::from(&VisibilityScope::Brigades(brigade_ids.clone()));
    assert_eq!(lead.brigade_ids, Some(brigade_ids));
    assert_eq!(lead.user_id, None);

    let user_id = Uuid::new_v4();
    let student = ScopeFilter::from(&VisibilityScope::LinkedUser(user_id));
    assert_eq!(student.brigade_ids, None);
    assert_eq!(student.user_id, Some(user_id));
}

#[test]
fn test_require_marker_by_role() {
    assert!(visibility::require_marker(&admin_user()).is_ok());
    assert!(visibility::require_marker(&lead_user()).is_ok());
    assert!(matches!(
        visibility::require_marker(&student_user()),
        Err(AttendanceError::Authorization(_))
    ));
}

#[test]
fn test_require_admin_by_role() {
    assert!(visibility::require_admin(&admin_user()).is_ok());
    assert!(matches!(
        visibility::require_admin(&lead_user()),
        Err(AttendanceError::Authorization(_))
    ));
    assert!(matches!(
        visibility::require_admin(&student_user()),
        Err(AttendanceError::Authorization(_))
    ));
}

#[test]
fn test_lead_scope_covers_only_led_brigades() {
    let led = Uuid::new_v4();
    let scope = VisibilityScope::Brigades(vec![led]);

    let in_scope = student_row(Some(led), Some("Brigade Alpha"));
    let out_of_scope = student_row(Some(Uuid::new_v4()), Some("Brigade Beta"));
    let unassigned = student_row(None, None);

    assert!(visibility::ensure_student_in_scope(&scope, &in_scope).is_ok());

    for student in [&out_of_scope, &unassigned] {
        match visibility::ensure_student_in_scope(&scope, student) {
            Err(AttendanceError::Authorization(message)) => {
                assert_eq!(message, "Access denied to this student");
            }
            other => panic!("expected Authorization, got {other:?}"),
        }
    }
}

#[test]
fn test_admin_scope_covers_everyone() {
    let scope = VisibilityScope::Unrestricted;

    let assigned = student_row(Some(Uuid::new_v4()), Some("Brigade Alpha"));
    let unassigned = student_row(None, None);

    assert!(visibility::ensure_student_in_scope(&scope, &assigned).is_ok());
    assert!(visibility::ensure_student_in_scope(&scope, &unassigned).is_ok());
}
