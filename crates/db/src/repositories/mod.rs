pub mod attendance;
pub mod brigades;
pub mod events;
pub mod students;
pub mod users;

use rollcall_core::models::auth::VisibilityScope;
use uuid::Uuid;

/// SQL-side form of a resolved visibility scope. Repositories translate the
/// set fields into predicates on the joined student row; a default filter
/// applies no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    /// Restrict to students assigned to one of these brigades.
    pub brigade_ids: Option<Vec<Uuid>>,
    /// Restrict to the student linked to this login.
    pub user_id: Option<Uuid>,
}

impl From<&VisibilityScope> for ScopeFilter {
    fn from(scope: &VisibilityScope) -> Self {
        match scope {
            VisibilityScope::Unrestricted => ScopeFilter::default(),
            VisibilityScope::Brigades(ids) => ScopeFilter {
                brigade_ids: Some(ids.clone()),
                user_id: None,
            },
            VisibilityScope::LinkedUser(user_id) => ScopeFilter {
                brigade_ids: None,
                user_id: Some(*user_id),
            },
        }
    }
}
