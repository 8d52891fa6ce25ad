use serde::{Deserialize, Serialize};

use super::EntityId;

/// The signed-in user as reported by the auth provider.
///
/// Passed explicitly to every operation that depends on who is acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: EntityId,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Identity {
    /// A regular, non-admin user.
    pub fn user(user_id: impl Into<EntityId>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<EntityId>) -> Self {
        Self {
            is_admin: true,
            ..Self::user(user_id)
        }
    }
}

/// A (user, program) favorite association.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: EntityId,
    pub program_id: EntityId,
}
