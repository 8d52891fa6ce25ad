use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Category, Entity, EntityId};

/// An application whose shortcuts the catalog documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: EntityId,
    pub category_id: EntityId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub is_popular: bool,
}

impl Entity for Program {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// A program joined with its resolved category and annotated with the
/// signed-in user's favorite flag. Only built for programs whose
/// category exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramEntry {
    pub program: Arc<Program>,
    pub category: Arc<Category>,
    pub is_favorite: bool,
}
