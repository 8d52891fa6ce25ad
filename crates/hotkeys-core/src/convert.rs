// ── Wire record → domain conversions ──
//
// Nullable text columns become empty strings; string ids become
// `EntityId`s. The embedded category of a program row is not carried
// over: the join is redone locally against the category snapshot.

use hotkeys_api::{CategoryRecord, FavoriteRecord, ProfileRecord, ProgramRecord, ShortcutRecord};

use crate::model::{Category, EntityId, Favorite, Identity, Program, Shortcut, Slug};

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Self {
            id: EntityId::from(r.id),
            name: r.name,
            slug: Slug::from_stored(r.slug),
            description: r.description.unwrap_or_default(),
            icon: r.icon.unwrap_or_default(),
            color: r.color.unwrap_or_default(),
        }
    }
}

impl From<ProgramRecord> for Program {
    fn from(r: ProgramRecord) -> Self {
        Self {
            id: EntityId::from(r.id),
            category_id: EntityId::from(r.category_id),
            name: r.name,
            description: r.description.unwrap_or_default(),
            icon: r.icon.unwrap_or_default(),
            is_popular: r.is_popular,
        }
    }
}

impl From<ShortcutRecord> for Shortcut {
    fn from(r: ShortcutRecord) -> Self {
        Self {
            id: EntityId::from(r.id),
            program_id: EntityId::from(r.program_id),
            name: r.name,
            keys: r.keys,
            description: r.description.unwrap_or_default(),
        }
    }
}

impl From<FavoriteRecord> for Favorite {
    fn from(r: FavoriteRecord) -> Self {
        Self {
            user_id: EntityId::from(r.user_id),
            program_id: EntityId::from(r.program_id),
        }
    }
}

impl From<ProfileRecord> for Identity {
    fn from(r: ProfileRecord) -> Self {
        Self {
            user_id: EntityId::from(r.id),
            email: r.email,
            is_admin: r.is_admin,
        }
    }
}
