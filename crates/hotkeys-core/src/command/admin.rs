// ── Admin mutation service ──
//
// Validates drafts against the current snapshot, writes through the
// backend, then refreshes the affected collections. Deletes cascade
// leaf-first (favorites, shortcuts, programs, category) with dependents
// discovered by querying the backend rather than trusting the snapshot.

use std::sync::Arc;

use hotkeys_api::{CategoryPayload, ProgramPayload, ShortcutPayload};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::requests::{CategoryDraft, ProgramDraft, ShortcutDraft};
use super::{CascadeSummary, Command, CommandResult};
use crate::backend::CatalogBackend;
use crate::error::CoreError;
use crate::model::{EntityId, EntityKind, Identity};
use crate::repository::CatalogRepository;

/// Create/update/delete for categories, programs and shortcuts.
pub struct AdminService<B> {
    backend: Arc<B>,
    repository: Arc<CatalogRepository<B>>,
    write_lane: Mutex<()>,
}

impl<B: CatalogBackend> AdminService<B> {
    pub fn new(backend: Arc<B>, repository: Arc<CatalogRepository<B>>) -> Self {
        Self {
            backend,
            repository,
            write_lane: Mutex::new(()),
        }
    }

    /// Route a command to its handler.
    pub async fn execute(
        &self,
        actor: &Identity,
        command: Command,
    ) -> Result<CommandResult, CoreError> {
        match command {
            Command::SaveCategory(draft) => {
                let id = self.save_category(actor, draft).await?;
                Ok(CommandResult::Saved {
                    kind: EntityKind::Category,
                    id,
                })
            }
            Command::SaveProgram(draft) => {
                let id = self.save_program(actor, draft).await?;
                Ok(CommandResult::Saved {
                    kind: EntityKind::Program,
                    id,
                })
            }
            Command::SaveShortcut(draft) => {
                let id = self.save_shortcut(actor, draft).await?;
                Ok(CommandResult::Saved {
                    kind: EntityKind::Shortcut,
                    id,
                })
            }
            Command::Delete { kind, id } => {
                let cascade = self.delete_entity(actor, kind, &id).await?;
                Ok(CommandResult::Deleted { kind, id, cascade })
            }
        }
    }

    // ── Saves ────────────────────────────────────────────────────────

    /// Insert (no `id`) or update a category. Slugs must be unique.
    pub async fn save_category(
        &self,
        actor: &Identity,
        draft: CategoryDraft,
    ) -> Result<EntityId, CoreError> {
        require_admin(actor, "save category")?;
        let _lane = self.write_lane.lock().await;

        let existing = match &draft.id {
            Some(id) => Some(
                self.repository
                    .get_category(id)
                    .ok_or_else(|| CoreError::not_found("category", id))?,
            ),
            None => None,
        };
        let target = draft.id.clone();
        let fields = draft.resolve(existing.as_deref())?;

        let taken = self
            .repository
            .categories()
            .iter()
            .any(|c| c.slug == fields.slug && Some(&c.id) != target.as_ref());
        if taken {
            return Err(CoreError::validation(
                "slug",
                format!("a category with slug '{}' already exists", fields.slug),
            ));
        }

        let payload = CategoryPayload {
            name: &fields.name,
            slug: fields.slug.as_str(),
            description: &fields.description,
            icon: &fields.icon,
            color: &fields.color,
        };
        let record = match &target {
            Some(id) => {
                self.backend
                    .update_category(&id.to_string(), &payload)
                    .await?
            }
            None => self.backend.insert_category(&payload).await?,
        };
        let id = EntityId::from(record.id);
        info!(category = %id, slug = %fields.slug, "category saved");

        self.refresh_after_write(&[EntityKind::Category]).await;
        Ok(id)
    }

    /// Insert or update a program. Its category must exist.
    pub async fn save_program(
        &self,
        actor: &Identity,
        draft: ProgramDraft,
    ) -> Result<EntityId, CoreError> {
        require_admin(actor, "save program")?;
        let _lane = self.write_lane.lock().await;

        let existing = match &draft.id {
            Some(id) => Some(
                self.repository
                    .get_program(id)
                    .ok_or_else(|| CoreError::not_found("program", id))?,
            ),
            None => None,
        };
        let target = draft.id.clone();
        let fields = draft.resolve(existing.as_deref())?;

        if self.repository.get_category(&fields.category_id).is_none() {
            return Err(CoreError::validation(
                "category_id",
                format!("category '{}' does not exist", fields.category_id),
            ));
        }

        let category_id = fields.category_id.to_string();
        let payload = ProgramPayload {
            category_id: &category_id,
            name: &fields.name,
            description: &fields.description,
            icon: &fields.icon,
            is_popular: fields.is_popular,
        };
        let record = match &target {
            Some(id) => self.backend.update_program(&id.to_string(), &payload).await?,
            None => self.backend.insert_program(&payload).await?,
        };
        let id = EntityId::from(record.id);
        info!(program = %id, category = %fields.category_id, "program saved");

        self.refresh_after_write(&[EntityKind::Program]).await;
        Ok(id)
    }

    /// Insert or update a shortcut. Its program must exist.
    pub async fn save_shortcut(
        &self,
        actor: &Identity,
        draft: ShortcutDraft,
    ) -> Result<EntityId, CoreError> {
        require_admin(actor, "save shortcut")?;
        draft.check_supplied()?;
        if let Some(program_id) = &draft.program_id {
            self.require_program(program_id)?;
        }
        let _lane = self.write_lane.lock().await;

        let existing = match &draft.id {
            Some(id) => Some(self.find_shortcut(id, draft.program_id.as_ref()).await?),
            None => None,
        };
        let target = draft.id.clone();
        let fields = draft.resolve(existing.as_deref())?;
        self.require_program(&fields.program_id)?;

        let program_id = fields.program_id.to_string();
        let payload = ShortcutPayload {
            program_id: &program_id,
            name: &fields.name,
            keys: &fields.keys,
            description: &fields.description,
        };
        let record = match &target {
            Some(id) => {
                self.backend
                    .update_shortcut(&id.to_string(), &payload)
                    .await?
            }
            None => self.backend.insert_shortcut(&payload).await?,
        };
        let id = EntityId::from(record.id);
        info!(shortcut = %id, program = %fields.program_id, "shortcut saved");

        self.refresh_after_write(&[EntityKind::Shortcut]).await;
        Ok(id)
    }

    // ── Deletes ──────────────────────────────────────────────────────

    /// Delete an entity and its dependents, leaf-first.
    pub async fn delete_entity(
        &self,
        actor: &Identity,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<CascadeSummary, CoreError> {
        require_admin(actor, &format!("delete {kind}"))?;
        let _lane = self.write_lane.lock().await;

        let exists = match kind {
            EntityKind::Category => self.repository.get_category(id).is_some(),
            EntityKind::Program => self.repository.get_program(id).is_some(),
            // Shortcuts are not always loaded; the delete count decides.
            EntityKind::Shortcut => true,
        };
        if !exists {
            return Err(CoreError::not_found(kind.to_string(), id));
        }

        let mut cascade = CascadeSummary::default();
        let result = self.cascade_delete(kind, id, &mut cascade).await;

        // Dependents may have been removed even if a later step failed.
        let affected: &[EntityKind] = match kind {
            EntityKind::Category => &[
                EntityKind::Category,
                EntityKind::Program,
                EntityKind::Shortcut,
            ],
            EntityKind::Program => &[EntityKind::Program, EntityKind::Shortcut],
            EntityKind::Shortcut => &[EntityKind::Shortcut],
        };
        self.refresh_after_write(affected).await;

        result?;
        info!(
            %kind,
            %id,
            programs = cascade.programs.len(),
            shortcuts = cascade.shortcuts,
            favorites = cascade.favorites,
            "entity deleted"
        );
        Ok(cascade)
    }

    async fn cascade_delete(
        &self,
        kind: EntityKind,
        id: &EntityId,
        cascade: &mut CascadeSummary,
    ) -> Result<(), CoreError> {
        let key = id.to_string();
        match kind {
            EntityKind::Category => {
                let programs = self.backend.list_programs_in_category(&key).await?;
                for program in programs {
                    self.delete_program_rows(&program.id, cascade).await?;
                    cascade.programs.push(EntityId::from(program.id));
                }
                self.backend.delete_category(&key).await?;
            }
            EntityKind::Program => {
                self.delete_program_rows(&key, cascade).await?;
            }
            EntityKind::Shortcut => {
                if self.backend.delete_shortcut(&key).await? == 0 {
                    return Err(CoreError::not_found("shortcut", id));
                }
            }
        }
        Ok(())
    }

    /// Favorites, then shortcuts, then the program row itself.
    async fn delete_program_rows(
        &self,
        program_id: &str,
        cascade: &mut CascadeSummary,
    ) -> Result<(), CoreError> {
        cascade.favorites += self.backend.delete_favorites_of_program(program_id).await?;
        cascade.shortcuts += self.backend.delete_shortcuts_of_program(program_id).await?;
        self.backend.delete_program(program_id).await?;
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn require_program(&self, program_id: &EntityId) -> Result<(), CoreError> {
        if self.repository.get_program(program_id).is_none() {
            return Err(CoreError::validation(
                "program_id",
                format!("program '{program_id}' does not exist"),
            ));
        }
        Ok(())
    }

    /// Locate a shortcut for update: the loaded set first, then the
    /// program's list (from cache or the backend).
    async fn find_shortcut(
        &self,
        id: &EntityId,
        program_hint: Option<&EntityId>,
    ) -> Result<Arc<crate::model::Shortcut>, CoreError> {
        if let Some(found) = self.repository.shortcuts().into_iter().find(|s| &s.id == id) {
            return Ok(found);
        }
        if let Some(program_id) = program_hint {
            if self.repository.get_program(program_id).is_some() {
                let list = self.repository.shortcuts_for(program_id).await?;
                if let Some(found) = list.iter().find(|s| &s.id == id) {
                    return Ok(Arc::clone(found));
                }
            }
        }
        self.repository.refresh(EntityKind::Shortcut).await?;
        self.repository
            .shortcuts()
            .into_iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| CoreError::not_found("shortcut", id))
    }

    /// Refresh after a landed write. Failures are logged, not returned:
    /// the store already holds the change and the repository reports a
    /// stale snapshot.
    async fn refresh_after_write(&self, kinds: &[EntityKind]) {
        for &kind in kinds {
            if let Err(e) = self.repository.refresh(kind).await {
                warn!(%kind, error = %e, "refresh after write failed");
            }
        }
    }
}

fn require_admin(actor: &Identity, operation: &str) -> Result<(), CoreError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(CoreError::Forbidden {
            operation: operation.to_owned(),
        })
    }
}
