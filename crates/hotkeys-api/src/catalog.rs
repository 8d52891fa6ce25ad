// Catalog table endpoints
//
// One method per read or write the catalog performs. Reads come back
// ordered by name; writes return the affected row so callers never need a
// follow-up select to learn the assigned id.

use tracing::debug;

use crate::client::RestClient;
use crate::error::Error;
use crate::models::{
    CategoryPayload, CategoryRecord, FavoritePayload, FavoriteRecord, ProfileRecord,
    ProgramPayload, ProgramRecord, ShortcutPayload, ShortcutRecord,
};
use crate::query::{Order, Query};

const CATEGORIES: &str = "categories";
const PROGRAMS: &str = "programs";
const SHORTCUTS: &str = "shortcuts";
const FAVORITES: &str = "favorites";
const PROFILES: &str = "profiles";

/// Programs with their category row embedded under `category`.
const PROGRAM_WITH_CATEGORY: &str = "*,category:categories(*)";

fn by_name() -> Query {
    Query::new().select("*").order("name", Order::Ascending)
}

/// Take the single row a `return=representation` write produced.
fn single<T>(rows: Vec<T>, table: &str) -> Result<T, Error> {
    rows.into_iter().next().ok_or_else(|| Error::Rest {
        message: format!("write to '{table}' matched no rows"),
        code: None,
        status: 404,
    })
}

impl RestClient {
    // ── Categories ──────────────────────────────────────────────────

    /// `GET /rest/v1/categories?select=*&order=name.asc`
    pub async fn list_categories(&self) -> Result<Vec<CategoryRecord>, Error> {
        debug!("listing categories");
        self.select(CATEGORIES, &by_name()).await
    }

    pub async fn insert_category(
        &self,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, Error> {
        debug!(slug = payload.slug, "inserting category");
        single(self.insert(CATEGORIES, payload).await?, CATEGORIES)
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, Error> {
        debug!(id, "updating category");
        let rows = self
            .update(CATEGORIES, &Query::new().eq("id", id), payload)
            .await?;
        single(rows, CATEGORIES)
    }

    /// Returns how many rows were removed (0 when `id` did not exist).
    pub async fn delete_category(&self, id: &str) -> Result<usize, Error> {
        debug!(id, "deleting category");
        let rows: Vec<CategoryRecord> = self.delete(CATEGORIES, &Query::new().eq("id", id)).await?;
        Ok(rows.len())
    }

    // ── Programs ────────────────────────────────────────────────────

    /// `GET /rest/v1/programs?select=*,category:categories(*)&order=name.asc`
    pub async fn list_programs(&self) -> Result<Vec<ProgramRecord>, Error> {
        debug!("listing programs");
        let query = Query::new()
            .select(PROGRAM_WITH_CATEGORY)
            .order("name", Order::Ascending);
        self.select(PROGRAMS, &query).await
    }

    /// Programs referencing one category (used to discover cascade
    /// dependents).
    pub async fn list_programs_in_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<ProgramRecord>, Error> {
        debug!(category_id, "listing programs in category");
        self.select(PROGRAMS, &by_name().eq("category_id", category_id))
            .await
    }

    pub async fn insert_program(&self, payload: &ProgramPayload<'_>) -> Result<ProgramRecord, Error> {
        debug!(name = payload.name, "inserting program");
        single(self.insert(PROGRAMS, payload).await?, PROGRAMS)
    }

    pub async fn update_program(
        &self,
        id: &str,
        payload: &ProgramPayload<'_>,
    ) -> Result<ProgramRecord, Error> {
        debug!(id, "updating program");
        let rows = self
            .update(PROGRAMS, &Query::new().eq("id", id), payload)
            .await?;
        single(rows, PROGRAMS)
    }

    /// Returns how many rows were removed (0 when `id` did not exist).
    pub async fn delete_program(&self, id: &str) -> Result<usize, Error> {
        debug!(id, "deleting program");
        let rows: Vec<ProgramRecord> = self.delete(PROGRAMS, &Query::new().eq("id", id)).await?;
        Ok(rows.len())
    }

    // ── Shortcuts ───────────────────────────────────────────────────

    /// All shortcuts, or only those of one program.
    pub async fn list_shortcuts(
        &self,
        program_id: Option<&str>,
    ) -> Result<Vec<ShortcutRecord>, Error> {
        debug!(program_id, "listing shortcuts");
        let query = match program_id {
            Some(pid) => by_name().eq("program_id", pid),
            None => by_name(),
        };
        self.select(SHORTCUTS, &query).await
    }

    pub async fn insert_shortcut(
        &self,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, Error> {
        debug!(program_id = payload.program_id, "inserting shortcut");
        single(self.insert(SHORTCUTS, payload).await?, SHORTCUTS)
    }

    pub async fn update_shortcut(
        &self,
        id: &str,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, Error> {
        debug!(id, "updating shortcut");
        let rows = self
            .update(SHORTCUTS, &Query::new().eq("id", id), payload)
            .await?;
        single(rows, SHORTCUTS)
    }

    /// Returns how many rows were removed (0 when `id` did not exist).
    pub async fn delete_shortcut(&self, id: &str) -> Result<usize, Error> {
        debug!(id, "deleting shortcut");
        let rows: Vec<ShortcutRecord> = self.delete(SHORTCUTS, &Query::new().eq("id", id)).await?;
        Ok(rows.len())
    }

    /// Remove every shortcut of a program. Returns how many were removed.
    pub async fn delete_shortcuts_of_program(&self, program_id: &str) -> Result<usize, Error> {
        debug!(program_id, "deleting shortcuts of program");
        let rows: Vec<ShortcutRecord> = self
            .delete(SHORTCUTS, &Query::new().eq("program_id", program_id))
            .await?;
        Ok(rows.len())
    }

    // ── Favorites ───────────────────────────────────────────────────

    /// Favorite rows of one user.
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<FavoriteRecord>, Error> {
        debug!(user_id, "listing favorites");
        let query = Query::new().select("*").eq("user_id", user_id);
        self.select(FAVORITES, &query).await
    }

    pub async fn insert_favorite(&self, payload: &FavoritePayload<'_>) -> Result<(), Error> {
        debug!(
            user_id = payload.user_id,
            program_id = payload.program_id,
            "inserting favorite"
        );
        let _: Vec<FavoriteRecord> = self.insert(FAVORITES, payload).await?;
        Ok(())
    }

    pub async fn delete_favorite(&self, user_id: &str, program_id: &str) -> Result<(), Error> {
        debug!(user_id, program_id, "deleting favorite");
        let query = Query::new()
            .eq("user_id", user_id)
            .eq("program_id", program_id);
        let _: Vec<FavoriteRecord> = self.delete(FAVORITES, &query).await?;
        Ok(())
    }

    /// Remove every user's favorite of a program. Returns how many were
    /// removed.
    pub async fn delete_favorites_of_program(&self, program_id: &str) -> Result<usize, Error> {
        debug!(program_id, "deleting favorites of program");
        let rows: Vec<FavoriteRecord> = self
            .delete(FAVORITES, &Query::new().eq("program_id", program_id))
            .await?;
        Ok(rows.len())
    }

    // ── Profiles ────────────────────────────────────────────────────

    /// Profile row of one user, if the auth provider created one.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, Error> {
        debug!(user_id, "fetching profile");
        let query = Query::new().select("*").eq("id", user_id);
        let rows: Vec<ProfileRecord> = self.select(PROFILES, &query).await?;
        Ok(rows.into_iter().next())
    }
}
