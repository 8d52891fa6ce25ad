// ── REST-backed catalog ──
//
// Thin adapter from `CatalogBackend` onto `hotkeys_api::RestClient`.
// Error translation happens in `From<hotkeys_api::Error> for CoreError`.

use hotkeys_api::{
    CategoryPayload, CategoryRecord, FavoritePayload, FavoriteRecord, ProfileRecord,
    ProgramPayload, ProgramRecord, RestClient, ShortcutPayload, ShortcutRecord, TlsMode,
    TransportConfig,
};
use secrecy::SecretString;

use super::CatalogBackend;
use crate::config::{CatalogConfig, TlsVerification};
use crate::error::CoreError;

/// `CatalogBackend` over the remote PostgREST store.
pub struct RestBackend {
    client: RestClient,
}

impl RestBackend {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Build the HTTP client described by `config`.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let client = RestClient::new(config.url.clone(), config.api_key.clone(), &transport)?;
        client.set_access_token(config.access_token.clone());
        Ok(Self::new(client))
    }

    /// Switch the bearer credential, e.g. after sign-in.
    pub fn set_access_token(&self, token: Option<SecretString>) {
        self.client.set_access_token(token);
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }
}

impl CatalogBackend for RestBackend {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CoreError> {
        Ok(self.client.list_categories().await?)
    }

    async fn insert_category(
        &self,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, CoreError> {
        Ok(self.client.insert_category(payload).await?)
    }

    async fn update_category(
        &self,
        id: &str,
        payload: &CategoryPayload<'_>,
    ) -> Result<CategoryRecord, CoreError> {
        Ok(self.client.update_category(id, payload).await?)
    }

    async fn delete_category(&self, id: &str) -> Result<usize, CoreError> {
        Ok(self.client.delete_category(id).await?)
    }

    async fn list_programs(&self) -> Result<Vec<ProgramRecord>, CoreError> {
        Ok(self.client.list_programs().await?)
    }

    async fn list_programs_in_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<ProgramRecord>, CoreError> {
        Ok(self.client.list_programs_in_category(category_id).await?)
    }

    async fn insert_program(&self, payload: &ProgramPayload<'_>) -> Result<ProgramRecord, CoreError> {
        Ok(self.client.insert_program(payload).await?)
    }

    async fn update_program(
        &self,
        id: &str,
        payload: &ProgramPayload<'_>,
    ) -> Result<ProgramRecord, CoreError> {
        Ok(self.client.update_program(id, payload).await?)
    }

    async fn delete_program(&self, id: &str) -> Result<usize, CoreError> {
        Ok(self.client.delete_program(id).await?)
    }

    async fn list_shortcuts(&self, program_id: Option<&str>) -> Result<Vec<ShortcutRecord>, CoreError> {
        Ok(self.client.list_shortcuts(program_id).await?)
    }

    async fn insert_shortcut(
        &self,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, CoreError> {
        Ok(self.client.insert_shortcut(payload).await?)
    }

    async fn update_shortcut(
        &self,
        id: &str,
        payload: &ShortcutPayload<'_>,
    ) -> Result<ShortcutRecord, CoreError> {
        Ok(self.client.update_shortcut(id, payload).await?)
    }

    async fn delete_shortcut(&self, id: &str) -> Result<usize, CoreError> {
        Ok(self.client.delete_shortcut(id).await?)
    }

    async fn delete_shortcuts_of_program(&self, program_id: &str) -> Result<usize, CoreError> {
        Ok(self.client.delete_shortcuts_of_program(program_id).await?)
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<FavoriteRecord>, CoreError> {
        Ok(self.client.list_favorites(user_id).await?)
    }

    async fn insert_favorite(&self, user_id: &str, program_id: &str) -> Result<(), CoreError> {
        let payload = FavoritePayload {
            user_id,
            program_id,
        };
        Ok(self.client.insert_favorite(&payload).await?)
    }

    async fn delete_favorite(&self, user_id: &str, program_id: &str) -> Result<(), CoreError> {
        Ok(self.client.delete_favorite(user_id, program_id).await?)
    }

    async fn delete_favorites_of_program(&self, program_id: &str) -> Result<usize, CoreError> {
        Ok(self.client.delete_favorites_of_program(program_id).await?)
    }

    async fn load_identity(&self, user_id: &str) -> Result<Option<ProfileRecord>, CoreError> {
        Ok(self.client.get_profile(user_id).await?)
    }
}
