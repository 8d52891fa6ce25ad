//! Command dispatch: bridges CLI args -> core Catalog calls -> output formatting.

pub mod admin;
pub mod categories;
pub mod config_cmd;
pub mod favorites;
pub mod programs;
pub mod shortcuts;
pub mod util;

use std::path::Path;

use hotkeys_core::{Catalog, CatalogBackend, EntityId, MemoryBackend};

use crate::cli::{Command, GlobalOpts};
use crate::config::{Session, StoreTarget};
use crate::error::CliError;

/// Open the session's store, run `cmd` against it, and persist offline
/// changes.
pub async fn run_session(
    cmd: Command,
    session: Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = session.profile;
    let result = match session.target {
        StoreTarget::Seed(path) => run_offline(cmd, &path, session.user, global).await,
        StoreTarget::Remote(config) => {
            let catalog = Catalog::connect(&config)?;
            dispatch(cmd, &catalog, session.user, global).await
        }
    };
    result.map_err(|e| e.for_profile(&profile))
}

async fn run_offline(
    cmd: Command,
    path: &Path,
    user: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::Config {
        message: format!("cannot read catalog file {}: {e}", path.display()),
    })?;
    let catalog = Catalog::new(MemoryBackend::from_json(&raw)?);

    let result = dispatch(cmd, &catalog, user, global).await;

    // A failed cascade may still have removed rows.
    if catalog.backend().write_count() > 0 {
        let seed = catalog.backend().export().await;
        std::fs::write(path, serde_json::to_string_pretty(&seed)?)?;
        tracing::debug!(path = %path.display(), "catalog file updated");
    }
    result
}

/// Load the catalog (signed in when a user is known) and route `cmd`.
async fn dispatch<B: CatalogBackend>(
    cmd: Command,
    catalog: &Catalog<B>,
    user: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let identity = match user {
        Some(id) => Some(catalog.resolve_identity(&EntityId::from(id)).await?),
        None => None,
    };
    catalog.load(identity).await?;

    match cmd {
        Command::Categories(args) => categories::handle(catalog, args, global),
        Command::Programs(args) => programs::handle(catalog, args, global).await,
        Command::Shortcuts(args) => shortcuts::handle(catalog, args, global).await,
        Command::Favorites(args) => favorites::handle(catalog, args, global).await,
        Command::Admin(args) => admin::handle(catalog, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
