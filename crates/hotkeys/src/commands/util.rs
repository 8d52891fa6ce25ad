//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;

use hotkeys_core::{Catalog, CatalogBackend, Category, EntityId, ProgramEntry};

use crate::error::CliError;

/// Resolve a category slug or ID via snapshot lookup.
pub fn resolve_category<B: CatalogBackend>(
    catalog: &Catalog<B>,
    key: &str,
) -> Result<Arc<Category>, CliError> {
    catalog.find_category(key).ok_or_else(|| CliError::NotFound {
        resource_type: "category".into(),
        identifier: key.into(),
        list_command: "categories list".into(),
    })
}

/// Resolve a program ID to its joined entry via snapshot lookup.
pub fn resolve_program<B: CatalogBackend>(
    catalog: &Catalog<B>,
    id: &str,
) -> Result<ProgramEntry, CliError> {
    catalog
        .program(&EntityId::from(id))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "program".into(),
            identifier: id.into(),
            list_command: "programs list".into(),
        })
}

/// Fail unless a user is signed in.
pub fn require_user<B: CatalogBackend>(catalog: &Catalog<B>) -> Result<(), CliError> {
    catalog.identity().map(|_| ()).ok_or(CliError::NotSignedIn)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Print a status line to stderr unless `--quiet`.
pub fn status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}
