//! Shortcut command handlers.

use std::sync::Arc;

use tabled::Tabled;
use tabled::settings::Style;

use hotkeys_core::{Catalog, CatalogBackend, Shortcut};

use crate::cli::{GlobalOpts, ShortcutsArgs, ShortcutsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ShortcutRow {
    #[tabled(rename = "Keys")]
    keys: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl ShortcutRow {
    fn new(s: &Shortcut, color: bool) -> Self {
        Self {
            keys: output::keys_cell(&s.keys, color),
            name: s.name.clone(),
            description: s.description.clone(),
            id: s.id.to_string(),
        }
    }
}

/// Rounded table of shortcuts, for detail views.
pub(super) fn table(shortcuts: &[Arc<Shortcut>], color: bool) -> String {
    if shortcuts.is_empty() {
        return "No shortcuts.".into();
    }
    let rows: Vec<_> = shortcuts.iter().map(|s| ShortcutRow::new(s, color)).collect();
    tabled::Table::new(rows).with(Style::rounded()).to_string()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<B: CatalogBackend>(
    catalog: &Catalog<B>,
    args: ShortcutsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ShortcutsCommand::List { program, search } => {
            let entry = util::resolve_program(catalog, &program)?;
            let shortcuts = catalog
                .shortcuts(&entry.program.id, search.as_deref().unwrap_or_default())
                .await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &shortcuts,
                |s| ShortcutRow::new(s, color),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
