//! Admin command handlers: saves and cascading deletes.

use hotkeys_core::{
    Catalog, CatalogBackend, CategoryDraft, Command as CoreCommand, CommandResult, EntityId,
    EntityKind, ProgramDraft, ShortcutDraft,
};

use crate::cli::{
    AdminArgs, AdminCategoriesCommand, AdminCommand, AdminProgramsCommand, AdminShortcutsCommand,
    EntityKindArg, GlobalOpts,
};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<EntityKindArg> for EntityKind {
    fn from(kind: EntityKindArg) -> Self {
        match kind {
            EntityKindArg::Category => Self::Category,
            EntityKindArg::Program => Self::Program,
            EntityKindArg::Shortcut => Self::Shortcut,
        }
    }
}

pub async fn handle<B: CatalogBackend>(
    catalog: &Catalog<B>,
    args: AdminArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_user(catalog)?;

    let command = match args.command {
        AdminCommand::Categories {
            command: AdminCategoriesCommand::Save(a),
        } => CoreCommand::SaveCategory(CategoryDraft {
            id: a.id.map(EntityId::from),
            name: a.name,
            slug: a.slug,
            description: a.description,
            icon: a.icon,
            color: a.color,
        }),

        AdminCommand::Programs {
            command: AdminProgramsCommand::Save(a),
        } => {
            // Unknown keys pass through as ids; core rejects them.
            let category_id = a.category.map(|key| {
                catalog
                    .find_category(&key)
                    .map_or_else(|| EntityId::from(key), |c| c.id.clone())
            });
            CoreCommand::SaveProgram(ProgramDraft {
                id: a.id.map(EntityId::from),
                category_id,
                name: a.name,
                description: a.description,
                icon: a.icon,
                is_popular: a.popular,
            })
        }

        AdminCommand::Shortcuts {
            command: AdminShortcutsCommand::Save(a),
        } => CoreCommand::SaveShortcut(ShortcutDraft {
            id: a.id.map(EntityId::from),
            program_id: a.program.map(EntityId::from),
            name: a.name,
            keys: a.keys,
            description: a.description,
        }),

        AdminCommand::Delete { kind, id } => {
            let kind = EntityKind::from(kind);
            let prompt = match kind {
                EntityKind::Category => format!(
                    "Delete category '{id}' with all its programs, shortcuts and favorites?"
                ),
                EntityKind::Program => {
                    format!("Delete program '{id}' with its shortcuts and favorites?")
                }
                EntityKind::Shortcut => format!("Delete shortcut '{id}'?"),
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            CoreCommand::Delete {
                kind,
                id: EntityId::from(id),
            }
        }
    };

    let result = catalog.execute(command).await?;
    report(&result, global);
    Ok(())
}

fn report(result: &CommandResult, global: &GlobalOpts) {
    let out = output::render_single(&global.output, result, summary, |r| match r {
        CommandResult::Saved { id, .. } | CommandResult::Deleted { id, .. } => id.to_string(),
    });
    output::print_output(&out, global.quiet);
}

fn summary(result: &CommandResult) -> String {
    match result {
        CommandResult::Saved { kind, id } => format!("Saved {kind} {id}"),
        CommandResult::Deleted { kind, id, cascade } => {
            let mut line = format!("Deleted {kind} {id}");
            if !cascade.programs.is_empty() {
                line.push_str(&format!(", {} program(s)", cascade.programs.len()));
            }
            if cascade.shortcuts > 0 {
                line.push_str(&format!(", {} shortcut(s)", cascade.shortcuts));
            }
            if cascade.favorites > 0 {
                line.push_str(&format!(", {} favorite(s)", cascade.favorites));
            }
            line
        }
    }
}
