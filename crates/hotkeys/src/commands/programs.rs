//! Program command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use hotkeys_core::{Catalog, CatalogBackend, ProgramEntry, ProgramQuery, Shortcut};

use crate::cli::{GlobalOpts, ProgramFilterArgs, ProgramsArgs, ProgramsCommand};
use crate::error::CliError;
use crate::output;

use super::{shortcuts, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct ProgramRow {
    #[tabled(rename = "")]
    favorite: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Popular")]
    popular: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl ProgramRow {
    pub(super) fn new(entry: &ProgramEntry, color: bool) -> Self {
        Self {
            favorite: output::favorite_marker(entry.is_favorite, color),
            id: entry.program.id.to_string(),
            name: entry.program.name.clone(),
            category: entry.category.name.clone(),
            popular: if entry.program.is_popular {
                "yes".into()
            } else {
                String::new()
            },
            description: entry.program.description.clone(),
        }
    }
}

#[derive(Serialize)]
struct ProgramDetail {
    #[serde(flatten)]
    entry: ProgramEntry,
    shortcuts: Vec<Arc<Shortcut>>,
}

fn detail(d: &ProgramDetail, color: bool) -> String {
    let p = &d.entry.program;
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Category:    {} ({})", d.entry.category.name, d.entry.category.slug),
    ];
    if !p.description.is_empty() {
        lines.push(format!("Description: {}", p.description));
    }
    if p.is_popular {
        lines.push("Popular:     yes".into());
    }
    if d.entry.is_favorite {
        lines.push(format!("Favorite:    {}", output::favorite_marker(true, color)));
    }
    lines.push(String::new());
    lines.push(shortcuts::table(&d.shortcuts, color));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<B: CatalogBackend>(
    catalog: &Catalog<B>,
    args: ProgramsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        ProgramsCommand::List(filter) => {
            let query = build_query(catalog, filter)?;
            let entries = catalog.programs(&query);
            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProgramRow::new(e, color),
                |e| e.program.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProgramsCommand::Show { program, search } => {
            let entry = util::resolve_program(catalog, &program)?;
            let shortcuts = catalog
                .shortcuts(&entry.program.id, search.as_deref().unwrap_or_default())
                .await?;
            let view = ProgramDetail { entry, shortcuts };
            let out = output::render_single(
                &global.output,
                &view,
                |d| detail(d, color),
                |d| d.entry.program.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn build_query<B: CatalogBackend>(
    catalog: &Catalog<B>,
    filter: ProgramFilterArgs,
) -> Result<ProgramQuery, CliError> {
    if filter.favorites {
        util::require_user(catalog)?;
    }
    let category = match filter.category {
        Some(key) => Some(util::resolve_category(catalog, &key)?.id.clone()),
        None => None,
    };
    Ok(ProgramQuery {
        search: filter.search.unwrap_or_default(),
        category,
        popular_only: filter.popular,
        favorites_only: filter.favorites,
    })
}
