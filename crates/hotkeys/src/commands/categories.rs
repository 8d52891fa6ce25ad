//! Category command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use hotkeys_core::{Catalog, CatalogBackend, Category, ProgramEntry, ProgramQuery};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Programs")]
    programs: usize,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Serialize)]
struct CategoryDetail {
    #[serde(flatten)]
    category: Arc<Category>,
    programs: Vec<ProgramEntry>,
}

fn detail(d: &CategoryDetail) -> String {
    let c = &d.category;
    let mut lines = vec![
        format!("ID:          {}", c.id),
        format!("Name:        {}", c.name),
        format!("Slug:        {}", c.slug),
        format!("Color:       {}", c.color),
    ];
    if !c.description.is_empty() {
        lines.push(format!("Description: {}", c.description));
    }
    lines.push(format!("Programs:    {}", d.programs.len()));
    for entry in &d.programs {
        lines.push(format!("  - {} ({})", entry.program.name, entry.program.id));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle<B: CatalogBackend>(
    catalog: &Catalog<B>,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List => {
            let categories = catalog.categories();
            let out = output::render_list(
                &global.output,
                categories.as_slice(),
                |c| CategoryRow {
                    slug: c.slug.to_string(),
                    name: c.name.clone(),
                    programs: catalog
                        .programs(&ProgramQuery::default().in_category(c.id.clone()))
                        .len(),
                    description: c.description.clone(),
                },
                |c| c.slug.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Show { category } => {
            let category = util::resolve_category(catalog, &category)?;
            let programs =
                catalog.programs(&ProgramQuery::default().in_category(category.id.clone()));
            let view = CategoryDetail { category, programs };
            let out = output::render_single(&global.output, &view, detail, |d| {
                d.category.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
