//! Favorite command handlers.

use hotkeys_core::{Catalog, CatalogBackend};

use crate::cli::{FavoritesArgs, FavoritesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::programs::ProgramRow;
use super::util;

pub async fn handle<B: CatalogBackend>(
    catalog: &Catalog<B>,
    args: FavoritesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_user(catalog)?;
    match args.command {
        FavoritesCommand::List => {
            let color = output::should_color(&global.color);
            let entries = catalog.favorite_programs();
            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProgramRow::new(e, color),
                |e| e.program.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FavoritesCommand::Toggle { program } => {
            let entry = util::resolve_program(catalog, &program)?;
            let now_favorite = catalog.toggle_favorite(&entry.program.id).await?;
            let verb = if now_favorite { "Added" } else { "Removed" };
            let preposition = if now_favorite { "to" } else { "from" };
            util::status(
                &format!("{verb} {} {preposition} favorites", entry.program.name),
                global.quiet,
            );
            Ok(())
        }
    }
}
