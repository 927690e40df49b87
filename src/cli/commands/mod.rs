//! CLI command implementations

pub mod add;
pub mod backup;
pub mod list;
pub mod remove;

use anyhow::Result;

use crate::cli::args::Commands;
use crate::cli::context::Context;

/// Dispatch a parsed subcommand
pub fn execute(ctx: &Context, command: &Commands) -> Result<()> {
    match command {
        Commands::List { filter } => list::execute(ctx, filter.as_deref()),
        Commands::Add {
            definition,
            description,
        } => add::execute(ctx, definition, description.as_deref()),
        Commands::Remove { name } => remove::execute(ctx, name),
        Commands::Backup { backup_command } => backup::execute(ctx, backup_command),
    }
}
