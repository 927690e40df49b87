//! Remove command implementation

use anyhow::Result;
use colored::Colorize;

use crate::cli::context::Context;

/// Execute the remove command
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let store = ctx.store()?;

    let Some(existing) = store.find_alias(name)? else {
        anyhow::bail!("Alias '{}' not found in {}", name, ctx.config_file.display());
    };

    println!(
        "Found alias '{}' = '{}'",
        name.cyan(),
        existing.command.dimmed()
    );

    if !ctx.confirm("Remove this alias?", false)? {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.snapshot()?;
    let removed = store.remove_alias(name)?;

    if removed > 1 {
        ctx.print_success(&format!("Removed {} definitions of '{}'", removed, name));
    } else {
        ctx.print_success(&format!("Removed alias '{}'", name));
    }

    ctx.print_reload_hint();

    Ok(())
}
