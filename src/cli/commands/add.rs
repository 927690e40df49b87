//! Add command implementation

use anyhow::Result;
use colored::Colorize;

use crate::cli::args::ConflictStrategy;
use crate::cli::context::Context;
use crate::model::AliasRecord;

/// Execute the add command
pub fn execute(ctx: &Context, definition: &str, description: Option<&str>) -> Result<()> {
    let mut record = parse_alias_definition(definition)?;
    if let Some(text) = description {
        record = record.with_description(text);
    }

    let store = ctx.store()?;
    // Reject before a snapshot is taken
    store.screen(&record)?;
    let existing = if store.exists() {
        store.find_alias(&record.name)?
    } else {
        None
    };

    if let Some(existing) = &existing {
        if existing == &record && existing.description == record.description {
            println!("Alias '{}' is already defined that way.", record.name.cyan());
            return Ok(());
        }

        let should_overwrite = match ctx.on_conflict {
            ConflictStrategy::Skip => {
                ctx.print_warning(&format!(
                    "Alias '{}' already exists, skipping",
                    record.name
                ));
                return Ok(());
            }
            ConflictStrategy::Overwrite => true,
            ConflictStrategy::Ask => {
                println!(
                    "Alias '{}' already exists with command: {}",
                    record.name.cyan(),
                    existing.command.dimmed()
                );
                ctx.confirm("Overwrite?", false)?
            }
        };

        if !should_overwrite {
            println!("Skipped.");
            return Ok(());
        }
    }

    if let Some(backup) = ctx.snapshot()? {
        tracing::debug!(backup = %backup.display(), "snapshot before add");
    }

    if existing.is_some() {
        store.replace_alias(&record.name, &record)?;
        ctx.print_success(&format!(
            "Updated alias '{}' = '{}'",
            record.name.cyan(),
            record.command
        ));
    } else {
        store.add_alias(&record)?;
        ctx.print_success(&format!(
            "Added alias '{}' = '{}'",
            record.name.cyan(),
            record.command
        ));
    }

    ctx.print_reload_hint();

    Ok(())
}

/// Split `NAME=COMMAND`, dropping one layer of surrounding quotes
fn parse_alias_definition(definition: &str) -> Result<AliasRecord> {
    let parts: Vec<&str> = definition.splitn(2, '=').collect();
    if parts.len() != 2 {
        anyhow::bail!("Invalid alias format. Use: NAME=COMMAND");
    }

    let name = parts[0].trim();
    let command = strip_outer_quotes(parts[1].trim());

    Ok(AliasRecord::new(name, command))
}

fn strip_outer_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
