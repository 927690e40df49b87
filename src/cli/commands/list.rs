//! List command implementation

use anyhow::Result;
use colored::Colorize;

use crate::cli::context::Context;
use crate::model::AliasRecord;

/// Get terminal width, defaulting to 80 if unable to detect
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Split the terminal width between name, command and description columns
fn calculate_column_widths(term_width: usize) -> (usize, usize, usize) {
    // "│ " prefix (2) + " │" suffix (2) + spaces between columns (2)
    let fixed_overhead = 6;
    let available = term_width.saturating_sub(fixed_overhead);

    let name_width = (available * 20 / 100).clamp(8, 24);
    let desc_width = (available * 25 / 100).clamp(8, 30);
    let command_width = available
        .saturating_sub(name_width + desc_width)
        .max(10);

    (name_width, command_width, desc_width)
}

/// Truncate a string to fit within max_width, adding "..." if truncated
fn truncate_value(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        format!("{}...", s.chars().take(max_width - 3).collect::<String>())
    }
}

/// Print every alias in the managed file, optionally filtered
pub fn execute(ctx: &Context, filter: Option<&str>) -> Result<()> {
    let store = ctx.store()?;
    if !store.exists() {
        ctx.print_warning(&format!(
            "{} does not exist yet, no aliases defined",
            ctx.config_file.display()
        ));
        return Ok(());
    }

    let aliases: Vec<AliasRecord> = store
        .load_aliases()?
        .into_iter()
        .filter(|a| filter.map_or(true, |f| a.matches(f)))
        .collect();

    if aliases.is_empty() {
        println!("{}", "No aliases found".dimmed());
        return Ok(());
    }

    let (name_w, cmd_w, desc_w) = calculate_column_widths(get_terminal_width());
    let content_width = name_w + 1 + cmd_w + 1 + desc_w;

    println!(
        "┌─ {} {}",
        ctx.config_file.display().to_string().bold(),
        format!("({})", ctx.shell_type).dimmed()
    );
    println!(
        "│ {:<name_w$} {:<cmd_w$} {:<desc_w$} │",
        "NAME".bold().cyan(),
        "COMMAND".bold().cyan(),
        "DESCRIPTION".bold().cyan(),
    );
    println!("│ {} │", "─".repeat(content_width).dimmed());

    for alias in &aliases {
        let description = alias.description.as_deref().unwrap_or("");
        println!(
            "│ {:<name_w$} {:<cmd_w$} {:<desc_w$} │",
            truncate_value(&alias.name, name_w).cyan(),
            truncate_value(&alias.command, cmd_w),
            truncate_value(description, desc_w).dimmed(),
        );
    }

    println!("└{}┘", "─".repeat(content_width + 2).dimmed());
    println!("{}", format!("Total: {} alias(es)", aliases.len()).dimmed());

    Ok(())
}
