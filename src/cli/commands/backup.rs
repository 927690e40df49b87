//! Backup command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::backup::BackupManager;
use crate::cli::args::BackupCommands;
use crate::cli::context::Context;

/// Execute the backup command
pub fn execute(ctx: &Context, backup_cmd: &BackupCommands) -> Result<()> {
    let backup_manager = ctx.backup_manager();

    match backup_cmd {
        BackupCommands::Create => create_backup(ctx, &backup_manager),
        BackupCommands::List => list_backups(&backup_manager),
        BackupCommands::Restore { path } => restore_backup(ctx, &backup_manager, path.as_deref()),
        BackupCommands::Rotate { max } => rotate_backups(ctx, &backup_manager, *max),
    }
}

fn create_backup(ctx: &Context, manager: &BackupManager) -> Result<()> {
    let path = manager.create_backup()?;
    ctx.print_success(&format!(
        "Backed up {} to {}",
        manager.tracked_path().display(),
        path.display().to_string().cyan()
    ));
    Ok(())
}

fn list_backups(manager: &BackupManager) -> Result<()> {
    let backups = manager.list_backups_sorted()?;

    if backups.is_empty() {
        println!("{}", "No backups found.".dimmed());
        return Ok(());
    }

    println!(
        "{} {}",
        "Backups in".bold(),
        manager.backup_dir().display().to_string().bold()
    );
    println!();

    println!(
        "{:<40} {:<20} {:<10} {}",
        "FILE".bold().cyan(),
        "MODIFIED".bold().cyan(),
        "SIZE".bold().cyan(),
        "XZ".bold().cyan()
    );
    println!("{}", "─".repeat(76).dimmed());

    for backup in &backups {
        println!(
            "{:<40} {:<20} {:<10} {}",
            backup.file_name().white(),
            backup.modified_display().dimmed(),
            format_size(backup.size).dimmed(),
            if backup.compressed { "yes" } else { "" }
        );
    }

    println!();
    println!("{}", format!("Total: {} backup(s)", backups.len()).dimmed());

    Ok(())
}

fn restore_backup(ctx: &Context, manager: &BackupManager, path: Option<&Path>) -> Result<()> {
    let backup = match path {
        Some(p) => p.to_path_buf(),
        None => match manager.last_backup()? {
            Some(entry) => entry.path,
            None => anyhow::bail!("No backups found for {}", ctx.config_file.display()),
        },
    };

    println!("Restoring backup: {}", backup.display().to_string().cyan());

    if !ctx.confirm(
        "This will overwrite your current configuration. Continue?",
        false,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    let snapshot = manager
        .restore_with_snapshot(&backup)
        .map_err(|e| anyhow::anyhow!("Restore failed: {}", e))?;
    if let Some(snapshot) = snapshot {
        println!(
            "Previous state saved to {}",
            snapshot.display().to_string().dimmed()
        );
    }

    ctx.print_success(&format!(
        "Restored backup to {}",
        ctx.config_file.display().to_string().cyan()
    ));
    ctx.print_reload_hint();

    Ok(())
}

fn rotate_backups(ctx: &Context, manager: &BackupManager, max: Option<usize>) -> Result<()> {
    let max = max.unwrap_or(manager.policy().max_backups);
    let report = manager.cleanup_and_compress_old_backups(max)?;

    for failure in &report.failures {
        ctx.print_error(&failure.to_string());
    }

    if report.deleted == 0 && report.compressed.is_empty() {
        println!("{}", "Nothing to rotate.".dimmed());
    } else {
        ctx.print_success(&format!(
            "Compressed {} and removed {} old backup(s)",
            report.compressed.len(),
            report.deleted
        ));
    }

    if !report.is_clean() {
        anyhow::bail!("{} backup(s) could not be rotated", report.failures.len());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
