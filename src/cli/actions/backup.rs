//! Backup action implementation

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use crate::backup::BackupManager;
use crate::cli::args::BackupCommands;
use crate::cli::context::Context;

/// Execute the backup action
pub fn execute(ctx: &Context, backup_cmd: &BackupCommands) -> Result<()> {
    let manager = BackupManager::new(&ctx.env_file, &ctx.config);

    match backup_cmd {
        BackupCommands::List => list_backups(&manager),
        BackupCommands::Restore { id, yes } => restore_backup(ctx, &manager, id, *yes),
        BackupCommands::Clean { keep } => clean_backups(&manager, *keep),
    }
}

fn list_backups(manager: &BackupManager) -> Result<()> {
    let backups = manager.list_backups()?;

    if backups.is_empty() {
        println!("{}", "No backups found.".dimmed());
        return Ok(());
    }

    println!(
        "{:<40} {:<22} {}",
        "ID".bold().cyan(),
        "TIMESTAMP".bold().cyan(),
        "SIZE".bold().cyan()
    );
    println!("{}", "─".repeat(72).dimmed());

    for backup in &backups {
        println!(
            "{:<40} {:<22} {}",
            backup.id,
            backup.timestamp.dimmed(),
            format_size(backup.size).dimmed()
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "Total: {} backup(s) in {}",
            backups.len(),
            manager.backup_dir().display()
        )
        .dimmed()
    );
    Ok(())
}

fn restore_backup(ctx: &Context, manager: &BackupManager, id: &str, yes: bool) -> Result<()> {
    let backup = manager
        .get_backup(id)?
        .ok_or_else(|| anyhow::anyhow!("Backup not found: {}", id))?;

    println!(
        "Restoring backup: {} ({})",
        backup.id.cyan(),
        backup.timestamp.dimmed()
    );

    if !yes
        && !Confirm::new()
            .with_prompt(format!("Overwrite {}?", ctx.env_file.display()))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    manager.restore_backup(&backup.id, &ctx.env_file)?;
    ctx.print_success(&format!(
        "Restored backup to {}",
        ctx.env_file.display().to_string().cyan()
    ));
    Ok(())
}

fn clean_backups(manager: &BackupManager, keep: usize) -> Result<()> {
    let removed = manager.cleanup_keep(keep)?;

    if removed == 0 {
        println!("{}", "No old backups to clean.".dimmed());
    } else {
        println!(
            "{} Removed {} old backup(s), keeping {}",
            "✓".green(),
            removed,
            keep
        );
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;

    if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
