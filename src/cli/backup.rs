//! Backup CLI commands

use clap::Subcommand;

use crate::backup::{BackupInfo, BackupManager};
use crate::error::{FinanceError, FinanceResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// List all available backups
    List,

    /// Restore the data file from a backup
    Restore {
        /// Backup filename (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &mut Storage, cmd: BackupCommands) -> FinanceResult<()> {
    let manager = storage.backups().clone();

    match cmd {
        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("A backup is taken automatically before every change.");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                println!(
                    "  {}. {} ({} ago, {})",
                    i + 1,
                    backup.filename,
                    format_duration(age),
                    format_size(backup.size_bytes),
                );
            }
            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let info = resolve_backup(&manager, &backup)?;

            println!("Backup: {}", info.filename);
            println!("Created: {}", info.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

            if !force {
                println!();
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  finance backup restore {} --force", backup);
                return Ok(());
            }

            let target = storage.paths().data_file();
            manager.restore(&info, &target, storage.settings.preferences.backup_count)?;
            let report = storage.load();

            println!(
                "Restored {} transaction(s) and {} bill(s).",
                report.transactions_loaded, report.bills_loaded
            );
            if !report.is_clean() {
                println!(
                    "Skipped {} transaction(s) and {} bill(s) that could not be read.",
                    report.skipped_transactions, report.skipped_bills
                );
            }
        }
    }

    Ok(())
}

fn resolve_backup(manager: &BackupManager, backup: &str) -> FinanceResult<BackupInfo> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager.latest()?.ok_or_else(|| FinanceError::NotFound {
            entity_type: "Backup",
            identifier: "latest".to_string(),
        });
    }

    match manager.get_backup(backup) {
        Err(e) if e.is_not_found() && !backup.ends_with(".json") => {
            manager.get_backup(&format!("{}.json", backup))
        }
        other => other,
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    if seconds < 60 {
        format!("{}s", seconds.max(0))
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

/// Format a file size in human-readable form
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
