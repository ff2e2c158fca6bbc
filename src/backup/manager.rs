//! Backup manager for the finance tracker
//!
//! Before the data file is overwritten, its previous contents are copied
//! into the backup directory under a timestamped name. Only the newest
//! `keep` copies are retained.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FinanceError, FinanceResult};
use crate::storage::file_io::{read_json_value, write_json_atomic};

const BACKUP_PREFIX: &str = "finance-";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages backup creation, retention and restore
#[derive(Debug, Clone)]
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(backup_dir: PathBuf) -> Self {
        Self { backup_dir }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy `source` into the backup directory and enforce retention
    ///
    /// Returns `None` when there is nothing to back up yet.
    pub fn snapshot(&self, source: &Path, keep: usize) -> FinanceResult<Option<PathBuf>> {
        if !source.is_file() {
            return Ok(None);
        }

        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            FinanceError::Persistence(format!("Failed to create backup directory: {}", e))
        })?;

        let backup_path = self.unique_backup_path(Utc::now());
        fs::copy(source, &backup_path).map_err(|e| {
            FinanceError::Persistence(format!("Failed to write backup file: {}", e))
        })?;
        debug!(path = %backup_path.display(), "created backup");

        self.enforce_retention(keep)?;
        Ok(Some(backup_path))
    }

    fn unique_backup_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stem = format!(
            "{}{}-{:03}",
            BACKUP_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );

        // Several saves can land in the same millisecond
        let taken = fs::read_dir(&self.backup_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .filter(|name| name.starts_with(&stem))
                    .map(|name| suffix_of(&name))
                    .max()
            })
            .unwrap_or(None);

        match taken {
            None => self.backup_dir.join(format!("{}.json", stem)),
            Some(n) => self.backup_dir.join(format!("{}-{}.json", stem, n + 1)),
        }
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> FinanceResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.backup_dir)
            .map_err(|e| FinanceError::Io(format!("Failed to read backup directory: {}", e)))?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| FinanceError::Io(format!("Failed to read directory entry: {}", e)))?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        // Newest first; the filename breaks ties within the same millisecond
        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| suffix_of(&b.filename).cmp(&suffix_of(&a.filename)))
        });

        Ok(backups)
    }

    /// Delete all but the newest `keep` backups (never fewer than one)
    pub fn enforce_retention(&self, keep: usize) -> FinanceResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self.list_backups()?.into_iter().skip(keep.max(1)) {
            fs::remove_file(&backup.path)
                .map_err(|e| FinanceError::Io(format!("Failed to delete old backup: {}", e)))?;
            debug!(file = %backup.filename, "removed old backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Look up a backup by filename
    pub fn get_backup(&self, filename: &str) -> FinanceResult<BackupInfo> {
        let path = self.backup_dir.join(filename);
        if path.is_file() {
            if let Some(info) = parse_backup_info(&path) {
                return Ok(info);
            }
        }
        Err(FinanceError::NotFound {
            entity_type: "Backup",
            identifier: filename.to_string(),
        })
    }

    pub fn latest(&self) -> FinanceResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Replace `target` with the contents of a backup
    ///
    /// The backup must hold a JSON object. The current target is itself
    /// backed up first, so a restore can be undone.
    pub fn restore(&self, backup: &BackupInfo, target: &Path, keep: usize) -> FinanceResult<()> {
        let value = read_json_value(&backup.path)?.ok_or_else(|| {
            FinanceError::Persistence(format!("Backup {} disappeared", backup.filename))
        })?;

        if !value.is_object() {
            return Err(FinanceError::Validation(format!(
                "Backup {} does not contain finance data",
                backup.filename
            )));
        }

        self.snapshot(target, keep)?;
        write_json_atomic(target, &value)?;
        debug!(from = %backup.filename, "restored backup");
        Ok(())
    }
}

fn suffix_of(filename: &str) -> u32 {
    filename
        .strip_suffix(".json")
        .and_then(|stem| stem.split('-').nth(4))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Parse backup info from a backup file
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix(BACKUP_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYYMMDD-HHMMSS-mmm` with an optional `-n` collision suffix
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let (date_part, time_part) = (parts[0], parts[1]);
    if date_part.len() != 8 || time_part.len() != 6 || parts[2].len() != 3 {
        return None;
    }
    if !date_str.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;
    let second: u32 = time_part[4..6].parse().ok()?;
    let millis: u32 = parts[2].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = chrono::NaiveDateTime::new(date, time);

    Some(DateTime::from_naive_utc_and_offset(datetime, Utc))
}
