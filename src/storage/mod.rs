//! Storage layer for the finance tracker
//!
//! All state lives in one JSON file. `Storage` owns the in-memory
//! repositories and the settings, loads them tolerantly and saves the whole
//! state atomically after taking a backup of the previous file.

pub mod bills;
pub mod file_io;
pub mod state;
pub mod transactions;

pub use bills::BillRepository;
pub use file_io::{read_json_value, write_json_atomic};
pub use state::LoadReport;
pub use transactions::TransactionRepository;

use chrono::Utc;
use tracing::{info, warn};

use crate::backup::BackupManager;
use crate::config::paths::FinancePaths;
use crate::config::settings::Settings;
use crate::error::FinanceResult;

use state::{decode_state, LoadedState, NextIds, StateFile, SCHEMA_VERSION};

/// Main storage coordinator that owns every repository
#[derive(Debug)]
pub struct Storage {
    paths: FinancePaths,
    backups: BackupManager,
    pub transactions: TransactionRepository,
    pub bills: BillRepository,
    pub settings: Settings,
}

impl Storage {
    /// Create an empty Storage rooted at `paths`
    pub fn new(paths: FinancePaths) -> FinanceResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            backups: BackupManager::new(paths.backup_dir()),
            transactions: TransactionRepository::new(),
            bills: BillRepository::new(),
            settings: Settings::default(),
            paths,
        })
    }

    /// Create a Storage and load whatever is on disk
    pub fn open(paths: FinancePaths) -> FinanceResult<(Self, LoadReport)> {
        let mut storage = Self::new(paths)?;
        let report = storage.load();
        Ok((storage, report))
    }

    pub fn paths(&self) -> &FinancePaths {
        &self.paths
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Replace in-memory state with the contents of the data file
    ///
    /// Never fails: a missing file yields empty state, and an unreadable one
    /// yields empty state plus a warning. The unreadable file stays on disk
    /// until the next save backs it up.
    pub fn load(&mut self) -> LoadReport {
        let path = self.paths.data_file();
        let mut report = LoadReport::default();

        let loaded = match read_json_value(&path) {
            Ok(None) => {
                report.fresh = true;
                LoadedState::empty()
            }
            Ok(Some(value)) => decode_state(value, &mut report),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "data file unreadable, starting empty");
                report.recovered_error = Some(e.to_string());
                LoadedState::empty()
            }
        };

        self.transactions = loaded.transactions;
        self.bills = loaded.bills;
        self.settings = loaded.settings;

        if !report.is_clean() {
            warn!(
                skipped_transactions = report.skipped_transactions,
                skipped_bills = report.skipped_bills,
                "data file loaded with problems"
            );
        }
        report
    }

    /// Write the whole state to disk
    ///
    /// The previous file is copied to the backup directory first.
    pub fn save(&self) -> FinanceResult<()> {
        let path = self.paths.data_file();
        self.backups
            .snapshot(&path, self.settings.preferences.backup_count)?;

        let file = StateFile {
            schema_version: SCHEMA_VERSION,
            last_updated: Utc::now(),
            next_ids: NextIds {
                transaction: self.transactions.next_id().value(),
                bill: self.bills.next_id().value(),
            },
            transactions: self.transactions.records(),
            bills: self.bills.records(),
            settings: &self.settings,
        };
        write_json_atomic(&path, &file)?;

        info!(
            transactions = self.transactions.len(),
            bills = self.bills.len(),
            "saved data file"
        );
        Ok(())
    }

    /// Run a mutation and persist it
    ///
    /// If either the mutation or the save fails, in-memory state is put back
    /// to what it was before the call.
    pub fn commit<T, F>(&mut self, op: F) -> FinanceResult<T>
    where
        F: FnOnce(&mut Self) -> FinanceResult<T>,
    {
        let transactions = self.transactions.clone();
        let bills = self.bills.clone();
        let settings = self.settings.clone();

        let result = op(self).and_then(|value| self.save().map(|_| value));

        if result.is_err() {
            self.transactions = transactions;
            self.bills = bills;
            self.settings = settings;
        }
        result
    }
}
