//! Rolling backups of the data file
//!
//! Every save copies the previous `finance.json` into `<base>/backups/` as
//! `finance-YYYYMMDD-HHMMSS-mmm.json` before it is overwritten. Only the
//! newest `backup_count` copies (a preference) are kept. A backup can be
//! restored over the data file, which is itself backed up first.

mod manager;

pub use manager::{BackupInfo, BackupManager};
