mod config;
pub mod backup;
pub mod database;
pub mod migrations;
pub mod repository;

pub use backup::{Backup, ImportSummary, ParsedBackup, BACKUP_VERSION};
pub use config::{Config, RulesConfig, TargetsConfig};
pub use database::{Database, ImportRecord};
pub use repository::{LogRepository, MemoryRepository};

use std::path::PathBuf;

/// Returns the questlog data directory, creating it if needed.
///
/// `QUESTLOG_DATA_DIR` overrides the location outright. Otherwise the
/// directory is `~/.config/questlog/`, or `~/.config/questlog-dev/` when
/// `QUESTLOG_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("QUESTLOG_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("QUESTLOG_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("questlog-dev")
            } else {
                base_dir.join("questlog")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
