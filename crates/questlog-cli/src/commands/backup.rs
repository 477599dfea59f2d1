//! Backup commands for CLI.

use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use questlog_core::storage::{Backup, Config, Database};

#[derive(Subcommand)]
pub enum BackupAction {
    /// Export config and all logs as JSON
    Export {
        /// Write to this file (or into this directory) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a JSON backup, overwriting logs with matching dates
    Import {
        /// Backup file
        file: PathBuf,
    },
    /// Show the last file export and past imports
    History,
}

pub fn run(action: BackupAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        BackupAction::Export { out } => {
            let config = Config::load()?;
            let now = Utc::now();
            let json = Backup::export(&config, &db, now)?.to_json_pretty()?;
            match out {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(Backup::file_name(now.date_naive()))
                    } else {
                        path
                    };
                    std::fs::write(&path, json)?;
                    db.mark_exported(now)?;
                    println!("Backup written: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        BackupAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let mut config = Config::load()?;
            let summary = db.import_backup(&text, &mut config)?;
            if summary.config_replaced {
                config.save()?;
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        BackupAction::History => {
            match db.last_export()? {
                Some(at) => println!("Last export: {}", at.to_rfc3339()),
                None => println!("Last export: never"),
            }
            println!("{}", serde_json::to_string_pretty(&db.import_history()?)?);
        }
    }
    Ok(())
}
