pub mod backup;
pub mod config;
pub mod log;
pub mod stats;

use questlog_core::storage::{Config, Database};
use questlog_core::EngineReport;

/// Load config and the stored log, then run the full pipeline.
pub(crate) fn load_report() -> Result<EngineReport, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok(questlog_core::run_from(&db, &config)?)
}
