//! JSON backup export and import.
//!
//! A backup carries the configuration and every log entry:
//!
//! ```json
//! { "version": 1, "exportedAt": "2025-01-01T08:00:00Z", "config": {...}, "logs": [...] }
//! ```
//!
//! Import replaces the configuration when the file has one and merges logs by
//! date, the incoming entry overwriting any stored entry for the same date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::config::Config;
use super::repository::LogRepository;
use crate::entry::DailyLogEntry;
use crate::error::{BackupError, Result};

/// Backup format version written by this build.
pub const BACKUP_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u64,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub logs: Vec<DailyLogEntry>,
}

/// What an import changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Entries written (new dates plus overwrites).
    pub imported: u64,
    /// Of `imported`, how many replaced an existing date.
    pub overwritten: u64,
    /// Records dropped because they had no usable date.
    pub skipped: u64,
    pub config_replaced: bool,
}

impl Backup {
    /// Snapshot `config` and everything in `repo`.
    ///
    /// # Errors
    /// Returns an error if the repository cannot be read.
    pub fn export<R: LogRepository + ?Sized>(
        config: &Config,
        repo: &R,
        exported_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            version: BACKUP_VERSION,
            exported_at,
            config: config.clone(),
            logs: repo.snapshot()?,
        })
    }

    /// Suggested file name for a backup taken on `date`.
    pub fn file_name(date: NaiveDate) -> String {
        format!("questlog-backup-{date}.json")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A backup document that has been read and validated but not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBackup {
    /// Replacement configuration, when the document carries one.
    pub config: Option<Config>,
    pub logs: Vec<DailyLogEntry>,
    /// Records dropped because they had no usable date.
    pub skipped: u64,
}

impl ParsedBackup {
    /// Read a backup document.
    ///
    /// A missing `version` is read as version 1. Log records that fail to
    /// parse (typically a missing or malformed date) are skipped and counted.
    ///
    /// # Errors
    /// Returns [`BackupError`] for non-object payloads, unknown versions or an
    /// unreadable `config` section.
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| BackupError::Malformed(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| BackupError::Malformed("expected a JSON object".into()))?;

        let version = match obj.get("version") {
            None => BACKUP_VERSION,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| BackupError::Malformed("version must be a whole number".into()))?,
        };
        if version != BACKUP_VERSION {
            return Err(BackupError::UnsupportedVersion {
                found: version,
                expected: BACKUP_VERSION,
            }
            .into());
        }

        let config = obj
            .get("config")
            .filter(|c| !c.is_null())
            .map(|raw| {
                serde_json::from_value(raw.clone())
                    .map_err(|e| BackupError::Malformed(format!("config: {e}")))
            })
            .transpose()?;

        let mut parsed = Self {
            config,
            logs: Vec::new(),
            skipped: 0,
        };
        let records = obj
            .get("logs")
            .and_then(|l| l.as_array())
            .map(|a| a.as_slice())
            .unwrap_or_default();
        for raw in records {
            match serde_json::from_value::<DailyLogEntry>(raw.clone()) {
                Ok(entry) => parsed.logs.push(entry),
                Err(e) => {
                    tracing::warn!("skipping backup log record: {e}");
                    parsed.skipped += 1;
                }
            }
        }
        Ok(parsed)
    }

    /// Summary with the skip count and config flag filled in; write counts
    /// are left for the caller.
    pub(crate) fn base_summary(&self) -> ImportSummary {
        ImportSummary {
            skipped: self.skipped,
            config_replaced: self.config.is_some(),
            ..ImportSummary::default()
        }
    }
}

/// Import a backup document into `config` and `repo`, one save per record.
///
/// The logs are written before `config` is touched, so a storage error leaves
/// `config` unchanged. [`Database::import_backup`](super::Database::import_backup)
/// additionally makes the log writes all-or-nothing.
///
/// # Errors
/// Returns [`BackupError`] for unreadable documents (see
/// [`ParsedBackup::parse`]) and storage errors from the repository.
pub fn import_json<R: LogRepository + ?Sized>(
    text: &str,
    config: &mut Config,
    repo: &mut R,
) -> Result<ImportSummary> {
    let parsed = ParsedBackup::parse(text)?;
    let mut summary = parsed.base_summary();

    for entry in parsed.logs {
        if repo.save(entry)?.is_some() {
            summary.overwritten += 1;
        }
        summary.imported += 1;
    }
    if let Some(replacement) = parsed.config {
        *config = replacement;
    }

    summary.log_applied();
    Ok(summary)
}

impl ImportSummary {
    pub(crate) fn log_applied(&self) {
        tracing::info!(
            imported = self.imported,
            overwritten = self.overwritten,
            skipped = self.skipped,
            config_replaced = self.config_replaced,
            "backup imported"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryRepository;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn exported_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-10T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn export_then_import_into_empty_store() {
        let mut source = MemoryRepository::new();
        let mut e = DailyLogEntry::blank(date("2025-01-02"));
        e.cardio = true;
        source.save(e.clone()).unwrap();
        source.save(DailyLogEntry::blank(date("2025-01-01"))).unwrap();
        let mut cfg = Config::default();
        cfg.rules.wisdom_max_per_week = 2;

        let json = Backup::export(&cfg, &source, exported_at())
            .unwrap()
            .to_json_pretty()
            .unwrap();
        assert!(json.contains("\"exportedAt\""));

        let mut target_cfg = Config::default();
        let mut target = MemoryRepository::new();
        let summary = import_json(&json, &mut target_cfg, &mut target).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.overwritten, 0);
        assert!(summary.config_replaced);
        assert_eq!(target_cfg.rules.wisdom_max_per_week, 2);
        assert_eq!(target.get(e.date).unwrap(), Some(e));
    }

    #[test]
    fn import_overwrites_matching_dates_and_keeps_others() {
        let mut repo = MemoryRepository::new();
        let mut old = DailyLogEntry::blank(date("2025-01-01"));
        old.cardio = true;
        repo.save(old).unwrap();
        repo.save(DailyLogEntry::blank(date("2025-01-05"))).unwrap();

        let text = r#"{"version":1,"logs":[{"date":"2025-01-01","restDay":true}]}"#;
        let mut cfg = Config::default();
        let summary = import_json(text, &mut cfg, &mut repo).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.overwritten, 1);
        assert!(!summary.config_replaced);
        let stored = repo.get(date("2025-01-01")).unwrap().unwrap();
        assert!(stored.rest_day);
        assert!(!stored.cardio);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn records_without_dates_are_skipped() {
        let text = r#"{"logs":[{"cardio":true},{"date":"not-a-date"},{"date":"2025-02-01"}]}"#;
        let mut cfg = Config::default();
        let mut repo = MemoryRepository::new();
        let summary = import_json(text, &mut cfg, &mut repo).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut cfg = Config::default();
        let mut repo = MemoryRepository::new();
        let err = import_json(r#"{"version":2,"logs":[]}"#, &mut cfg, &mut repo).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Backup(BackupError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let mut cfg = Config::default();
        let mut repo = MemoryRepository::new();
        for text in ["[]", "42", "{nope"] {
            let err = import_json(text, &mut cfg, &mut repo).unwrap_err();
            assert!(matches!(err, CoreError::Backup(BackupError::Malformed(_))), "{text}");
        }
    }

    #[test]
    fn parse_keeps_config_absent_when_null() {
        let parsed =
            ParsedBackup::parse(r#"{"config":null,"logs":[{"date":"2025-02-01"},{}]}"#).unwrap();
        assert_eq!(parsed.config, None);
        assert_eq!(parsed.logs.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert!(!parsed.base_summary().config_replaced);
    }

    #[test]
    fn malformed_config_leaves_store_untouched() {
        let mut cfg = Config::default();
        let mut repo = MemoryRepository::new();
        let text = r#"{"config":{"rules":"nope"},"logs":[{"date":"2025-02-01"}]}"#;
        assert!(import_json(text, &mut cfg, &mut repo).is_err());
        assert!(repo.is_empty());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn file_name_uses_date() {
        assert_eq!(
            Backup::file_name(date("2025-03-09")),
            "questlog-backup-2025-03-09.json"
        );
    }
}
