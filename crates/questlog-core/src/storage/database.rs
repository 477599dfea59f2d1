//! SQLite-backed log storage.
//!
//! Provides persistent storage for:
//! - Daily log entries (one row per date, JSON payload)
//! - Backup import history
//! - Key-value store for application state

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::backup::{ImportSummary, ParsedBackup};
use super::config::Config;
use super::data_dir;
use super::migrations;
use super::repository::LogRepository;
use crate::entry::DailyLogEntry;
use crate::error::{DatabaseError, Result};

/// One row of the backup import history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: i64,
    pub imported_at: DateTime<Utc>,
    pub entries_imported: u64,
    pub entries_skipped: u64,
    pub config_replaced: bool,
}

const LAST_EXPORT_KEY: &str = "last_export";

/// SQLite database for daily logs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/questlog/questlog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("questlog.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn decode(date: &str, payload: &str) -> Result<DailyLogEntry> {
        serde_json::from_str(payload).map_err(|e| {
            DatabaseError::CorruptPayload {
                date: date.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Upsert one entry on `conn`. Returns whether the date already had a row.
    fn write_entry(conn: &Connection, entry: &DailyLogEntry) -> Result<bool> {
        let key = entry.date.to_string();
        let existed = conn
            .query_row("SELECT 1 FROM daily_logs WHERE date = ?1", params![key], |_| Ok(()))
            .optional()?
            .is_some();
        let payload = serde_json::to_string(entry)?;
        conn.execute(
            "INSERT INTO daily_logs (date, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![key, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(existed)
    }

    fn insert_import(
        conn: &Connection,
        imported: u64,
        skipped: u64,
        config_replaced: bool,
    ) -> Result<i64> {
        conn.execute(
            "INSERT INTO backup_imports (imported_at, entries_imported, entries_skipped, config_replaced)
             VALUES (?1, ?2, ?3, ?4)",
            params![Utc::now().to_rfc3339(), imported, skipped, config_replaced],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Record that a backup import happened.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_import(&self, imported: u64, skipped: u64, config_replaced: bool) -> Result<i64> {
        Self::insert_import(&self.conn, imported, skipped, config_replaced)
    }

    /// Import a backup document in one transaction.
    ///
    /// Every log write and the import history row commit together; on any
    /// error nothing is written and `config` is left unchanged. On success
    /// `config` is replaced when the document carries one; persisting it is
    /// up to the caller.
    ///
    /// # Errors
    /// Returns a backup error for unreadable documents and a database error
    /// if any write fails.
    pub fn import_backup(&mut self, text: &str, config: &mut Config) -> Result<ImportSummary> {
        let parsed = ParsedBackup::parse(text)?;
        let mut summary = parsed.base_summary();

        let tx = self.conn.transaction()?;
        for entry in &parsed.logs {
            if Self::write_entry(&tx, entry)? {
                summary.overwritten += 1;
            }
            summary.imported += 1;
        }
        Self::insert_import(&tx, summary.imported, summary.skipped, summary.config_replaced)?;
        tx.commit()?;

        if let Some(replacement) = parsed.config {
            *config = replacement;
        }
        summary.log_applied();
        Ok(summary)
    }

    /// Backup imports, most recent first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn import_history(&self) -> Result<Vec<ImportRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, imported_at, entries_imported, entries_skipped, config_replaced
             FROM backup_imports
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            let imported_at: String = row.get(1)?;
            Ok(ImportRecord {
                id: row.get(0)?,
                imported_at: DateTime::parse_from_rfc3339(&imported_at)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_default(),
                entries_imported: row.get(2)?,
                entries_skipped: row.get(3)?,
                config_replaced: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Get a value from the key-value store.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    /// Set a value in the key-value store.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// When a backup was last written to a file, if ever.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn last_export(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .kv_get(LAST_EXPORT_KEY)?
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|d| d.with_timezone(&Utc)))
    }

    /// # Errors
    /// Returns an error if the insert fails.
    pub fn mark_exported(&self, at: DateTime<Utc>) -> Result<()> {
        self.kv_set(LAST_EXPORT_KEY, &at.to_rfc3339())
    }
}

impl LogRepository for Database {
    fn save(&mut self, entry: DailyLogEntry) -> Result<Option<DailyLogEntry>> {
        let previous = self.get(entry.date)?;
        Self::write_entry(&self.conn, &entry)?;
        tracing::info!(date = %entry.date, replaced = previous.is_some(), "log entry saved");
        Ok(previous)
    }

    fn get(&self, date: NaiveDate) -> Result<Option<DailyLogEntry>> {
        let key = date.to_string();
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM daily_logs WHERE date = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        payload.map(|p| Self::decode(&key, &p)).transpose()
    }

    fn list(&self) -> Result<Vec<DailyLogEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, payload FROM daily_logs ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date, payload) = row?;
            entries.push(Self::decode(&date, &payload)?);
        }
        Ok(entries)
    }

    fn delete(&mut self, date: NaiveDate) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM daily_logs WHERE date = ?1",
            params![date.to_string()],
        )?;
        if removed > 0 {
            tracing::info!(%date, "log entry deleted");
        }
        Ok(removed > 0)
    }
}
