//! The log collection the engine reads from.
//!
//! Storage backends implement [`LogRepository`]. The engine only ever sees a
//! [`LogRepository::snapshot`]; it never writes back.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::entry::DailyLogEntry;
use crate::error::Result;

/// One entry per calendar date, overwrite-on-save.
pub trait LogRepository {
    /// Store `entry`, fully replacing any entry already saved for its date.
    ///
    /// Returns the replaced entry, if there was one.
    fn save(&mut self, entry: DailyLogEntry) -> Result<Option<DailyLogEntry>>;

    fn get(&self, date: NaiveDate) -> Result<Option<DailyLogEntry>>;

    /// All entries, oldest first.
    fn list(&self) -> Result<Vec<DailyLogEntry>>;

    /// Remove the entry for `date`. Returns whether one existed.
    fn delete(&mut self, date: NaiveDate) -> Result<bool>;

    /// Immutable copy of the whole collection for one engine run.
    fn snapshot(&self) -> Result<Vec<DailyLogEntry>> {
        self.list()
    }
}

/// In-memory repository keyed by date.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    entries: BTreeMap<NaiveDate, DailyLogEntry>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DailyLogEntry> for MemoryRepository {
    fn from_iter<I: IntoIterator<Item = DailyLogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.date, e)).collect(),
        }
    }
}

impl LogRepository for MemoryRepository {
    fn save(&mut self, entry: DailyLogEntry) -> Result<Option<DailyLogEntry>> {
        Ok(self.entries.insert(entry.date, entry))
    }

    fn get(&self, date: NaiveDate) -> Result<Option<DailyLogEntry>> {
        Ok(self.entries.get(&date).cloned())
    }

    fn list(&self) -> Result<Vec<DailyLogEntry>> {
        Ok(self.entries.values().cloned().collect())
    }

    fn delete(&mut self, date: NaiveDate) -> Result<bool> {
        Ok(self.entries.remove(&date).is_some())
    }
}
