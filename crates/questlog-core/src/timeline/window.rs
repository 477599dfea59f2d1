//! The Beginner's Luck bonus window.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of calendar days the bonus window spans.
pub const BONUS_WINDOW_DAYS: i64 = 7;

/// Seven consecutive calendar dates starting at the first workout day,
/// inclusive. Calendar-based: dates without entries still count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusWindow {
    pub start: NaiveDate,
}

impl BonusWindow {
    pub fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Last date inside the window.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(BONUS_WINDOW_DAYS - 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(BONUS_WINDOW_DAYS as usize)
    }
}
