//! Chronological timeline of logged days and the series derived from it.
//!
//! Every derivation here is a single left-to-right pass over the entries in
//! date order, carrying state from the previous *logged* entry:
//!
//! | Series            | Carried state                   | Calendar gaps matter? |
//! |-------------------|---------------------------------|-----------------------|
//! | hygiene           | unrounded level, last date      | yes (decay per day)   |
//! | workout streak    | previous value                  | no                    |
//! | diet streak       | previous value                  | no                    |
//! | low-sleep streak  | previous value                  | no                    |
//!
//! `workout_day` and the ISO week key are stateless per entry.

mod week;
mod window;

pub use week::IsoWeekKey;
pub use window::{BonusWindow, BONUS_WINDOW_DAYS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::{sorted_by_date, DailyLogEntry};
use crate::storage::RulesConfig;

/// Hygiene level before the first entry and after every shower.
pub const FULL_HYGIENE: f64 = 100.0;

/// Derived values for one logged date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayState {
    pub date: NaiveDate,
    /// Rounded hygiene level, 0..=100.
    pub hygiene: u8,
    pub workout_day: bool,
    pub workout_streak: u32,
    pub diet_streak: u32,
    pub low_sleep_streak: u32,
    pub week: IsoWeekKey,
}

/// Per-date series aligned 1:1 with the date-sorted entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub days: Vec<DayState>,
}

impl DerivedSeries {
    /// Look up the derived state for `date`, if it was logged.
    pub fn get(&self, date: NaiveDate) -> Option<&DayState> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn last(&self) -> Option<&DayState> {
        self.days.last()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Highest workout streak on any date; 0 for an empty history.
    pub fn max_workout_streak(&self) -> u32 {
        self.days.iter().map(|d| d.workout_streak).max().unwrap_or(0)
    }
}

/// State threaded from one logged entry to the next.
#[derive(Debug, Clone, Copy)]
struct Carry {
    hygiene: f64,
    last_date: Option<NaiveDate>,
    workout_streak: u32,
    diet_streak: u32,
    low_sleep_streak: u32,
}

impl Carry {
    fn new() -> Self {
        Self {
            hygiene: FULL_HYGIENE,
            last_date: None,
            workout_streak: 0,
            diet_streak: 0,
            low_sleep_streak: 0,
        }
    }

    fn step(&mut self, entry: &DailyLogEntry, rules: &RulesConfig) -> DayState {
        if let Some(last) = self.last_date {
            let gap = (entry.date - last).num_days();
            if gap > 0 {
                self.hygiene = (self.hygiene - rules.hygiene_decay_per_day * gap as f64).max(0.0);
            }
        }
        if entry.showered {
            self.hygiene = FULL_HYGIENE;
        }
        self.hygiene = self.hygiene.clamp(0.0, FULL_HYGIENE);

        let workout_day = entry.is_workout_day();

        // Rest and sick days neither grow nor break the streak.
        if !(entry.rest_day || entry.sick_or_period) {
            self.workout_streak = if workout_day { self.workout_streak + 1 } else { 0 };
        }

        self.diet_streak = if entry.diet_adherence { self.diet_streak + 1 } else { 0 };

        self.low_sleep_streak = if entry.sleep_hours_or_zero() < rules.min_sleep_hours {
            self.low_sleep_streak + 1
        } else {
            0
        };

        self.last_date = Some(entry.date);

        DayState {
            date: entry.date,
            hygiene: self.hygiene.round() as u8,
            workout_day,
            workout_streak: self.workout_streak,
            diet_streak: self.diet_streak,
            low_sleep_streak: self.low_sleep_streak,
            week: IsoWeekKey::of(entry.date),
        }
    }
}

/// Entries in date order plus everything derived from that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<DailyLogEntry>,
    series: DerivedSeries,
    first_workout_date: Option<NaiveDate>,
}

impl Timeline {
    /// Sort `entries` and run every timeline derivation.
    pub fn build(entries: &[DailyLogEntry], rules: &RulesConfig) -> Self {
        let entries = sorted_by_date(entries);
        let mut carry = Carry::new();
        let days: Vec<DayState> = entries.iter().map(|e| carry.step(e, rules)).collect();
        let first_workout_date = days.iter().find(|d| d.workout_day).map(|d| d.date);

        tracing::debug!(
            entries = entries.len(),
            first_workout = ?first_workout_date,
            "timeline built"
        );

        Self {
            entries,
            series: DerivedSeries { days },
            first_workout_date,
        }
    }

    pub fn entries(&self) -> &[DailyLogEntry] {
        &self.entries
    }

    pub fn series(&self) -> &DerivedSeries {
        &self.series
    }

    pub fn first_workout_date(&self) -> Option<NaiveDate> {
        self.first_workout_date
    }

    pub fn bonus_window(&self) -> Option<BonusWindow> {
        self.first_workout_date.map(BonusWindow::starting)
    }

    /// Most recent logged date. This is "today" for every downstream stage.
    pub fn today(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }

    /// `(entry, derived state)` pairs in date order.
    pub fn days(&self) -> impl Iterator<Item = (&DailyLogEntry, &DayState)> {
        self.entries.iter().zip(self.series.days.iter())
    }

    pub fn into_series(self) -> DerivedSeries {
        self.series
    }
}
