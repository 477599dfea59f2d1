//! Daily log entries.
//!
//! One [`DailyLogEntry`] exists per calendar date. Saving an entry for a date
//! that already has one replaces it wholesale; there is no field-level merge.

mod input;
mod pace;

pub use input::{parse_date, LogEntryInput, OZ_PER_CUP};
pub use pace::{better_pace, pace_to_seconds};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day's self-reported log.
///
/// Numeric fields default to 0 when absent. `sleep_last_night_hours` stays
/// `None` when nothing was entered so that "no data" can be told apart from
/// "slept 0h".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub weighted_workout: bool,
    #[serde(default)]
    pub cardio: bool,
    #[serde(default)]
    pub rest_day: bool,
    #[serde(default)]
    pub sick_or_period: bool,
    #[serde(default)]
    pub clip_recorded: bool,
    #[serde(default)]
    pub new_activity: bool,
    #[serde(default)]
    pub injured: bool,
    #[serde(default)]
    pub diet_adherence: bool,
    #[serde(default)]
    pub showered: bool,
    #[serde(default)]
    pub prs_count: f64,
    #[serde(default)]
    pub read_minutes: f64,
    #[serde(default)]
    pub stretching_minutes: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_total: f64,
    #[serde(default)]
    pub workout_minutes: f64,
    #[serde(default)]
    pub water_oz: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_last_night_hours: Option<f64>,
    /// Free-form "mm:ss" mile pace.
    #[serde(default)]
    pub mile_pace: String,
}

impl DailyLogEntry {
    /// A blank entry for `date`: every flag off, every number zero.
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            weighted_workout: false,
            cardio: false,
            rest_day: false,
            sick_or_period: false,
            clip_recorded: false,
            new_activity: false,
            injured: false,
            diet_adherence: false,
            showered: false,
            prs_count: 0.0,
            read_minutes: 0.0,
            stretching_minutes: 0.0,
            calories: 0.0,
            protein_total: 0.0,
            workout_minutes: 0.0,
            water_oz: 0.0,
            sleep_last_night_hours: None,
            mile_pace: String::new(),
        }
    }

    /// Trained today and did not mark it as a rest day.
    pub fn is_workout_day(&self) -> bool {
        (self.weighted_workout || self.cardio || self.stretching_minutes > 0.0) && !self.rest_day
    }

    /// Sleep hours for threshold comparisons; absent counts as 0.
    pub fn sleep_hours_or_zero(&self) -> f64 {
        self.sleep_last_night_hours.unwrap_or(0.0)
    }

    /// Pace in seconds, if the pace string parses.
    pub fn pace_seconds(&self) -> Option<u32> {
        pace_to_seconds(&self.mile_pace)
    }
}

/// Sort a snapshot chronologically. Dates are unique so the order is total.
pub fn sorted_by_date(entries: &[DailyLogEntry]) -> Vec<DailyLogEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.date);
    sorted
}
