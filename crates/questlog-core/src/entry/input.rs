//! Raw form-style input for building a [`DailyLogEntry`].
//!
//! Numbers arrive as strings. Blank or unparsable numbers count as 0, except
//! sleep where a blank value stays absent. Water can be entered either in
//! ounces or in 8 oz cups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DailyLogEntry;
use crate::error::ValidationError;

/// Ounces in one cup of water.
pub const OZ_PER_CUP: f64 = 8.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryInput {
    pub date: String,
    pub weighted_workout: bool,
    pub cardio: bool,
    pub rest_day: bool,
    pub sick_or_period: bool,
    pub clip_recorded: bool,
    pub new_activity: bool,
    pub injured: bool,
    pub diet_adherence: bool,
    pub showered: bool,
    pub prs_count: String,
    pub read_minutes: String,
    pub stretching_minutes: String,
    pub calories: String,
    pub protein_total: String,
    pub workout_minutes: String,
    pub water_oz: String,
    pub water_cups: String,
    pub sleep_last_night_hours: String,
    pub mile_pace: String,
}

impl LogEntryInput {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Build the stored entry.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidDate`] when the date is not `YYYY-MM-DD`.
    pub fn into_entry(self) -> Result<DailyLogEntry, ValidationError> {
        let date = parse_date(&self.date)?;
        let cups = parse_num(&self.water_cups);
        let water_oz = if self.water_cups.trim().is_empty() {
            parse_num(&self.water_oz)
        } else {
            cups * OZ_PER_CUP
        };
        let sleep = if self.sleep_last_night_hours.trim().is_empty() {
            None
        } else {
            Some(parse_num(&self.sleep_last_night_hours))
        };

        Ok(DailyLogEntry {
            date,
            weighted_workout: self.weighted_workout,
            cardio: self.cardio,
            rest_day: self.rest_day,
            sick_or_period: self.sick_or_period,
            clip_recorded: self.clip_recorded,
            new_activity: self.new_activity,
            injured: self.injured,
            diet_adherence: self.diet_adherence,
            showered: self.showered,
            prs_count: parse_num(&self.prs_count),
            read_minutes: parse_num(&self.read_minutes),
            stretching_minutes: parse_num(&self.stretching_minutes),
            calories: parse_num(&self.calories),
            protein_total: parse_num(&self.protein_total),
            workout_minutes: parse_num(&self.workout_minutes),
            water_oz,
            sleep_last_night_hours: sleep,
            mile_pace: self.mile_pace.trim().to_string(),
        })
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] for anything else.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Lenient number parse: blank, garbage and non-finite all become 0.
fn parse_num(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}
