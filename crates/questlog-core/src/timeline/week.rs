//! ISO-8601 week keys used to bucket the weekly rest reward cap.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO week identifier, rendered as `YYYY-Www`.
///
/// The year is the ISO week-numbering year (the calendar year of the week's
/// Thursday), so late-December and early-January dates can belong to the
/// neighbouring year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekKey {
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for IsoWeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeekKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, week) = s
            .split_once("-W")
            .ok_or_else(|| format!("invalid ISO week key: {s}"))?;
        let year = year
            .parse()
            .map_err(|_| format!("invalid ISO week year: {s}"))?;
        let week: u32 = week
            .parse()
            .map_err(|_| format!("invalid ISO week number: {s}"))?;
        if !(1..=53).contains(&week) {
            return Err(format!("ISO week out of range: {s}"));
        }
        Ok(Self { year, week })
    }
}

impl From<IsoWeekKey> for String {
    fn from(key: IsoWeekKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for IsoWeekKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Thursday rule written out longhand.
    fn thursday_rule(d: NaiveDate) -> (i32, u32) {
        let iso_day = d.weekday().number_from_monday() as i64;
        let thursday = d + Duration::days(4 - iso_day);
        let jan1 = NaiveDate::from_ymd_opt(thursday.year(), 1, 1).unwrap();
        let days = (thursday - jan1).num_days();
        let week = ((days + 1) as f64 / 7.0).ceil() as u32;
        (thursday.year(), week)
    }

    #[test]
    fn year_boundaries() {
        assert_eq!(IsoWeekKey::of(date("2021-01-03")).to_string(), "2020-W53");
        assert_eq!(IsoWeekKey::of(date("2021-01-04")).to_string(), "2021-W01");
        assert_eq!(IsoWeekKey::of(date("2024-12-30")).to_string(), "2025-W01");
        assert_eq!(IsoWeekKey::of(date("2026-01-01")).to_string(), "2026-W01");
    }

    #[test]
    fn monday_through_sunday_share_a_key() {
        let monday = date("2025-03-03");
        let key = IsoWeekKey::of(monday);
        for offset in 0..7 {
            assert_eq!(IsoWeekKey::of(monday + Duration::days(offset)), key);
        }
        assert_ne!(IsoWeekKey::of(monday + Duration::days(7)), key);
    }

    #[test]
    fn matches_thursday_rule_across_several_years() {
        let mut d = date("2019-12-20");
        while d < date("2027-01-10") {
            let key = IsoWeekKey::of(d);
            assert_eq!((key.year, key.week), thursday_rule(d), "mismatch at {d}");
            d += Duration::days(1);
        }
    }

    #[test]
    fn string_form_round_trips_through_serde() {
        let key = IsoWeekKey { year: 2025, week: 7 };
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-W07\"");
        assert_eq!(serde_json::from_str::<IsoWeekKey>(&json).unwrap(), key);
        assert!("2025-W60".parse::<IsoWeekKey>().is_err());
    }
}
