//! Weekly balance and today's vitals.
//!
//! The weekly window is the last seven *logged* days, not the last seven
//! calendar days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::better_pace;
use crate::storage::TargetsConfig;
use crate::timeline::Timeline;

pub const WEEKLY_WINDOW_DAYS: usize = 7;

pub const HP_HEALTHY: u8 = 100;
pub const HP_INJURED: u8 = 80;

/// Where a weekly count sits relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Below,
    OnTrack,
    Above,
}

impl TargetStatus {
    pub fn compare(count: u32, target: u32) -> Self {
        match count.cmp(&target) {
            std::cmp::Ordering::Less => TargetStatus::Below,
            std::cmp::Ordering::Equal => TargetStatus::OnTrack,
            std::cmp::Ordering::Greater => TargetStatus::Above,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// Logged days actually in the window (fewer than 7 early on).
    pub days_in_window: usize,
    pub workout_days: u32,
    pub rest_days: u32,
    pub sick_days: u32,
    pub workout_target: u32,
    pub rest_target: u32,
    pub workout_status: TargetStatus,
    pub rest_status: TargetStatus,
    pub overtraining: bool,
}

impl WeeklySummary {
    pub fn from_timeline(timeline: &Timeline, targets: &TargetsConfig) -> Self {
        let skip = timeline.entries().len().saturating_sub(WEEKLY_WINDOW_DAYS);
        let mut summary = Self {
            days_in_window: 0,
            workout_days: 0,
            rest_days: 0,
            sick_days: 0,
            workout_target: targets.workout_days_per_week,
            rest_target: targets.rest_days_per_week,
            workout_status: TargetStatus::OnTrack,
            rest_status: TargetStatus::OnTrack,
            overtraining: false,
        };

        for (entry, state) in timeline.days().skip(skip) {
            summary.days_in_window += 1;
            summary.workout_days += u32::from(state.workout_day);
            summary.rest_days += u32::from(entry.rest_day);
            summary.sick_days += u32::from(entry.sick_or_period);
        }

        summary.workout_status = TargetStatus::compare(summary.workout_days, summary.workout_target);
        summary.rest_status = TargetStatus::compare(summary.rest_days, summary.rest_target);
        summary.overtraining = i64::from(summary.workout_days) > i64::from(summary.workout_target) + 1
            && i64::from(summary.rest_days) < i64::from(summary.rest_target) - 1;
        summary
    }

    pub fn workout_advice(&self) -> &'static str {
        match self.workout_status {
            TargetStatus::OnTrack => "On track ✔",
            TargetStatus::Above => "Ahead (consider recovery)",
            TargetStatus::Below => "You can add a light session if you feel good",
        }
    }

    pub fn rest_advice(&self) -> &'static str {
        match self.rest_status {
            TargetStatus::OnTrack => "On track ✔",
            TargetStatus::Above => "Great recovery focus",
            TargetStatus::Below => "Plan a rest/active recovery day",
        }
    }

    pub fn overtraining_label(&self) -> &'static str {
        if self.overtraining {
            "Caution"
        } else {
            "Balanced ✔"
        }
    }
}

/// Headline numbers for the most recent logged day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayVitals {
    pub date: NaiveDate,
    pub calories: f64,
    pub maintenance_calories: u32,
    pub hp: u8,
    pub injured: bool,
    /// `None` when no sleep value was logged, as opposed to `Some(0.0)`.
    pub sleep_hours: Option<f64>,
    pub protein_g: f64,
    pub protein_target: u32,
    pub workout_minutes: f64,
    pub mile_pace: Option<String>,
    pub diet_streak: u32,
    pub hygiene: u8,
    pub water_oz: f64,
    pub water_target_oz: u32,
}

impl TodayVitals {
    pub fn sleep_label(&self) -> String {
        match self.sleep_hours {
            Some(h) => format!("{h} h"),
            None => "no data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub weekly: WeeklySummary,
    pub today: Option<TodayVitals>,
    /// Fastest parseable mile pace across the whole history.
    pub best_mile_pace: Option<String>,
    pub beginners_luck_started: Option<NaiveDate>,
}

impl Dashboard {
    pub fn build(timeline: &Timeline, targets: &TargetsConfig) -> Self {
        let today = timeline.days().last().map(|(entry, state)| TodayVitals {
            date: entry.date,
            calories: entry.calories,
            maintenance_calories: targets.maintenance_calories,
            hp: if entry.injured { HP_INJURED } else { HP_HEALTHY },
            injured: entry.injured,
            sleep_hours: entry.sleep_last_night_hours,
            protein_g: entry.protein_total,
            protein_target: targets.protein_target,
            workout_minutes: entry.workout_minutes,
            mile_pace: Some(entry.mile_pace.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            diet_streak: state.diet_streak,
            hygiene: state.hygiene,
            water_oz: entry.water_oz,
            water_target_oz: targets.water_target_oz,
        });

        let best_mile_pace = timeline
            .entries()
            .iter()
            .map(|e| e.mile_pace.as_str())
            .fold("", better_pace)
            .to_string();

        Self {
            weekly: WeeklySummary::from_timeline(timeline, targets),
            today,
            best_mile_pace: Some(best_mile_pace).filter(|p| !p.is_empty()),
            beginners_luck_started: timeline.first_workout_date(),
        }
    }
}
