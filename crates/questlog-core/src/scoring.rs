//! Per-day stat gains and the multiplier stack.
//!
//! Each logged day produces a raw gain vector from that day's entry and its
//! derived timeline state. Three independent multipliers are then combined by
//! multiplication and applied to every axis of the raw vector, penalties
//! included:
//!
//! | Multiplier     | Trigger                                   | Factor |
//! |----------------|-------------------------------------------|--------|
//! | Beginner's Luck| date inside the bonus window              | ×2     |
//! | Critical       | all nine raw axes strictly positive       | ×2     |
//! | Fatigue        | low-sleep streak above 3                  | ×0.5   |
//!
//! The only state carried between days is the weekly rest ledger, threaded
//! through a single chronological fold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entry::DailyLogEntry;
use crate::stat::{Axis, StatVector};
use crate::storage::RulesConfig;
use crate::timeline::{BonusWindow, DayState, IsoWeekKey, Timeline};

/// Low-sleep streak above this triggers fatigue.
pub const FATIGUE_STREAK_THRESHOLD: u32 = 3;

/// Hygiene strictly below this costs 1 CHA.
pub const LOW_HYGIENE_THRESHOLD: u8 = 50;

pub const BONUS_MULTIPLIER: f64 = 2.0;
pub const CRITICAL_MULTIPLIER: f64 = 2.0;
pub const FATIGUE_MULTIPLIER: f64 = 0.5;

/// How a day's rest flag was settled against the weekly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestOutcome {
    NotRestDay,
    /// Under the weekly cap: +1 WIS.
    Rewarded,
    /// Cap already reached this ISO week: −1 STR and −1 AGI.
    OverCap,
}

impl RestOutcome {
    /// Settle a rest day given how many rest rewards its week already used.
    pub fn settle(rest_day: bool, used_this_week: u32, weekly_cap: u32) -> Self {
        if !rest_day {
            RestOutcome::NotRestDay
        } else if used_this_week < weekly_cap {
            RestOutcome::Rewarded
        } else {
            RestOutcome::OverCap
        }
    }
}

/// The three multiplier factors for a day. Each is 1 unless triggered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub bonus: f64,
    pub critical: f64,
    pub fatigue: f64,
}

impl Multipliers {
    pub fn detect(in_bonus_window: bool, critical: bool, fatigued: bool) -> Self {
        Self {
            bonus: if in_bonus_window { BONUS_MULTIPLIER } else { 1.0 },
            critical: if critical { CRITICAL_MULTIPLIER } else { 1.0 },
            fatigue: if fatigued { FATIGUE_MULTIPLIER } else { 1.0 },
        }
    }

    pub fn combined(&self) -> f64 {
        self.bonus * self.critical * self.fatigue
    }
}

/// Everything the scoring pass decided about one logged day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    pub date: NaiveDate,
    pub week: IsoWeekKey,
    pub raw: StatVector,
    pub scaled: StatVector,
    pub rest: RestOutcome,
    pub in_bonus_window: bool,
    pub critical: bool,
    pub fatigued: bool,
    pub multipliers: Multipliers,
}

/// Raw (unscaled) gains for one day.
///
/// `rest` must already be settled against the weekly cap; the caller decides
/// how that count is obtained.
pub fn raw_gains(entry: &DailyLogEntry, state: &DayState, rest: RestOutcome) -> StatVector {
    let mut g = StatVector::zero();

    if entry.weighted_workout {
        g[Axis::Str] += 1.0;
    }
    if entry.cardio {
        g[Axis::Agi] += 1.0;
    }
    g[Axis::Vit] += contribution(entry.date, Axis::Vit, entry.prs_count);
    if entry.read_minutes > 0.0 {
        g[Axis::Int] += 1.0;
    }

    match rest {
        RestOutcome::NotRestDay => {}
        RestOutcome::Rewarded => g[Axis::Wis] += 1.0,
        RestOutcome::OverCap => {
            g[Axis::Str] -= 1.0;
            g[Axis::Agi] -= 1.0;
        }
    }

    g[Axis::End] += f64::from(state.workout_streak);
    g[Axis::Dex] += contribution(
        entry.date,
        Axis::Dex,
        (entry.stretching_minutes / 10.0).floor(),
    );

    if entry.clip_recorded {
        g[Axis::Cha] += 1.0;
    }
    g[Axis::Cha] += hygiene_penalty(state.hygiene);

    if entry.new_activity {
        g[Axis::Luk] += 1.0;
    }

    g
}

/// CHA adjustment for a hygiene level: −3 at exactly 0, −1 below 50.
pub fn hygiene_penalty(hygiene: u8) -> f64 {
    if hygiene == 0 {
        -3.0
    } else if hygiene < LOW_HYGIENE_THRESHOLD {
        -1.0
    } else {
        0.0
    }
}

/// A day is critical when every raw axis is strictly positive.
pub fn is_critical(raw: &StatVector) -> bool {
    raw.all_positive()
}

pub fn is_fatigued(state: &DayState) -> bool {
    state.low_sleep_streak > FATIGUE_STREAK_THRESHOLD
}

fn contribution(date: NaiveDate, axis: Axis, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(%date, %axis, "dropping non-finite contribution");
        0.0
    }
}

/// Rest rewards already granted per ISO week.
#[derive(Debug, Clone, Default)]
struct RestLedger {
    granted: HashMap<IsoWeekKey, u32>,
}

impl RestLedger {
    fn settle(&mut self, week: IsoWeekKey, rest_day: bool, cap: u32) -> RestOutcome {
        let used = self.granted.get(&week).copied().unwrap_or(0);
        let outcome = RestOutcome::settle(rest_day, used, cap);
        if outcome == RestOutcome::Rewarded {
            self.granted.insert(week, used + 1);
        }
        outcome
    }
}

/// Walks a [`Timeline`] once and scores every day.
#[derive(Debug, Clone)]
pub struct ScoringEngine<'a> {
    rules: &'a RulesConfig,
    bonus_window: Option<BonusWindow>,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(rules: &'a RulesConfig, bonus_window: Option<BonusWindow>) -> Self {
        Self {
            rules,
            bonus_window,
        }
    }

    pub fn in_bonus_window(&self, date: NaiveDate) -> bool {
        self.bonus_window.is_some_and(|w| w.contains(date))
    }

    /// Score one day given its already-settled rest outcome.
    pub fn score_day(&self, entry: &DailyLogEntry, state: &DayState, rest: RestOutcome) -> DayScore {
        let raw = raw_gains(entry, state, rest);
        let critical = is_critical(&raw);
        let in_bonus_window = self.in_bonus_window(entry.date);
        let fatigued = is_fatigued(state);
        let multipliers = Multipliers::detect(in_bonus_window, critical, fatigued);

        DayScore {
            date: entry.date,
            week: state.week,
            raw,
            scaled: raw.scaled(multipliers.combined()),
            rest,
            in_bonus_window,
            critical,
            fatigued,
            multipliers,
        }
    }

    /// Score every day of `timeline` in date order.
    pub fn score(&self, timeline: &Timeline) -> Vec<DayScore> {
        let cap = self.rules.wisdom_max_per_week;
        let (_, scores) = timeline.days().fold(
            (RestLedger::default(), Vec::with_capacity(timeline.entries().len())),
            |(mut ledger, mut scores), (entry, state)| {
                let rest = ledger.settle(state.week, entry.rest_day, cap);
                scores.push(self.score_day(entry, state, rest));
                (ledger, scores)
            },
        );

        tracing::debug!(
            days = scores.len(),
            critical = scores.iter().filter(|s| s.critical).count(),
            "scoring pass complete"
        );
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state_for(entry: &DailyLogEntry) -> DayState {
        DayState {
            date: entry.date,
            hygiene: 100,
            workout_day: entry.is_workout_day(),
            workout_streak: 0,
            diet_streak: 0,
            low_sleep_streak: 0,
            week: IsoWeekKey::of(entry.date),
        }
    }

    fn score(entries: &[DailyLogEntry], rules: &RulesConfig) -> Vec<DayScore> {
        let timeline = Timeline::build(entries, rules);
        ScoringEngine::new(rules, timeline.bonus_window()).score(&timeline)
    }

    /// An entry that fills every axis: weighted + cardio + PR + reading +
    /// stretching + clip + new activity, and a rest flag for WIS.
    fn full_day(d: NaiveDate) -> DailyLogEntry {
        let mut e = DailyLogEntry::blank(d);
        e.weighted_workout = true;
        e.cardio = true;
        e.prs_count = 2.0;
        e.read_minutes = 15.0;
        e.rest_day = true;
        e.stretching_minutes = 25.0;
        e.clip_recorded = true;
        e.new_activity = true;
        e.showered = true;
        e.sleep_last_night_hours = Some(8.0);
        e
    }

    #[test]
    fn raw_gains_per_axis() {
        let mut e = DailyLogEntry::blank(date("2025-01-01"));
        e.weighted_workout = true;
        e.prs_count = 3.0;
        e.read_minutes = 1.0;
        e.stretching_minutes = 29.0;
        e.new_activity = true;
        let mut state = state_for(&e);
        state.workout_streak = 4;

        let g = raw_gains(&e, &state, RestOutcome::NotRestDay);
        assert_eq!(g[Axis::Str], 1.0);
        assert_eq!(g[Axis::Agi], 0.0);
        assert_eq!(g[Axis::Vit], 3.0);
        assert_eq!(g[Axis::Int], 1.0);
        assert_eq!(g[Axis::Wis], 0.0);
        assert_eq!(g[Axis::End], 4.0);
        assert_eq!(g[Axis::Dex], 2.0);
        assert_eq!(g[Axis::Cha], 0.0);
        assert_eq!(g[Axis::Luk], 1.0);
    }

    #[test]
    fn rest_outcomes_move_wis_or_penalise() {
        let e = DailyLogEntry::blank(date("2025-01-01"));
        let state = state_for(&e);
        let rewarded = raw_gains(&e, &state, RestOutcome::Rewarded);
        assert_eq!(rewarded[Axis::Wis], 1.0);

        let over = raw_gains(&e, &state, RestOutcome::OverCap);
        assert_eq!(over[Axis::Wis], 0.0);
        assert_eq!(over[Axis::Str], -1.0);
        assert_eq!(over[Axis::Agi], -1.0);
    }

    #[test]
    fn hygiene_penalty_tiers() {
        assert_eq!(hygiene_penalty(0), -3.0);
        assert_eq!(hygiene_penalty(1), -1.0);
        assert_eq!(hygiene_penalty(49), -1.0);
        assert_eq!(hygiene_penalty(50), 0.0);
        assert_eq!(hygiene_penalty(100), 0.0);
    }

    #[test]
    fn clip_and_hygiene_penalty_combine() {
        let mut e = DailyLogEntry::blank(date("2025-01-01"));
        e.clip_recorded = true;
        let mut state = state_for(&e);
        state.hygiene = 0;
        assert_eq!(raw_gains(&e, &state, RestOutcome::NotRestDay)[Axis::Cha], -2.0);
        state.hygiene = 40;
        assert_eq!(raw_gains(&e, &state, RestOutcome::NotRestDay)[Axis::Cha], 0.0);
    }

    #[test]
    fn non_finite_inputs_are_no_ops() {
        let mut e = DailyLogEntry::blank(date("2025-01-01"));
        e.prs_count = f64::NAN;
        e.stretching_minutes = f64::INFINITY;
        let state = state_for(&e);
        let g = raw_gains(&e, &state, RestOutcome::NotRestDay);
        assert_eq!(g[Axis::Vit], 0.0);
        assert_eq!(g[Axis::Dex], 0.0);
    }

    #[test]
    fn weekly_rest_cap_penalises_fourth_rest_day() {
        // Mon..Thu of one ISO week, all rest days, no workouts ever.
        let monday = date("2025-03-03");
        let entries: Vec<_> = (0..4)
            .map(|i| {
                let mut e = DailyLogEntry::blank(monday + Duration::days(i));
                e.rest_day = true;
                e.showered = true;
                e.sleep_last_night_hours = Some(8.0);
                e
            })
            .collect();

        let scores = score(&entries, &RulesConfig::default());
        let outcomes: Vec<_> = scores.iter().map(|s| s.rest).collect();
        assert_eq!(
            outcomes,
            vec![
                RestOutcome::Rewarded,
                RestOutcome::Rewarded,
                RestOutcome::Rewarded,
                RestOutcome::OverCap
            ]
        );
        assert_eq!(scores[3].scaled[Axis::Str], -1.0);
        assert_eq!(scores[3].scaled[Axis::Agi], -1.0);
        assert_eq!(scores[3].scaled[Axis::Wis], 0.0);
    }

    #[test]
    fn cap_resets_with_new_iso_week() {
        let sunday = date("2025-03-09");
        let entries: Vec<_> = (0..2)
            .map(|i| {
                let mut e = DailyLogEntry::blank(sunday + Duration::days(i));
                e.rest_day = true;
                e
            })
            .collect();
        let rules = RulesConfig {
            wisdom_max_per_week: 1,
            ..RulesConfig::default()
        };
        let scores = score(&entries, &rules);
        assert_eq!(scores[0].rest, RestOutcome::Rewarded);
        assert_eq!(scores[1].rest, RestOutcome::Rewarded);
    }

    #[test]
    fn over_cap_penalty_is_doubled_inside_bonus_window() {
        let monday = date("2025-03-03");
        let mut first = DailyLogEntry::blank(monday);
        first.cardio = true;
        first.sleep_last_night_hours = Some(8.0);
        let mut rest = DailyLogEntry::blank(monday + Duration::days(1));
        rest.rest_day = true;
        rest.sleep_last_night_hours = Some(8.0);

        let rules = RulesConfig {
            wisdom_max_per_week: 0,
            ..RulesConfig::default()
        };
        let scores = score(&[first, rest], &rules);
        assert!(scores[1].in_bonus_window);
        assert_eq!(scores[1].rest, RestOutcome::OverCap);
        assert_eq!(scores[1].multipliers.combined(), 2.0);
        assert_eq!(scores[1].scaled[Axis::Str], -2.0);
        assert_eq!(scores[1].scaled[Axis::Agi], -2.0);
        // The carried streak still pays END, doubled.
        assert_eq!(scores[1].scaled[Axis::End], 2.0);
    }

    #[test]
    fn critical_day_requires_all_nine_axes() {
        let d = date("2025-05-01");
        let mut e = full_day(d);
        let mut state = state_for(&e);
        state.workout_streak = 1;

        let raw = raw_gains(&e, &state, RestOutcome::Rewarded);
        assert!(is_critical(&raw));

        // Over the cap, STR/AGI net to zero and the day is no longer critical.
        let raw = raw_gains(&e, &state, RestOutcome::OverCap);
        assert_eq!(raw[Axis::Str], 0.0);
        assert!(!is_critical(&raw));

        e.new_activity = false;
        let raw = raw_gains(&e, &state, RestOutcome::Rewarded);
        assert!(!is_critical(&raw));
    }

    #[test]
    fn multipliers_stack_by_multiplication() {
        assert_eq!(Multipliers::detect(false, false, false).combined(), 1.0);
        assert_eq!(Multipliers::detect(true, false, false).combined(), 2.0);
        assert_eq!(Multipliers::detect(true, true, false).combined(), 4.0);
        assert_eq!(Multipliers::detect(true, true, true).combined(), 2.0);
        assert_eq!(Multipliers::detect(false, false, true).combined(), 0.5);
    }

    #[test]
    fn fatigue_starts_on_fourth_short_night() {
        let start = date("2025-06-01");
        let entries: Vec<_> = (0..5)
            .map(|i| {
                let mut e = DailyLogEntry::blank(start + Duration::days(i));
                e.read_minutes = 10.0;
                e.sleep_last_night_hours = Some(4.0);
                e.showered = true;
                e
            })
            .collect();
        let scores = score(&entries, &RulesConfig::default());
        let fatigued: Vec<_> = scores.iter().map(|s| s.fatigued).collect();
        assert_eq!(fatigued, vec![false, false, false, true, true]);
        assert_eq!(scores[3].scaled[Axis::Int], 0.5);
    }

    #[test]
    fn bonus_window_is_calendar_based() {
        let start = date("2025-01-01");
        let mut first = DailyLogEntry::blank(start);
        first.cardio = true;
        first.sleep_last_night_hours = Some(8.0);
        let mut inside = DailyLogEntry::blank(start + Duration::days(6));
        inside.read_minutes = 5.0;
        inside.showered = true;
        inside.sleep_last_night_hours = Some(8.0);
        let mut outside = DailyLogEntry::blank(start + Duration::days(7));
        outside.read_minutes = 5.0;
        outside.showered = true;
        outside.sleep_last_night_hours = Some(8.0);

        let scores = score(&[first, inside, outside], &RulesConfig::default());
        assert!(scores[0].in_bonus_window);
        assert!(scores[1].in_bonus_window);
        assert!(!scores[2].in_bonus_window);
        assert_eq!(scores[1].scaled[Axis::Int], 2.0);
        assert_eq!(scores[2].scaled[Axis::Int], 1.0);
    }

    proptest! {
        #[test]
        fn zeroing_any_axis_clears_critical(values in proptest::array::uniform9(0.1f64..50.0), idx in 0usize..9, bad in -5.0f64..=0.0) {
            let mut v = StatVector::zero();
            for (axis, x) in Axis::ALL.iter().zip(values) {
                v[*axis] = x;
            }
            prop_assert!(is_critical(&v));
            v[Axis::ALL[idx]] = bad;
            prop_assert!(!is_critical(&v));
        }

        #[test]
        fn scaled_is_raw_times_combined_multiplier(
            cardio in any::<bool>(),
            rest in any::<bool>(),
            reading in 0.0f64..30.0,
            sleep in 0.0f64..10.0,
            days in 1i64..20,
        ) {
            let start = date("2025-01-01");
            let entries: Vec<_> = (0..days).map(|i| {
                let mut e = DailyLogEntry::blank(start + Duration::days(i));
                e.cardio = cardio;
                e.rest_day = rest;
                e.read_minutes = reading;
                e.sleep_last_night_hours = Some(sleep);
                e
            }).collect();
            for s in score(&entries, &RulesConfig::default()) {
                let factor = s.multipliers.combined();
                for (axis, raw) in s.raw.iter() {
                    prop_assert_eq!(s.scaled[axis], raw * factor);
                }
            }
        }
    }
}
