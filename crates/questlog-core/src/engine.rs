//! End-to-end pipeline over a snapshot of log entries.
//!
//! Every stage is a pure function of the snapshot and config, so the whole
//! pipeline is re-run from scratch whenever an entry changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, Totals};
use crate::dashboard::Dashboard;
use crate::entry::DailyLogEntry;
use crate::explain::{Explanation, ExplanationBuilder};
use crate::scoring::{DayScore, ScoringEngine};
use crate::storage::{Config, LogRepository};
use crate::timeline::{BonusWindow, DerivedSeries, Timeline};
use crate::unlocks::{self, HiddenTraitSet, UnlockInputs};

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineReport {
    /// Most recent logged date; `None` for an empty history.
    pub today: Option<NaiveDate>,
    pub first_workout_date: Option<NaiveDate>,
    pub bonus_window: Option<BonusWindow>,
    pub series: DerivedSeries,
    pub scores: Vec<DayScore>,
    pub totals: Totals,
    pub traits: HiddenTraitSet,
    pub explanation: Option<Explanation>,
    pub dashboard: Dashboard,
}

impl EngineReport {
    pub fn today_score(&self) -> Option<&DayScore> {
        self.scores.last()
    }
}

/// Run every stage over `entries` in dependency order.
pub fn run(entries: &[DailyLogEntry], config: &Config) -> EngineReport {
    let timeline = Timeline::build(entries, &config.rules);
    let scores = ScoringEngine::new(&config.rules, timeline.bonus_window()).score(&timeline);
    let totals = aggregate(&scores, timeline.series());

    let latest_low_sleep = timeline
        .series()
        .last()
        .map(|d| d.low_sleep_streak)
        .unwrap_or(0);
    let traits = unlocks::evaluate(&UnlockInputs::from_totals(
        &totals,
        timeline.first_workout_date(),
        latest_low_sleep,
    ));

    let mut builder = ExplanationBuilder::new(&timeline, &config.rules);
    if let Some(last) = scores.last() {
        builder = builder.with_running_rest(last.rest);
    }
    let explanation = builder.build();
    let dashboard = Dashboard::build(&timeline, &config.targets);

    tracing::debug!(
        days = scores.len(),
        unlocked = traits.unlocked_count(),
        "engine run complete"
    );

    EngineReport {
        today: timeline.today(),
        first_workout_date: timeline.first_workout_date(),
        bonus_window: timeline.bonus_window(),
        scores,
        totals,
        traits,
        explanation,
        dashboard,
        series: timeline.into_series(),
    }
}

/// Snapshot `repo` and run the pipeline over it.
///
/// # Errors
/// Returns an error if the repository cannot be read.
pub fn run_from<R: LogRepository + ?Sized>(repo: &R, config: &Config) -> crate::Result<EngineReport> {
    let entries = repo.snapshot()?;
    Ok(run(&entries, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::Axis;
    use crate::storage::MemoryRepository;
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(offset: i64) -> DailyLogEntry {
        DailyLogEntry::blank(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(offset))
    }

    #[test]
    fn empty_history_yields_empty_report() {
        let report = run(&[], &Config::default());
        assert_eq!(report.today, None);
        assert!(report.scores.is_empty());
        assert_eq!(report.totals, Totals::default());
        assert_eq!(report.traits, HiddenTraitSet::default());
        assert!(report.explanation.is_none());
        assert!(report.dashboard.today.is_none());
    }

    #[test]
    fn three_cardio_days_then_idle() {
        let entries: Vec<_> = (0..4)
            .map(|i| {
                let mut e = day(i);
                e.cardio = i < 3;
                e.showered = true;
                e.sleep_last_night_hours = Some(8.0);
                e
            })
            .collect();

        let report = run(&entries, &Config::default());
        assert_eq!(report.today, Some(day(3).date));
        assert_eq!(report.first_workout_date, Some(day(0).date));
        // Bonus window covers every day: AGI 3×2, END (1+2+3)×2.
        assert_eq!(report.totals.stats[Axis::Agi], 6.0);
        assert_eq!(report.totals.stats[Axis::End], 12.0);
        assert_eq!(report.totals.max_streak, 3);
        assert!(report.traits.beginners_luck_unlocked);
        assert!(!report.traits.karma);

        let explanation = report.explanation.unwrap();
        assert_eq!(explanation.date, day(3).date);
        assert_eq!(explanation.rest_cap_agrees, Some(true));
    }

    #[test]
    fn explanation_matches_todays_score() {
        let entries: Vec<_> = (0..5)
            .map(|i| {
                let mut e = day(i);
                e.rest_day = true;
                e.read_minutes = 20.0;
                e
            })
            .collect();
        let report = run(&entries, &Config::default());
        let score = report.today_score().unwrap();
        let explanation = report.explanation.as_ref().unwrap();
        assert_eq!(explanation.raw, score.raw);
        assert_eq!(explanation.multipliers, score.multipliers);
        assert_eq!(explanation.rest, score.rest);
        assert_eq!(explanation.rest_cap_agrees, Some(true));
    }

    #[test]
    fn run_from_repository_snapshot() {
        let mut repo = MemoryRepository::new();
        let mut e = day(2);
        e.weighted_workout = true;
        repo.save(e).unwrap();
        repo.save(day(0)).unwrap();

        let report = run_from(&repo, &Config::default()).unwrap();
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.first_workout_date, Some(day(2).date));
    }

    proptest! {
        #[test]
        fn running_twice_is_identical(
            flags in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), 0.0f64..10.0),
                0..30,
            ),
        ) {
            let entries: Vec<_> = flags
                .into_iter()
                .enumerate()
                .map(|(i, (cardio, rest, shower, clip, sleep))| {
                    let mut e = day(i as i64);
                    e.cardio = cardio;
                    e.rest_day = rest;
                    e.showered = shower;
                    e.clip_recorded = clip;
                    e.sleep_last_night_hours = Some(sleep);
                    e
                })
                .collect();
            let config = Config::default();
            prop_assert_eq!(run(&entries, &config), run(&entries, &config));
        }

        #[test]
        fn explanation_always_agrees_with_running_ledger(
            rests in proptest::collection::vec(any::<bool>(), 1..40),
            cap in 0u32..5,
        ) {
            let entries: Vec<_> = rests
                .into_iter()
                .enumerate()
                .map(|(i, rest)| {
                    let mut e = day(i as i64);
                    e.rest_day = rest;
                    e
                })
                .collect();
            let mut config = Config::default();
            config.rules.wisdom_max_per_week = cap;
            let report = run(&entries, &config);
            prop_assert_eq!(report.explanation.unwrap().rest_cap_agrees, Some(true));
        }
    }
}
