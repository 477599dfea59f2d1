//! Integration tests for the full stat pipeline over stored logs.
//!
//! These tests save entries through a repository, run the engine over the
//! stored snapshot and check the derived stats end to end.

use chrono::{Duration, NaiveDate};
use questlog_core::entry::LogEntryInput;
use questlog_core::storage::{Config, Database, LogRepository, MemoryRepository};
use questlog_core::{run, run_from, Axis, DailyLogEntry, RestOutcome};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_overwrite_replaces_every_field() {
    let mut db = Database::open_memory().unwrap();

    let mut base = LogEntryInput::new("2025-01-01");
    base.protein_total = "30".into();
    base.water_oz = "8".into();
    base.prs_count = "1".into();
    base.read_minutes = "10".into();
    base.stretching_minutes = "5".into();
    base.calories = "400".into();
    base.workout_minutes = "20".into();
    base.cardio = true;
    base.sleep_last_night_hours = "7".into();
    base.mile_pace = "10:00".into();
    db.save(base.into_entry().unwrap()).unwrap();

    let mut incoming = LogEntryInput::new("2025-01-01");
    incoming.protein_total = "25".into();
    incoming.water_oz = "40".into();
    incoming.prs_count = "3".into();
    incoming.read_minutes = "5".into();
    incoming.stretching_minutes = "15".into();
    incoming.calories = "900".into();
    incoming.workout_minutes = "35".into();
    incoming.weighted_workout = true;
    incoming.rest_day = true;
    incoming.sick_or_period = true;
    incoming.clip_recorded = true;
    incoming.new_activity = true;
    incoming.injured = true;
    incoming.diet_adherence = true;
    incoming.showered = true;
    incoming.sleep_last_night_hours = "6".into();
    incoming.mile_pace = "9:30".into();
    let incoming = incoming.into_entry().unwrap();
    db.save(incoming.clone()).unwrap();

    let stored = db.list().unwrap();
    assert_eq!(stored, vec![incoming]);
    assert!(!stored[0].cardio);
    assert_eq!(stored[0].mile_pace, "9:30");

    let report = run_from(&db, &Config::default()).unwrap();
    assert_eq!(report.series.len(), 1);
    // Weighted on a rest day is not a workout day, so there is no bonus window.
    assert_eq!(report.first_workout_date, None);
    assert_eq!(report.dashboard.today.unwrap().hp, 80);
}

#[test]
fn test_weekly_rest_cap_over_stored_logs() {
    let mut db = Database::open_memory().unwrap();
    let monday = date("2025-03-03");
    for i in 0..4 {
        let mut e = DailyLogEntry::blank(monday + Duration::days(i));
        e.rest_day = true;
        e.showered = true;
        e.sleep_last_night_hours = Some(8.0);
        db.save(e).unwrap();
    }

    let report = run_from(&db, &Config::default()).unwrap();
    assert_eq!(report.totals.stats[Axis::Wis], 3.0);
    assert_eq!(report.totals.stats[Axis::Str], -1.0);
    assert_eq!(report.totals.stats[Axis::Agi], -1.0);
    assert_eq!(report.today_score().unwrap().rest, RestOutcome::OverCap);

    let explanation = report.explanation.unwrap();
    assert_eq!(explanation.rest, RestOutcome::OverCap);
    assert_eq!(explanation.rest_cap_agrees, Some(true));
}

#[test]
fn test_config_changes_rest_cap() {
    let mut repo = MemoryRepository::new();
    let monday = date("2025-03-03");
    for i in 0..2 {
        let mut e = DailyLogEntry::blank(monday + Duration::days(i));
        e.rest_day = true;
        repo.save(e).unwrap();
    }
    let mut config = Config::default();
    config.set("rules.wisdom_max_per_week", "1").unwrap();

    let report = run_from(&repo, &config).unwrap();
    assert_eq!(report.totals.stats[Axis::Wis], 1.0);
    assert_eq!(report.totals.stats[Axis::Str], -1.0);
}

#[test]
fn test_bonus_window_spans_seven_calendar_dates() {
    let start = date("2025-01-01");
    let entries: Vec<_> = (0..10)
        .map(|i| {
            let mut e = DailyLogEntry::blank(start + Duration::days(i));
            e.cardio = i == 0;
            e.read_minutes = 10.0;
            e.showered = true;
            e.sleep_last_night_hours = Some(8.0);
            e
        })
        .collect();

    let report = run(&entries, &Config::default());
    let flags: Vec<bool> = report.scores.iter().map(|s| s.in_bonus_window).collect();
    assert_eq!(flags, [vec![true; 7], vec![false; 3]].concat());

    let window = report.bonus_window.unwrap();
    assert_eq!(window.start, start);
    assert_eq!(window.end(), date("2025-01-07"));
    // INT: 7 days doubled + 3 plain.
    assert_eq!(report.totals.stats[Axis::Int], 17.0);
}

#[test]
fn test_repository_order_does_not_change_report() {
    let start = date("2025-06-01");
    let entries: Vec<_> = (0..12)
        .map(|i| {
            let mut e = DailyLogEntry::blank(start + Duration::days(i * 2));
            e.cardio = i % 3 != 0;
            e.rest_day = i % 4 == 0;
            e.clip_recorded = i % 2 == 0;
            e.showered = i % 5 == 0;
            e.sleep_last_night_hours = Some((i % 9) as f64);
            e
        })
        .collect();

    let mut reversed = entries.clone();
    reversed.reverse();
    let repo: MemoryRepository = reversed.iter().cloned().collect();

    let config = Config::default();
    assert_eq!(run(&reversed, &config), run(&entries, &config));
    assert_eq!(run_from(&repo, &config).unwrap(), run(&entries, &config));
}
