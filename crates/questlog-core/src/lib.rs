//! # Questlog Core Library
//!
//! Turns a history of self-reported daily wellness logs into RPG character
//! stats. All logic lives here; the `questlog` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! The pipeline runs leaves first over an unordered snapshot of entries:
//!
//! - **Timeline**: date order, hygiene level, streaks, ISO week keys and the
//!   first workout date
//! - **Scoring**: per-day raw gains, the multiplier stack and the weekly
//!   rest cap
//! - **Aggregate**: lifetime totals and the longest workout streak
//! - **Unlocks**: hidden trait predicates over the totals
//! - **Explain**: attribution of the most recent day's gains
//! - **Storage**: SQLite log storage, TOML configuration and JSON backups
//!
//! "Today" is always the latest logged date, never the wall clock.
//!
//! ## Key Components
//!
//! - [`engine::run`]: the whole pipeline in one call
//! - [`Timeline`]: chronological derivations
//! - [`ScoringEngine`]: the single scoring fold
//! - [`Database`]: entry persistence
//! - [`Config`]: rule and target configuration

pub mod aggregate;
pub mod dashboard;
pub mod engine;
pub mod entry;
pub mod error;
pub mod explain;
pub mod scoring;
pub mod stat;
pub mod storage;
pub mod timeline;
pub mod unlocks;

pub use aggregate::{aggregate, Totals};
pub use dashboard::{Dashboard, TodayVitals, WeeklySummary};
pub use engine::{run, run_from, EngineReport};
pub use entry::{DailyLogEntry, LogEntryInput};
pub use error::{BackupError, ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use explain::{Explanation, ExplanationBuilder, Notice, Tone};
pub use scoring::{DayScore, Multipliers, RestOutcome, ScoringEngine};
pub use stat::{Axis, StatVector};
pub use storage::{Config, Database, LogRepository, MemoryRepository};
pub use timeline::{DayState, DerivedSeries, IsoWeekKey, Timeline};
pub use unlocks::HiddenTraitSet;
