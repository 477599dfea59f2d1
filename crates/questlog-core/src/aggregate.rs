//! Lifetime totals across every scored day.

use serde::{Deserialize, Serialize};

use crate::scoring::DayScore;
use crate::stat::StatVector;
use crate::timeline::DerivedSeries;

/// Cumulative stat totals plus the longest workout streak ever reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub stats: StatVector,
    pub max_streak: u32,
}

/// Sum scaled day vectors in the order given (chronological).
///
/// Non-finite per-axis values, and gains that would overflow the running
/// total, are skipped rather than poisoning the total.
pub fn aggregate(scores: &[DayScore], series: &DerivedSeries) -> Totals {
    let stats = scores.iter().fold(StatVector::zero(), |mut total, day| {
        for axis in total.accumulate(&day.scaled) {
            tracing::warn!(date = %day.date, %axis, "non-finite scaled gain skipped");
        }
        total
    });

    Totals {
        stats,
        max_streak: series.max_workout_streak(),
    }
}
