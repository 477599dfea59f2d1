//! Hidden trait unlocks.
//!
//! Leaf predicates read the cumulative totals and streak maximum directly.
//! Composite predicates are evaluated afterwards from the leaf results, so
//! each predicate is computed exactly once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::Totals;
use crate::scoring::FATIGUE_STREAK_THRESHOLD;
use crate::stat::{Axis, StatVector};

/// Everything the unlock predicates read.
#[derive(Debug, Clone, Copy)]
pub struct UnlockInputs<'a> {
    pub totals: &'a StatVector,
    pub max_streak: u32,
    pub first_workout_date: Option<NaiveDate>,
    /// Low-sleep streak on the most recent logged date (0 for no history).
    pub latest_low_sleep_streak: u32,
}

impl<'a> UnlockInputs<'a> {
    pub fn from_totals(
        totals: &'a Totals,
        first_workout_date: Option<NaiveDate>,
        latest_low_sleep_streak: u32,
    ) -> Self {
        Self {
            totals: &totals.stats,
            max_streak: totals.max_streak,
            first_workout_date,
            latest_low_sleep_streak,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenTraitSet {
    pub authority: bool,
    pub awareness: bool,
    pub willpower: bool,
    pub faith: bool,
    pub karma: bool,
    pub discipline: bool,
    pub adaptability: bool,
    pub focus: bool,
    pub soul: bool,
    pub dominion: bool,
    pub transcendence: bool,
    /// Permanent once any workout day exists, unlike the 7-day bonus window.
    pub beginners_luck_unlocked: bool,
    pub fatigue_active: bool,
}

impl HiddenTraitSet {
    /// `(display name, unlocked)` pairs in a fixed order.
    pub fn entries(&self) -> [(&'static str, bool); 13] {
        [
            ("Authority", self.authority),
            ("Awareness", self.awareness),
            ("Willpower", self.willpower),
            ("Faith", self.faith),
            ("Karma", self.karma),
            ("Discipline", self.discipline),
            ("Adaptability", self.adaptability),
            ("Focus", self.focus),
            ("Soul", self.soul),
            ("Dominion", self.dominion),
            ("Transcendence", self.transcendence),
            ("Beginner's Luck", self.beginners_luck_unlocked),
            ("Fatigue", self.fatigue_active),
        ]
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries().iter().filter(|(_, on)| *on).count()
    }
}

/// Karma: every total positive and the spread between largest and smallest
/// at most 2×. The ratio is only taken once the minimum is known positive.
pub fn karma(totals: &StatVector) -> bool {
    let min = totals.min();
    if min <= 0.0 {
        return false;
    }
    totals.max() / min <= 2.0
}

pub fn evaluate(inputs: &UnlockInputs<'_>) -> HiddenTraitSet {
    let t = inputs.totals;
    let streak = inputs.max_streak;

    // Leaves.
    let authority = t[Axis::Str] >= 50.0 && t[Axis::Cha] >= 30.0;
    let awareness = t[Axis::Int] >= 25.0 && t[Axis::Wis] >= 20.0;
    let willpower = streak >= 30 && t[Axis::Vit] >= 20.0;
    let faith = t[Axis::Cha] >= 20.0 && t[Axis::Wis] >= 25.0;
    let karma = karma(t);
    let discipline = streak >= 60;
    let adaptability = t[Axis::Luk] >= 10.0;
    let focus = t[Axis::Int] >= 30.0 && t[Axis::Dex] >= 20.0;

    // Composites, in dependency order.
    let soul = awareness && discipline;
    let dominion = authority && willpower && soul;
    let transcendence = authority
        && awareness
        && willpower
        && faith
        && karma
        && discipline
        && adaptability
        && focus
        && soul
        && dominion;

    HiddenTraitSet {
        authority,
        awareness,
        willpower,
        faith,
        karma,
        discipline,
        adaptability,
        focus,
        soul,
        dominion,
        transcendence,
        beginners_luck_unlocked: inputs.first_workout_date.is_some(),
        fatigue_active: inputs.latest_low_sleep_streak > FATIGUE_STREAK_THRESHOLD,
    }
}
