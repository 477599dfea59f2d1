//! Attribution of the most recent logged day's gains.
//!
//! "Today" is the latest date in the snapshot. Its raw gains and multiplier
//! triggers are re-derived from scratch; the weekly rest cap is checked by
//! counting rest days earlier in the same ISO week rather than by replaying
//! the running ledger, which makes the result an independent check on the
//! scoring pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scoring::{
    self, Multipliers, RestOutcome, BONUS_MULTIPLIER, CRITICAL_MULTIPLIER, FATIGUE_MULTIPLIER,
};
use crate::stat::{Axis, StatVector};
use crate::storage::RulesConfig;
use crate::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Emerald,
    Indigo,
    Rose,
    Amber,
    Slate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    BonusWindow,
    Critical,
    Fatigue,
    BaseGain,
    Penalty,
    RestCapPenalty,
    HygienePenalty,
}

/// A short badge plus its hover text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub tone: Tone,
    pub title: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>, tone: Tone, title: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            tone,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisExplanation {
    pub axis: Axis,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub date: NaiveDate,
    pub raw: StatVector,
    pub multipliers: Multipliers,
    pub rest: RestOutcome,
    /// Rest days logged earlier in today's ISO week.
    pub rest_days_before_today: u32,
    /// Whether the point re-derivation agrees with the scoring pass's
    /// running ledger. `None` when no running outcome was supplied.
    pub rest_cap_agrees: Option<bool>,
    pub global: Vec<Notice>,
    pub by_axis: Vec<AxisExplanation>,
}

impl Explanation {
    pub fn notices_for(&self, axis: Axis) -> &[Notice] {
        self.by_axis
            .iter()
            .find(|a| a.axis == axis)
            .map(|a| a.notices.as_slice())
            .unwrap_or_default()
    }
}

/// Builds the explanation for the latest logged date of a timeline.
pub struct ExplanationBuilder<'a> {
    timeline: &'a Timeline,
    rules: &'a RulesConfig,
    running_rest: Option<RestOutcome>,
}

impl<'a> ExplanationBuilder<'a> {
    pub fn new(timeline: &'a Timeline, rules: &'a RulesConfig) -> Self {
        Self {
            timeline,
            rules,
            running_rest: None,
        }
    }

    /// Supply the scoring pass's rest outcome for today to cross-check.
    pub fn with_running_rest(mut self, outcome: RestOutcome) -> Self {
        self.running_rest = Some(outcome);
        self
    }

    /// `None` for an empty timeline.
    pub fn build(&self) -> Option<Explanation> {
        let (entry, state) = self.timeline.days().last()?;
        let today = entry.date;

        let rests_before = self
            .timeline
            .days()
            .filter(|(e, s)| s.week == state.week && e.date < today && e.rest_day)
            .count() as u32;
        let rest = RestOutcome::settle(entry.rest_day, rests_before, self.rules.wisdom_max_per_week);

        let raw = scoring::raw_gains(entry, state, rest);
        let in_bonus_window = self
            .timeline
            .bonus_window()
            .is_some_and(|w| w.contains(today));
        let critical = scoring::is_critical(&raw);
        let fatigued = scoring::is_fatigued(state);
        let multipliers = Multipliers::detect(in_bonus_window, critical, fatigued);

        let mut global = Vec::new();
        let mut multiplier_badges = Vec::new();
        if in_bonus_window {
            global.push(Notice::new(
                NoticeKind::BonusWindow,
                format!("Beginner's Luck ×{BONUS_MULTIPLIER}"),
                Tone::Emerald,
                "First 7 days after your first workout: all gains doubled.",
            ));
            multiplier_badges.push(Notice::new(
                NoticeKind::BonusWindow,
                format!("×{BONUS_MULTIPLIER} BL"),
                Tone::Emerald,
                "Beginner's Luck doubles gains.",
            ));
        }
        if critical {
            global.push(Notice::new(
                NoticeKind::Critical,
                format!("CRIT ×{CRITICAL_MULTIPLIER}"),
                Tone::Indigo,
                "All core stats gained today: additional 2× multiplier applied.",
            ));
            multiplier_badges.push(Notice::new(
                NoticeKind::Critical,
                format!("×{CRITICAL_MULTIPLIER} CRIT"),
                Tone::Indigo,
                "Critical day: all stats gained, 2×.",
            ));
        }
        if fatigued {
            global.push(Notice::new(
                NoticeKind::Fatigue,
                format!("Fatigue ×{FATIGUE_MULTIPLIER}"),
                Tone::Rose,
                "Slept below your threshold for more than 3 days: gains halved.",
            ));
            multiplier_badges.push(Notice::new(
                NoticeKind::Fatigue,
                format!("×{FATIGUE_MULTIPLIER} Sleep"),
                Tone::Rose,
                "Fatigue halves gains.",
            ));
        }

        let mut by_axis: Vec<AxisExplanation> = Axis::ALL
            .iter()
            .map(|&axis| AxisExplanation {
                axis,
                notices: Vec::new(),
            })
            .collect();

        if rest == RestOutcome::OverCap {
            for axis in [Axis::Str, Axis::Agi] {
                by_axis[axis.slot()].notices.push(Notice::new(
                    NoticeKind::RestCapPenalty,
                    "-1 Rest Penalty",
                    Tone::Amber,
                    format!("Extra rest beyond weekly cap reduces {axis} by 1 today."),
                ));
            }
        }

        let hygiene_penalty = scoring::hygiene_penalty(state.hygiene);
        if hygiene_penalty < 0.0 {
            let title = if state.hygiene == 0 {
                format!("Hygiene at 0%: {hygiene_penalty} CHA today.")
            } else {
                format!("Hygiene below 50%: {hygiene_penalty} CHA today.")
            };
            by_axis[Axis::Cha.slot()].notices.push(Notice::new(
                NoticeKind::HygienePenalty,
                format!("{hygiene_penalty} Hygiene"),
                Tone::Amber,
                title,
            ));
        }

        for explained in &mut by_axis {
            let value = raw[explained.axis];
            let label = explained.axis.source_label();
            if value > 0.0 {
                explained.notices.push(Notice::new(
                    NoticeKind::BaseGain,
                    format!("+{value} {label}"),
                    Tone::Slate,
                    format!("Base gain: {label}"),
                ));
            } else if value < 0.0 {
                explained.notices.push(Notice::new(
                    NoticeKind::Penalty,
                    format!("{value}"),
                    Tone::Amber,
                    "Penalty applied",
                ));
            }
            explained.notices.extend(multiplier_badges.iter().cloned());
        }

        let rest_cap_agrees = self.running_rest.map(|running| running == rest);
        if rest_cap_agrees == Some(false) {
            tracing::warn!(%today, ?rest, running = ?self.running_rest, "rest cap re-derivation disagrees");
        }

        Some(Explanation {
            date: today,
            raw,
            multipliers,
            rest,
            rest_days_before_today: rests_before,
            rest_cap_agrees,
            global,
            by_axis,
        })
    }
}
