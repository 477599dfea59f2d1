//! The nine stat axes and the fixed-shape vector that carries them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the nine core stat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Axis {
    Str,
    Agi,
    Vit,
    Int,
    Wis,
    End,
    Dex,
    Cha,
    Luk,
}

impl Axis {
    /// All axes in display order.
    pub const ALL: [Axis; 9] = [
        Axis::Str,
        Axis::Agi,
        Axis::Vit,
        Axis::Int,
        Axis::Wis,
        Axis::End,
        Axis::Dex,
        Axis::Cha,
        Axis::Luk,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Axis::Str => "STR",
            Axis::Agi => "AGI",
            Axis::Vit => "VIT",
            Axis::Int => "INT",
            Axis::Wis => "WIS",
            Axis::End => "END",
            Axis::Dex => "DEX",
            Axis::Cha => "CHA",
            Axis::Luk => "LUK",
        }
    }

    /// What feeds this axis, as shown next to its total.
    pub fn source_label(self) -> &'static str {
        match self {
            Axis::Str => "Weighted",
            Axis::Agi => "Cardio",
            Axis::Vit => "PRs",
            Axis::Int => "Reading",
            Axis::Wis => "Rest",
            Axis::End => "Streak",
            Axis::Dex => "Mobility",
            Axis::Cha => "Clips/Photo & Hygiene",
            Axis::Luk => "New Activity",
        }
    }

    /// Position in [`Axis::ALL`].
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value for every axis. Missing axes never exist: the default is all zeros.
///
/// Serializes as a map keyed by axis code (`{"STR": 1.0, ...}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatVector {
    #[serde(rename = "STR", default)]
    pub str_: f64,
    #[serde(rename = "AGI", default)]
    pub agi: f64,
    #[serde(rename = "VIT", default)]
    pub vit: f64,
    #[serde(rename = "INT", default)]
    pub int: f64,
    #[serde(rename = "WIS", default)]
    pub wis: f64,
    #[serde(rename = "END", default)]
    pub end: f64,
    #[serde(rename = "DEX", default)]
    pub dex: f64,
    #[serde(rename = "CHA", default)]
    pub cha: f64,
    #[serde(rename = "LUK", default)]
    pub luk: f64,
}

impl StatVector {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Iterate `(axis, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self[axis]))
    }

    /// Every axis strictly positive.
    pub fn all_positive(&self) -> bool {
        self.iter().all(|(_, v)| v > 0.0)
    }

    pub fn min(&self) -> f64 {
        self.iter().map(|(_, v)| v).fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.iter().map(|(_, v)| v).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every axis multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = Self::zero();
        for (axis, v) in self.iter() {
            out[axis] = v * factor;
        }
        out
    }

    /// Add `other` into `self` axis by axis.
    ///
    /// A term that is non-finite, or that would push the running sum out of
    /// finite range, is a no-op for its axis. The axis is returned in the list
    /// of dropped axes so the caller can report it.
    pub fn accumulate(&mut self, other: &StatVector) -> Vec<Axis> {
        let mut dropped = Vec::new();
        for (axis, v) in other.iter() {
            let next = self[axis] + v;
            if v.is_finite() && next.is_finite() {
                self[axis] = next;
            } else {
                dropped.push(axis);
            }
        }
        dropped
    }
}

impl Index<Axis> for StatVector {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        match axis.slot() {
            0 => &self.str_,
            1 => &self.agi,
            2 => &self.vit,
            3 => &self.int,
            4 => &self.wis,
            5 => &self.end,
            6 => &self.dex,
            7 => &self.cha,
            _ => &self.luk,
        }
    }
}

impl IndexMut<Axis> for StatVector {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis.slot() {
            0 => &mut self.str_,
            1 => &mut self.agi,
            2 => &mut self.vit,
            3 => &mut self.int,
            4 => &mut self.wis,
            5 => &mut self.end,
            6 => &mut self.dex,
            7 => &mut self.cha,
            _ => &mut self.luk,
        }
    }
}
