//! Source-tagged bonus stacks.
//!
//! Equipment, conditions and scripts add bonuses to skills, magic level and
//! mitigation. Each entry remembers its source so unequipping an item or
//! ending a condition removes exactly what it added.
//!
//! Application order: Flat → %Inc → Clamp.

use crate::state::Slot;

/// Where a bonus came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusSource {
    Equipment(Slot),
    Condition(u16),
    Script(u16),
}

/// A single bonus that can be applied to a stat value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus (applied first)
    Flat(i32),

    /// Percentage increase, summed with other %Inc then multiplied.
    /// Stored as integer percentage (e.g., 20 = +20%)
    Increased(i32),
}

/// Bonuses applied in a fixed order:
/// 1. Flat bonuses (summed)
/// 2. Increased bonuses (summed, then multiplied)
/// 3. Clamp to bounds
///
/// # Example
/// ```
/// # use character_core::stats::{Bonus, BonusSource, BonusStack};
/// # use character_core::state::Slot;
/// let mut stack = BonusStack::new();
/// stack.add(BonusSource::Equipment(Slot::Ring), Bonus::Flat(3));
/// stack.add(BonusSource::Condition(7), Bonus::Increased(50));
///
/// // (10 + 3) * 1.5 = 19.5 -> 19
/// assert_eq!(stack.apply(10, 0, 200), 19);
///
/// stack.remove_source(BonusSource::Condition(7));
/// assert_eq!(stack.apply(10, 0, 200), 13);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    entries: Vec<(BonusSource, Bonus)>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, source: BonusSource, bonus: Bonus) {
        self.entries.push((source, bonus));
    }

    /// Removes every bonus added by `source`; returns true if any existed.
    pub fn remove_source(&mut self, source: BonusSource) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(s, _)| *s != source);
        before != self.entries.len()
    }

    pub fn flat_total(&self) -> i32 {
        self.entries
            .iter()
            .filter_map(|(_, b)| match b {
                Bonus::Flat(v) => Some(*v),
                Bonus::Increased(_) => None,
            })
            .sum()
    }

    pub fn increased_total(&self) -> i32 {
        self.entries
            .iter()
            .filter_map(|(_, b)| match b {
                Bonus::Increased(p) => Some(*p),
                Bonus::Flat(_) => None,
            })
            .sum()
    }

    /// Applies all bonuses to `base` and clamps the result.
    ///
    /// ```text
    /// result = clamp((base + flat_sum) × (1 + inc_sum/100), min, max)
    /// ```
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let flat = base.saturating_add(self.flat_total());
        let inc = self.increased_total();
        let value = if inc == 0 {
            flat
        } else {
            let scaled = i64::from(flat) * i64::from(100 + inc) / 100;
            scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        value.clamp(min, max)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
