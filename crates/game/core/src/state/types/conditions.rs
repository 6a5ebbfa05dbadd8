//! Active conditions (buffs, debuffs, cooldowns) on a character.
//!
//! Conditions store an absolute `expires_at` deadline and are dropped once
//! the tick clock passes it. Persistent conditions are the timed ones picked
//! up in play; death clears them. Permanent conditions granted by equipment
//! are not persistent and survive death.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::CombatType;
use crate::state::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionKind {
    /// Recently attacked or was attacked; blocks logout and protection zones.
    InFight,
    Haste,
    Paralyze,
    Poison,
    Burning,
    Electrified,
    Bleeding,
    Drunk,
    Regeneration,
    /// Cooldown of a single spell.
    SpellCooldown(u16),
    /// Cooldown shared by a spell group.
    SpellGroupCooldown(u8),
    /// Potion reducing incoming damage of one element.
    ProtectionPotion(CombatType),
    /// Potion increasing outgoing damage of one element.
    AttackPotion(CombatType),
}

impl ConditionKind {
    pub const fn is_cooldown(self) -> bool {
        matches!(self, Self::SpellCooldown(_) | Self::SpellGroupCooldown(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub kind: ConditionKind,
    /// `None` for conditions that last until explicitly removed.
    pub expires_at: Option<Timestamp>,
    pub persistent: bool,
}

impl Condition {
    /// A timed condition picked up in play.
    pub fn timed(kind: ConditionKind, expires_at: Timestamp) -> Self {
        Self {
            kind,
            expires_at: Some(expires_at),
            persistent: true,
        }
    }

    /// A condition held for as long as its source (usually an item) lasts.
    pub fn permanent(kind: ConditionKind) -> Self {
        Self {
            kind,
            expires_at: None,
            persistent: false,
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionSet {
    conditions: ArrayVec<Condition, { GameConfig::MAX_CONDITIONS }>,
}

impl ConditionSet {
    pub fn empty() -> Self {
        Self {
            conditions: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: ConditionKind, now: Timestamp) -> bool {
        self.conditions
            .iter()
            .any(|c| c.kind == kind && c.is_active(now))
    }

    /// Gets the expiration time of a condition, `None` when it is inactive
    /// or never expires.
    pub fn expires_at(&self, kind: ConditionKind, now: Timestamp) -> Option<Timestamp> {
        self.conditions
            .iter()
            .find(|c| c.kind == kind && c.is_active(now))
            .and_then(|c| c.expires_at)
    }

    /// Adds a condition.
    ///
    /// If the kind is already present the later deadline wins. Returns false
    /// when the set is full.
    pub fn add(&mut self, condition: Condition) -> bool {
        if let Some(existing) = self
            .conditions
            .iter_mut()
            .find(|c| c.kind == condition.kind)
        {
            existing.expires_at = match (existing.expires_at, condition.expires_at) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
            existing.persistent = existing.persistent && condition.persistent;
            return true;
        }
        self.conditions.try_push(condition).is_ok()
    }

    pub fn remove(&mut self, kind: ConditionKind) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| c.kind != kind);
        before != self.conditions.len()
    }

    /// Removes every persistent condition.
    pub fn remove_persistent(&mut self) {
        self.conditions.retain(|c| !c.persistent);
    }

    /// Drops conditions whose deadline passed and returns their kinds.
    pub fn remove_expired(&mut self, now: Timestamp) -> Vec<ConditionKind> {
        let expired = self
            .conditions
            .iter()
            .filter(|c| !c.is_active(now))
            .map(|c| c.kind)
            .collect();
        self.conditions.retain(|c| c.is_active(now));
        expired
    }

    /// Shortens every active spell cooldown by `millis`, never below `now`.
    pub fn reduce_cooldowns(&mut self, millis: u64, now: Timestamp) {
        for condition in self.conditions.iter_mut() {
            if !condition.kind.is_cooldown() {
                continue;
            }
            if let Some(at) = condition.expires_at {
                condition.expires_at = Some((at - millis).max(now));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_later_deadline() {
        let mut set = ConditionSet::empty();
        set.add(Condition::timed(ConditionKind::InFight, Timestamp(5_000)));
        set.add(Condition::timed(ConditionKind::InFight, Timestamp(3_000)));
        assert_eq!(
            set.expires_at(ConditionKind::InFight, Timestamp(0)),
            Some(Timestamp(5_000))
        );
        assert!(!set.has(ConditionKind::InFight, Timestamp(5_000)));
    }

    #[test]
    fn remove_persistent_keeps_equipment_conditions() {
        let mut set = ConditionSet::empty();
        set.add(Condition::timed(ConditionKind::Poison, Timestamp(9_000)));
        set.add(Condition::permanent(ConditionKind::Haste));
        set.remove_persistent();
        assert!(!set.has(ConditionKind::Poison, Timestamp(0)));
        assert!(set.has(ConditionKind::Haste, Timestamp(u64::MAX)));
    }

    #[test]
    fn remove_expired_reports_kinds() {
        let mut set = ConditionSet::empty();
        set.add(Condition::timed(ConditionKind::InFight, Timestamp(1_000)));
        set.add(Condition::timed(ConditionKind::Drunk, Timestamp(8_000)));
        let expired = set.remove_expired(Timestamp(2_000));
        assert_eq!(expired, vec![ConditionKind::InFight]);
        assert!(set.has(ConditionKind::Drunk, Timestamp(2_000)));
    }

    #[test]
    fn cooldown_reduction_clamps_to_now() {
        let mut set = ConditionSet::empty();
        set.add(Condition::timed(ConditionKind::SpellCooldown(3), Timestamp(100_000)));
        set.add(Condition::timed(ConditionKind::SpellGroupCooldown(1), Timestamp(30_000)));
        set.add(Condition::timed(ConditionKind::Haste, Timestamp(100_000)));
        set.reduce_cooldowns(60_000, Timestamp(10_000));

        assert_eq!(
            set.expires_at(ConditionKind::SpellCooldown(3), Timestamp(0)),
            Some(Timestamp(40_000))
        );
        assert_eq!(
            set.expires_at(ConditionKind::SpellGroupCooldown(1), Timestamp(0)),
            Some(Timestamp(10_000))
        );
        assert_eq!(
            set.expires_at(ConditionKind::Haste, Timestamp(0)),
            Some(Timestamp(100_000))
        );
    }
}
