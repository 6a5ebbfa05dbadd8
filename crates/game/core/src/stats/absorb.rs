//! Incoming damage absorption.

use arrayvec::ArrayVec;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::env::{CombatType, GameEnv};
use crate::passive::{AvatarSkill, avatar_skill};
use crate::state::{Character, ConditionKind, ItemArena, Slot, Timestamp};

use super::weapon::equipped;

/// Damage about to hit a character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncomingDamage {
    pub amount: i64,
    pub combat: CombatType,
    /// Damage comes from a field on the ground.
    pub field: bool,
    /// Attacker is a player under an attack potion for this element.
    pub attacker_boosted: bool,
}

impl IncomingDamage {
    pub fn new(amount: i64, combat: CombatType) -> Self {
        Self {
            amount,
            combat,
            field: false,
            attacker_boosted: false,
        }
    }

    pub fn from_field(mut self) -> Self {
        self.field = true;
        self
    }

    pub fn boosted(mut self) -> Self {
        self.attacker_boosted = true;
        self
    }
}

/// Result of [`absorb_damage`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Absorbed {
    /// Damage left after absorption, never negative.
    pub damage: i64,
    /// Everything was soaked up by armor.
    pub blocked: bool,
    /// Slots whose item used up its last charge.
    pub exhausted: ArrayVec<Slot, { Slot::COUNT }>,
}

/// Applies item, field, potion and avatar absorption to `incoming`.
///
/// Each equipped item with a non-zero absorb percent for the element removes
/// its rounded share and spends one charge when it has charges. Items that
/// reach zero charges are reported in [`Absorbed::exhausted`]; removing them
/// is the caller's job.
pub fn absorb_damage(
    character: &Character,
    arena: &mut ItemArena,
    env: &GameEnv<'_>,
    incoming: IncomingDamage,
    now: Timestamp,
) -> Absorbed {
    let mut damage = incoming.amount;
    let mut outcome = Absorbed::default();
    if damage <= 0 {
        return outcome;
    }

    for slot in Slot::iter() {
        let Some(item) = equipped(character, arena, env, slot) else {
            continue;
        };
        let mut spent = 0u16;

        let percent = item.item_type.absorb(incoming.combat);
        if percent != 0 {
            damage -= scaled_round(damage, percent);
            spent += 1;
        }
        if incoming.field {
            let percent = item.item_type.field_absorb(incoming.combat);
            if percent != 0 {
                damage -= scaled_round(damage, percent);
                spent += 1;
            }
        }

        if spent > 0
            && let Some(instance) = arena.get_mut(item.id)
            && instance.charges != 0
        {
            instance.charges = instance.charges.saturating_sub(spent);
            if instance.charges == 0 {
                outcome.exhausted.push(slot);
            }
        }
    }

    if damage > 0 {
        let conditions = &character.combat.conditions;
        if conditions.has(ConditionKind::ProtectionPotion(incoming.combat), now) {
            damage -= ceil_percent(damage, 8);
        }
        if incoming.attacker_boosted {
            damage += ceil_percent(damage, 8);
        }
    }

    let reduction = avatar_skill(character, AvatarSkill::DamageReduction, now);
    if reduction > 0 {
        damage -= ceil_percent(damage, reduction);
    }

    if damage <= 0 {
        damage = 0;
        outcome.blocked = true;
    }
    debug!(
        character = %character.id,
        combat = ?incoming.combat,
        before = incoming.amount,
        after = damage,
        "absorbed damage"
    );
    outcome.damage = damage;
    outcome
}

fn scaled_round(damage: i64, percent: i16) -> i64 {
    (damage as f64 * (f64::from(percent) / 100.0)).round() as i64
}

fn ceil_percent(damage: i64, percent: i32) -> i64 {
    (damage as f64 * f64::from(percent) / 100.0).ceil() as i64
}
