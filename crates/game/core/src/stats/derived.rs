//! Derived combat stats: mitigation, defense, armor and stance factors.
//!
//! Everything here is a pure function of equipment, skills, vocation, stance
//! and the tick clock. A missing vocation is logged and contributes zero
//! multipliers; missing items count as empty slots.

use tracing::warn;

use crate::env::{GameEnv, Vocation};
use crate::state::{Character, FightMode, ItemArena, MajorStat, SkillKind, Slot, Timestamp};

use super::weapon::{effective_skill, equipped, shield_and_weapon, weapon_skill};

/// Snapshot of derived stats, cached on the character after equipment changes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    /// Fraction of incoming damage mitigated, two decimals.
    pub mitigation: f64,
    pub defense: i32,
    pub attack_factor: f64,
    pub defense_factor: f64,
    pub armor: i32,
}

/// Vocation multipliers used by the calculator.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Multipliers {
    armor: f64,
    defense: f64,
    mitigation: f64,
    primary_shield: f64,
    secondary_shield: f64,
    attack_speed_ms: u64,
}

impl Multipliers {
    const ZERO: Self = Self {
        armor: 0.0,
        defense: 0.0,
        mitigation: 0.0,
        primary_shield: 0.0,
        secondary_shield: 0.0,
        attack_speed_ms: 0,
    };

    fn of(vocation: &Vocation) -> Self {
        Self {
            armor: vocation.armor_multiplier,
            defense: vocation.defense_multiplier,
            mitigation: vocation.mitigation_factor,
            primary_shield: vocation.mitigation_primary_shield,
            secondary_shield: vocation.mitigation_secondary_shield,
            attack_speed_ms: vocation.attack_speed_ms,
        }
    }

    fn lookup(character: &Character, env: &GameEnv<'_>) -> Self {
        match env.vocation(character.vocation) {
            Ok(vocation) => Self::of(vocation),
            Err(error) => {
                warn!(
                    character = %character.id,
                    vocation = ?character.vocation,
                    %error,
                    "vocation unavailable, derived stats use zero multipliers"
                );
                Self::ZERO
            }
        }
    }
}

pub fn compute_derived_stats(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'_>,
    now: Timestamp,
) -> DerivedStats {
    let multipliers = Multipliers::lookup(character, env);
    DerivedStats {
        mitigation: mitigation_with(character, arena, env, &multipliers),
        defense: defense_with(character, arena, env, &multipliers, now),
        attack_factor: attack_factor(character.combat.fight_mode),
        defense_factor: defense_factor_with(character, &multipliers, now),
        armor: armor_with(character, arena, env, &multipliers),
    }
}

pub fn mitigation(character: &Character, arena: &ItemArena, env: &GameEnv<'_>) -> f64 {
    mitigation_with(character, arena, env, &Multipliers::lookup(character, env))
}

pub fn defense(character: &Character, arena: &ItemArena, env: &GameEnv<'_>, now: Timestamp) -> i32 {
    defense_with(character, arena, env, &Multipliers::lookup(character, env), now)
}

pub fn armor(character: &Character, arena: &ItemArena, env: &GameEnv<'_>) -> i32 {
    armor_with(character, arena, env, &Multipliers::lookup(character, env))
}

pub fn defense_factor(character: &Character, env: &GameEnv<'_>, now: Timestamp) -> f64 {
    defense_factor_with(character, &Multipliers::lookup(character, env), now)
}

pub const fn attack_factor(mode: FightMode) -> f64 {
    match mode {
        FightMode::Attack => 1.0,
        FightMode::Balanced => 0.75,
        FightMode::Defense => 0.5,
    }
}

const fn fight_factor(mode: FightMode) -> f64 {
    match mode {
        FightMode::Attack => 0.67,
        FightMode::Balanced => 0.84,
        FightMode::Defense => 1.0,
    }
}

/// Rounds up to two decimals.
///
/// The `1e-9` nudge absorbs f64 noise from the scaling, so a value that is
/// exactly on a hundredth stays there: `0.6 * 100.0` is
/// `60.00000000000001` and would otherwise ceil to 0.61. Anything more than
/// 1e-9 above a hundredth still rounds up.
fn ceil_hundredths(value: f64) -> f64 {
    ((value * 100.0) - 1e-9).ceil() / 100.0
}

fn mitigation_with(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'_>,
    m: &Multipliers,
) -> f64 {
    let skill = f64::from(effective_skill(character, SkillKind::Shield));
    let mut defense_value = 0i32;
    let mut shield_factor = 1.0;
    let mut distance_factor = 1.0;

    if let Some(shield) = equipped(character, arena, env, Slot::Right) {
        let item = shield.item_type;
        if item.spellbook || item.quiver {
            distance_factor = m.secondary_shield;
        } else {
            shield_factor = m.primary_shield;
        }
        defense_value = item.defense;
        if item.defense > 0 {
            defense_value += character.passives.major(MajorStat::Defense);
        }
    }

    if let Some(weapon) = equipped(character, arena, env, Slot::Left) {
        let item = weapon.item_type;
        if item.ammo_type.uses_quiver() {
            distance_factor = m.secondary_shield;
        } else if item.is_two_handed() {
            defense_value = item.defense + item.extra_defense;
            shield_factor = m.secondary_shield;
        } else {
            defense_value += item.extra_defense;
            shield_factor = m.primary_shield;
        }
    }

    let raw = ((skill * m.mitigation + shield_factor * f64::from(defense_value)) / 100.0)
        * fight_factor(character.combat.fight_mode)
        * distance_factor;
    let mitigation = ceil_hundredths(raw);
    let bonus = f64::from(character.combat.mitigation_bonus.increased_total());
    mitigation + mitigation * bonus / 100.0
}

fn defense_with(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'_>,
    m: &Multipliers,
    now: Timestamp,
) -> i32 {
    let (shield, weapon) = shield_and_weapon(character, arena, env);
    let mut defense_skill = effective_skill(character, SkillKind::Fist);
    let mut defense_value = 7;

    if let Some(weapon) = weapon {
        defense_value = weapon.item_type.defense + weapon.item_type.extra_defense;
        defense_skill = weapon_skill(character, Some(weapon.item_type));
    }

    if let Some(shield) = shield {
        defense_value = shield.item_type.defense + weapon.map_or(0, |w| w.item_type.extra_defense);
        if defense_value > 0 {
            defense_value += character.passives.major(MajorStat::Defense);
        }
        defense_skill = effective_skill(character, SkillKind::Shield);
    }

    if defense_skill == 0 {
        return match character.combat.fight_mode {
            FightMode::Attack | FightMode::Balanced => 1,
            FightMode::Defense => 2,
        };
    }

    let value = (f64::from(defense_skill) / 4.0 + 2.23)
        * f64::from(defense_value)
        * 0.15
        * defense_factor_with(character, m, now)
        * m.defense;
    value as i32
}

fn defense_factor_with(character: &Character, m: &Multipliers, now: Timestamp) -> f64 {
    let swinging = now.since(character.combat.last_attack) < m.attack_speed_ms;
    match character.combat.fight_mode {
        FightMode::Attack if swinging => 0.5,
        FightMode::Balanced if swinging => 0.75,
        _ => 1.0,
    }
}

fn armor_with(character: &Character, arena: &ItemArena, env: &GameEnv<'_>, m: &Multipliers) -> i32 {
    let total: i32 = Slot::ARMOR_SLOTS
        .iter()
        .filter_map(|slot| equipped(character, arena, env, *slot))
        .map(|item| item.item_type.armor)
        .sum();
    (f64::from(total) * m.armor) as i32
}
