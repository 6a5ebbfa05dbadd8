//! Target-conditioned passives, avatars and Gift of Life.
//!
//! These are queries the host asks while resolving an attack or a spell;
//! apart from [`activate_avatar`] and [`trigger_gift_of_life`] nothing here
//! touches the character.

use tracing::debug;

use crate::context::RuleContext;
use crate::notify::{MessageClass, Notification, NotificationSink};
use crate::state::{Character, CreatureId, PassiveKind, ResourceMeter, SkillKind, Timestamp};
use crate::stats::effective_skill;

use super::evaluate::by_stage;

/// What the host knows about the current attack target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetView {
    pub id: CreatureId,
    pub health: ResourceMeter,
    pub is_monster: bool,
    /// Share of the target's incoming damage, in percent of normal.
    pub damage_received_percent: i32,
    /// Share of the target's outgoing damage, in percent of normal.
    pub damage_dealt_percent: i32,
}

impl TargetView {
    pub fn monster(id: CreatureId, health: ResourceMeter) -> Self {
        Self {
            id,
            health,
            is_monster: true,
            damage_received_percent: 100,
            damage_dealt_percent: 100,
        }
    }

    pub fn player(id: CreatureId, health: ResourceMeter) -> Self {
        Self {
            is_monster: false,
            ..Self::monster(id, health)
        }
    }

    /// Remaining health in whole percent, rounded to nearest.
    pub fn health_percent(&self) -> i32 {
        rounded_percent(self.health)
    }
}

fn rounded_percent(meter: ResourceMeter) -> i32 {
    if meter.maximum == 0 {
        return 0;
    }
    ((f64::from(meter.current) * 100.0) / f64::from(meter.maximum)).round() as i32
}

/// Stage of `kind` against `target`, `None` when the passive does not apply.
fn stage_against(character: &Character, kind: PassiveKind, target: Option<&TargetView>) -> Option<(u8, TargetView)> {
    let target = *target?;
    if target.id == character.id || !character.passives.is_unlocked(kind) {
        return None;
    }
    Some((character.passives.stage(kind), target))
}

/// Extra healing percent from Blessing of the Grove on a wounded target.
pub fn blessing_of_the_grove_healing(character: &Character, target: Option<&TargetView>) -> i32 {
    let Some((stage, target)) = stage_against(character, PassiveKind::BlessingOfTheGrove, target)
    else {
        return 0;
    };
    match target.health_percent() {
        p if p <= 30 => by_stage(stage, [12, 18, 24]),
        p if p <= 60 => by_stage(stage, [6, 9, 12]),
        _ => 0,
    }
}

/// Extra damage percent from Twin Burst on a healthy target.
pub fn twin_burst_bonus(character: &Character, target: Option<&TargetView>) -> i32 {
    match stage_against(character, PassiveKind::TwinBurst, target) {
        Some((stage, target)) if target.health_percent() > 60 => by_stage(stage, [20, 40, 60]),
        _ => 0,
    }
}

/// Extra damage percent from Executioner's Throw on a nearly dead target.
pub fn executioners_throw_bonus(character: &Character, target: Option<&TargetView>) -> i32 {
    match stage_against(character, PassiveKind::ExecutionersThrow, target) {
        Some((stage, target)) if target.health_percent() <= 30 => {
            by_stage(stage, [100, 125, 150])
        }
        _ => 0,
    }
}

/// Extra damage percent from Beam Mastery on any target.
pub fn beam_mastery_bonus(character: &Character, target: Option<&TargetView>) -> i32 {
    stage_against(character, PassiveKind::BeamMastery, target)
        .map_or(0, |(stage, _)| by_stage(stage, [10, 12, 14]))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeechKind {
    Mana,
    Life,
}

/// Leech bonus (hundredths of a percent) from Drain Body against monsters.
///
/// Mana leech needs a monster taking more damage than normal, life leech one
/// dealing less.
pub fn drain_body_leech(character: &Character, target: Option<&TargetView>, kind: LeechKind) -> i32 {
    let Some((stage, target)) = stage_against(character, PassiveKind::DrainBody, target) else {
        return 0;
    };
    if !target.is_monster {
        return 0;
    }
    match kind {
        LeechKind::Mana if target.damage_received_percent > 100 => by_stage(stage, [100, 200, 300]),
        LeechKind::Life if target.damage_dealt_percent < 100 => by_stage(stage, [300, 400, 500]),
        _ => 0,
    }
}

/// Healing granted by a battle healing spell, scaled up as health drops.
pub fn battle_healing_amount(character: &Character) -> u32 {
    let base = f64::from(effective_skill(character, SkillKind::Shield)) * 0.2;
    let multiplier = match rounded_percent(character.health) {
        p if p <= 30 => 3.0,
        p if p <= 60 => 2.0,
        _ => 1.0,
    };
    (base * multiplier) as u32
}

/// Effects an active avatar grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AvatarSkill {
    /// Percent of incoming damage removed.
    DamageReduction,
    /// Critical hit chance in percent.
    CriticalChance,
    /// Extra critical damage in percent.
    CriticalDamage,
}

/// Value of an avatar effect at `now`, zero without an active avatar.
pub fn avatar_skill(character: &Character, skill: AvatarSkill, now: Timestamp) -> i32 {
    let Some((kind, until)) = character.passives.avatar else {
        return 0;
    };
    if until <= now {
        return 0;
    }
    let stage = character.passives.stage(kind);
    if stage == 0 {
        return 0;
    }
    match skill {
        AvatarSkill::DamageReduction | AvatarSkill::CriticalDamage => {
            by_stage(stage, [5, 10, 15])
        }
        AvatarSkill::CriticalChance => 100,
    }
}

/// Starts an avatar for `duration_ms`; returns false for locked or
/// non-avatar passives.
pub fn activate_avatar(
    character: &mut Character,
    kind: PassiveKind,
    duration_ms: u64,
    now: Timestamp,
) -> bool {
    if !kind.is_avatar() || !character.passives.is_unlocked(kind) {
        return false;
    }
    character.passives.avatar = Some((kind, now + duration_ms));
    debug!(character = %character.id, avatar = kind.name(), until = %(now + duration_ms), "avatar activated");
    true
}

/// Spell cooldown reduction applied when Gift of Life triggers.
const GIFT_OF_LIFE_COOLDOWN_CUT_MS: u64 = 60_000;

/// Saves the character from a lethal hit.
///
/// Triggers when unlocked, off cooldown and `damage` would kill. Heals a
/// share of maximum health, shortens spell cooldowns and starts the
/// passive's own cooldown. Returns whether the hit should be cancelled.
pub fn trigger_gift_of_life(
    character: &mut Character,
    cx: &RuleContext<'_>,
    damage: u32,
    sink: &mut dyn NotificationSink,
) -> bool {
    let passives = &character.passives;
    if !passives.is_unlocked(PassiveKind::GiftOfLife)
        || passives.stage(PassiveKind::GiftOfLife) == 0
        || passives.gift_of_life_cooldown > 0
        || damage < character.health.current
    {
        return false;
    }
    let stage = passives.stage(PassiveKind::GiftOfLife);
    let heal_percent = by_stage(stage, [20, 25, 30]) as u64;
    let cooldown_hours = by_stage(stage, [30, 24, 18]) as u32;

    let heal = u64::from(character.health.maximum) * heal_percent / 100;
    character
        .health
        .set_current(character.health.current.saturating_add(heal as u32));
    character
        .combat
        .conditions
        .reduce_cooldowns(GIFT_OF_LIFE_COOLDOWN_CUT_MS, cx.now);
    character.passives.gift_of_life_cooldown = cooldown_hours * 60 * 60;
    character.passives.cooldown_clock = cx.now;

    sink.notify(Notification::text(
        MessageClass::EventAdvance,
        "That was close! Fortunately, your were saved by the Gift of Life.",
    ));
    sink.notify(Notification::Stats);
    debug!(character = %character.id, heal, "gift of life triggered");
    true
}
