//! Tick-driven refresh of the Wheel of Destiny overlay.

use tracing::debug;

use crate::context::RuleContext;
use crate::env::ZoneType;
use crate::notify::{Notification, NotificationSink};
use crate::state::{
    Character, CharacterFlags, Condition, ConditionKind, ItemArena, PassiveKind, Timestamp,
};

use super::evaluate::{evaluate, zone};

/// Passives refreshed on every aggressive action.
const IN_FIGHT_PASSIVES: [PassiveKind; 3] = [
    PassiveKind::BattleInstinct,
    PassiveKind::PositionalTactics,
    PassiveKind::BallisticMastery,
];

fn notify_resync(sink: &mut dyn NotificationSink) {
    sink.notify(Notification::Skills);
    sink.notify(Notification::Stats);
}

/// Counts the Gift of Life cooldown down by whole seconds since the last
/// decrement.
pub fn tick_gift_of_life_cooldown(character: &mut Character, now: Timestamp) {
    let passives = &mut character.passives;
    if passives.gift_of_life_cooldown == 0 {
        passives.cooldown_clock = now;
        return;
    }
    let seconds = now.since(passives.cooldown_clock) / 1_000;
    if seconds == 0 {
        return;
    }
    let spent = u32::try_from(seconds)
        .unwrap_or(u32::MAX)
        .min(passives.gift_of_life_cooldown);
    passives.gift_of_life_cooldown -= spent;
    passives.cooldown_clock = passives.cooldown_clock + seconds * 1_000;
}

/// Re-evaluates the periodic passives whose deadline passed, or all of them
/// with `force`.
///
/// Out of combat, in a protection zone, or with nothing unlocked and no
/// Gift of Life cooldown running, every major stat drops to zero instead.
/// Emits one `Skills` + `Stats` pair when anything changed and returns
/// whether it did.
pub fn on_combat_tick(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    force: bool,
    sink: &mut dyn NotificationSink,
) -> bool {
    let now = cx.now;
    tick_gift_of_life_cooldown(character, now);

    let idle = !character.passives.any_periodic_unlocked()
        && character.passives.gift_of_life_cooldown == 0;
    if !character.is_in_fight(now) || idle || zone(character, cx) == ZoneType::Protection {
        let changed = character.passives.reset_majors();
        if changed {
            debug!(character = %character.id, "passive overlay reset");
            notify_resync(sink);
        }
        return changed;
    }

    let changed = refresh(character, arena, cx, &PassiveKind::PERIODIC, force);
    if changed {
        notify_resync(sink);
    }
    changed
}

/// Refreshes the proximity passives and extends the in-fight condition.
///
/// `pz_lock` also locks the character out of protection zones. Characters
/// flagged `NOT_GAIN_IN_FIGHT` get the refresh but no condition.
pub fn add_in_fight_ticks(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    pz_lock: bool,
    sink: &mut dyn NotificationSink,
) {
    if refresh(character, arena, cx, &IN_FIGHT_PASSIVES, false) {
        notify_resync(sink);
    }
    if character.flags.contains(CharacterFlags::NOT_GAIN_IN_FIGHT) {
        return;
    }
    if pz_lock {
        character.combat.pz_locked = true;
    }
    character.combat.conditions.add(Condition::timed(
        ConditionKind::InFight,
        cx.now + cx.config.pz_locked_ms,
    ));
}

fn refresh(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    kinds: &[PassiveKind],
    force: bool,
) -> bool {
    let mut changed = false;
    for &kind in kinds {
        if !character.passives.is_unlocked(kind) {
            continue;
        }
        if !force && character.passives.deadline(kind) > cx.now {
            continue;
        }
        changed |= evaluate(kind, character, arena, cx);
        character
            .passives
            .set_deadline(kind, cx.config.next_passive_deadline(cx.now));
    }
    if changed {
        debug!(character = %character.id, force, "passive overlay changed");
    }
    changed
}
