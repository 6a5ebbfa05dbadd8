//! Unjustified kills and skull escalation.
//!
//! Kill records are kept forever; the day, week and month windows decide
//! which ones still count toward a red or black skull. Red and black skulls
//! run on `skull_ticks` and only fall off once they hit zero outside combat.

use tracing::debug;

use crate::config::{SkullConfig, WorldType};
use crate::context::RuleContext;
use crate::notify::{MessageClass, Notification, NotificationSink};
use crate::state::{Character, CharacterFlags, CreatureId, Skull, Timestamp, UnjustifiedKill};

const WEEK_MS: u64 = 7 * SkullConfig::DAY_MS;
const MONTH_MS: u64 = 30 * SkullConfig::DAY_MS;

fn set_skull(character: &mut Character, skull: Skull, sink: &mut dyn NotificationSink) {
    if character.reputation.skull == skull {
        return;
    }
    debug!(character = %character.id, from = ?character.reputation.skull, to = ?skull, "skull changed");
    character.reputation.skull = skull;
    sink.notify(Notification::SkullChanged(skull));
}

/// Kills still counted inside the day, week and month windows.
pub fn window_kills(character: &Character, now: Timestamp) -> (u32, u32, u32) {
    character
        .reputation
        .kills
        .iter()
        .fold((0, 0, 0), |(day, week, month), kill| {
            let age = now.since(kill.at);
            (
                day + u32::from(age <= SkullConfig::DAY_MS),
                week + u32::from(age <= WEEK_MS),
                month + u32::from(age <= MONTH_MS),
            )
        })
}

/// Records an unjustified kill of `target` and escalates the skull.
pub fn add_unjustified_kill(
    character: &mut Character,
    cx: &RuleContext<'_>,
    target: CreatureId,
    target_name: &str,
    sink: &mut dyn NotificationSink,
) {
    if character.flags.contains(CharacterFlags::NOT_GAIN_IN_FIGHT)
        || target == character.id
        || cx.config.world_type == WorldType::PvpEnforced
    {
        return;
    }

    sink.notify(Notification::text(
        MessageClass::Warning,
        format!("Warning! The murder of {target_name} was not justified."),
    ));
    character.reputation.kills.push(UnjustifiedKill {
        target,
        at: cx.now,
        unavenged: true,
    });

    let skulls = &cx.config.skulls;
    let (day, week, month) = window_kills(character, cx.now);
    if character.reputation.skull != Skull::Black {
        if day >= 2 * skulls.day_kills_to_red
            || week >= 2 * skulls.week_kills_to_red
            || month >= 2 * skulls.month_kills_to_red
        {
            set_skull(character, Skull::Black, sink);
            character.reputation.skull_ticks = skulls.black_duration_ms() as i64;
        } else if day >= skulls.day_kills_to_red
            || week >= skulls.week_kills_to_red
            || month >= skulls.month_kills_to_red
        {
            set_skull(character, Skull::Red, sink);
            character.reputation.skull_ticks = skulls.red_duration_ms() as i64;
        }
    }
    debug!(character = %character.id, %target, day, week, month, "unjustified kill");
    sink.notify(Notification::UnjustifiedPoints);
}

/// `avenger` killed this character back; its kills on them stop counting as
/// unavenged.
pub fn on_retaliation(character: &mut Character, avenger: CreatureId) {
    for kill in character
        .reputation
        .kills
        .iter_mut()
        .filter(|kill| kill.target == avenger)
    {
        kill.unavenged = false;
    }
}

/// Whether this character murdered `target` recently and was not avenged.
pub fn has_killed(character: &Character, cx: &RuleContext<'_>, target: CreatureId) -> bool {
    let window = cx.config.skulls.orange_duration_ms();
    character.reputation.kills.iter().any(|kill| {
        kill.target == target && kill.unavenged && cx.now.since(kill.at) < window
    })
}

fn has_unavenged_kills(character: &Character, cx: &RuleContext<'_>) -> bool {
    let window = cx.config.skulls.orange_duration_ms();
    character
        .reputation
        .kills
        .iter()
        .any(|kill| kill.unavenged && cx.now.since(kill.at) < window)
}

pub fn add_attacked(character: &mut Character, target: CreatureId) {
    if character.flags.contains(CharacterFlags::NOT_GAIN_IN_FIGHT) || target == character.id {
        return;
    }
    character.reputation.attacked.insert(target);
}

pub fn remove_attacked(character: &mut Character, target: CreatureId) {
    character.reputation.attacked.remove(&target);
}

pub fn clear_attacked(character: &mut Character) {
    character.reputation.attacked.clear();
}

pub fn has_attacked(character: &Character, target: CreatureId) -> bool {
    !character.flags.contains(CharacterFlags::NOT_GAIN_IN_FIGHT)
        && character.reputation.attacked.contains(&target)
}

/// First aggression against an unmarked player in an open-PvP world.
///
/// Marks the attacker white unless the victim is skulled or struck first.
pub fn on_attack_player(
    character: &mut Character,
    cx: &RuleContext<'_>,
    target: CreatureId,
    target_skull: Skull,
    target_attacked_us: bool,
    sink: &mut dyn NotificationSink,
) {
    if character.flags.contains(CharacterFlags::NOT_GAIN_IN_FIGHT) || target == character.id {
        return;
    }
    add_attacked(character, target);
    if cx.config.world_type == WorldType::Pvp
        && target_skull == Skull::None
        && !target_attacked_us
        && character.reputation.skull == Skull::None
    {
        set_skull(character, Skull::White, sink);
    }
}

/// Counts the red/black skull down by `elapsed_ms`.
pub fn check_skull_ticks(
    character: &mut Character,
    elapsed_ms: u64,
    in_fight: bool,
    sink: &mut dyn NotificationSink,
) {
    let reputation = &mut character.reputation;
    reputation.skull_ticks = reputation
        .skull_ticks
        .saturating_sub(i64::try_from(elapsed_ms).unwrap_or(i64::MAX))
        .max(0);
    if reputation.skull.is_sticky() && reputation.skull_ticks < 1 && !in_fight {
        set_skull(character, Skull::None, sink);
    }
}

/// Skull `viewer` sees on `character`.
///
/// Personal marks (orange for an unavenged murder of the viewer, yellow for
/// an attack on them, green for party members) only show on characters
/// without a skull of their own, and only in open-PvP worlds.
pub fn client_skull(
    character: &Character,
    viewer: &Character,
    cx: &RuleContext<'_>,
    same_party: bool,
) -> Skull {
    if cx.config.world_type != WorldType::Pvp {
        return Skull::None;
    }
    if character.reputation.skull == Skull::None {
        if character.id == viewer.id && has_unavenged_kills(character, cx) {
            return Skull::Orange;
        }
        if has_killed(character, cx, viewer.id) {
            return Skull::Orange;
        }
        if has_attacked(character, viewer.id) {
            return Skull::Yellow;
        }
        if same_party {
            return Skull::Green;
        }
    }
    character.reputation.skull
}

/// The in-fight condition ran out.
pub fn on_in_fight_end(character: &mut Character, sink: &mut dyn NotificationSink) {
    character.combat.pz_locked = false;
    clear_attacked(character);
    if !character.reputation.skull.is_sticky() {
        set_skull(character, Skull::None, sink);
    }
}
