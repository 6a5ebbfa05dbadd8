//! Offline training and block-hit shield training.

use tracing::debug;

use crate::context::RuleContext;
use crate::notify::{MessageClass, Notification, NotificationSink};
use crate::state::{Character, ItemArena, SkillKind, Slot, Track};

use super::hook::ProgressionHooks;
use super::ledger::{add_mana_spent, add_skill_advance, vocation_of};

/// How an attack was stopped by its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    #[default]
    None,
    Defense,
    Armor,
    Immunity,
}

/// Number of blocked hits that still train after a clean hit.
pub const TRAINING_WINDOW: u32 = 30;

/// Applies tries gathered while logged out.
///
/// Sends a progress summary and returns true when a level was gained.
/// Experience cannot be trained offline.
pub fn add_offline_training_tries(
    character: &mut Character,
    cx: &RuleContext<'_>,
    track: Track,
    tries: u64,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> bool {
    if tries == 0 || track == Track::Level {
        return false;
    }
    let Some(vocation) = vocation_of(cx, character) else {
        return false;
    };

    let (name, old_level, old_percent) = match track {
        Track::MagicLevel => {
            let level = character.progression.magic_level;
            let next = vocation.req_mana(level + 1);
            if vocation.req_mana(level) >= next {
                return false;
            }
            (String::from("Magic Level"), level, raw_percent(character.progression.mana_spent, next))
        }
        Track::Skill(skill) => {
            let record = *character.skill(skill);
            let next = vocation.req_skill_tries(skill, record.level + 1);
            if vocation.req_skill_tries(skill, record.level) >= next {
                return false;
            }
            (title_case(skill.name()), record.level, raw_percent(record.tries, next))
        }
        Track::Level => return false,
    };

    let gained = match track {
        Track::MagicLevel => add_mana_spent(character, cx, tries, hooks, sink),
        Track::Skill(skill) => add_skill_advance(character, cx, skill, tries, hooks, sink),
        Track::Level => 0,
    };

    let (new_level, new_percent) = match track {
        Track::Skill(skill) => {
            let record = *character.skill(skill);
            let next = vocation.req_skill_tries(skill, record.level + 1);
            (record.level, raw_percent(record.tries, next))
        }
        _ => {
            let ledger = &character.progression;
            let next = vocation.req_mana(ledger.magic_level + 1);
            (ledger.magic_level, raw_percent(ledger.mana_spent, next))
        }
    };

    sink.notify(Notification::text(
        MessageClass::EventAdvance,
        format!(
            "Your {name} skill changed from level {old_level} (with {old_percent:.2}% progress towards level {}) to level {new_level} (with {new_percent:.2}% progress towards level {})",
            old_level + 1,
            new_level + 1,
        ),
    ));
    debug!(character = %character.id, ?track, tries, gained, "offline training applied");
    gained > 0
}

fn raw_percent(count: u64, next: u64) -> f64 {
    if next == 0 {
        0.0
    } else {
        count as f64 * 100.0 / next as f64
    }
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The character blocked an incoming hit.
///
/// Trains shielding while the block counter lasts and a shield is held.
pub fn on_block_hit(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) {
    if character.combat.shield_block_count == 0 {
        return;
    }
    character.combat.shield_block_count -= 1;
    if holds_shield(character, arena, cx) {
        add_skill_advance(character, cx, SkillKind::Shield, 1, hooks, sink);
    }
}

/// The character's own attack was blocked by its target.
///
/// A clean hit opens a new training window; blocked hits keep granting
/// attack skill points until the window runs out.
pub fn on_attacked_creature_block_hit(character: &mut Character, block: BlockType) {
    let combat = &mut character.combat;
    match block {
        BlockType::None => {
            combat.add_attack_skill_point = true;
            combat.blood_hit_count = TRAINING_WINDOW;
            combat.shield_block_count = TRAINING_WINDOW;
        }
        BlockType::Defense | BlockType::Armor if combat.blood_hit_count > 0 => {
            combat.add_attack_skill_point = true;
            combat.blood_hit_count -= 1;
        }
        _ => combat.add_attack_skill_point = false,
    }
}

fn holds_shield(character: &Character, arena: &ItemArena, cx: &RuleContext<'_>) -> bool {
    [Slot::Left, Slot::Right].into_iter().any(|slot| {
        character
            .equipment
            .get(slot)
            .and_then(|id| arena.get(id))
            .and_then(|item| cx.env.item_type(item.type_id).ok())
            .is_some_and(|t| t.is_shield())
    })
}
