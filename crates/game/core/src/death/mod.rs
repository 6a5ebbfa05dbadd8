//! Death resolution.
//!
//! Runs once when health reaches zero. A character eligible for skill loss
//! gives back a share of experience, magic level progress and skill tries,
//! loses blessings and wakes up with full resources (or black-skull
//! resources). An ineligible death only re-arms the loss flag and sends the
//! character to its temple.
mod loss;

pub use loss::{FightAssessment, assess_fight, lost_percent};

use strum::IntoEnumIterator;
use tracing::debug;

use crate::context::RuleContext;
use crate::env::{CreatureKind, CreatureView, Vocation, ZoneType};
use crate::notify::{MessageClass, Notification, NotificationSink};
use crate::progression::ProgressionHooks;
use crate::progression::curves::percent_level;
use crate::progression::ledger::{drop_levels, vocation_of};
use crate::state::{Blessings, Character, SkillKind, SkillRecord, Skull, Track};

/// What a death cost.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathOutcome {
    /// False when the character died to a player inside a PvP zone; loot
    /// still drops, just without a corpse.
    pub corpse_dropped: bool,
    /// Fraction of progression actually removed.
    pub loss_applied: f64,
    pub unfair_fight_reduction: u8,
    pub pvp_death: bool,
    pub levels_lost: u32,
}

/// Resolves the death of `character`, killed by `killer` (the last hit).
pub fn on_death(
    character: &mut Character,
    cx: &RuleContext<'_>,
    killer: Option<&CreatureView>,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> DeathOutcome {
    let corpse_dropped = drops_corpse(character, cx, killer);

    if !character.combat.skill_loss {
        character.combat.skill_loss = true;
        character.combat.conditions.remove_persistent();
        character.combat.damage_map.clear();
        character.health.refill();
        character.position = character.temple;
        sink.notify(Notification::MovedToTemple(character.temple));
        sink.notify(Notification::Stats);
        debug!(character = %character.id, "death without loss");
        return DeathOutcome {
            corpse_dropped,
            loss_applied: 0.0,
            unfair_fight_reduction: 100,
            pvp_death: false,
            levels_lost: 0,
        };
    }

    let vocation = vocation_of(cx, character);
    let fight = assess_fight(character, cx, killer);
    let mut loss =
        lost_percent(character, cx, vocation) * f64::from(fight.unfair_fight_reduction) / 100.0;
    let charm_blessed = killer
        .filter(|killer| killer.kind == CreatureKind::Monster)
        .and_then(|killer| killer.race_id)
        .is_some_and(|race| character.charm_rune_bless == Some(race));
    if charm_blessed {
        loss = loss * 90.0 / 100.0;
    }

    if let Some(vocation) = vocation {
        lose_magic_level(character, vocation, loss);
        lose_skills(character, vocation, loss);
    }
    let levels_lost = lose_experience(character, cx, vocation, loss, hooks, sink);

    let max_blessing = cx.config.max_blessing;
    if fight.pvp_death {
        character.blessings.strip(Blessings::TWIST_OF_FATE + 1, max_blessing);
    } else {
        character.blessings.strip(Blessings::TWIST_OF_FATE, max_blessing);
    }

    sink.notify(Notification::Stats);
    sink.notify(Notification::Skills);
    sink.notify(Notification::ReLoginWindow {
        unfair_fight_reduction: fight.unfair_fight_reduction,
    });
    sink.notify(Notification::BlessStatus);

    if character.reputation.skull == Skull::Black {
        let health = u32::try_from(cx.config.black_skull_death_health.max(0)).unwrap_or(0);
        character.health.set_current(health);
        character.mana.set_current(0);
    } else {
        character.health.refill();
        character.mana.refill();
    }
    character.combat.conditions.remove_persistent();
    character.combat.damage_map.clear();
    character.position = character.temple;

    debug!(
        character = %character.id,
        loss,
        pvp = fight.pvp_death,
        reduction = fight.unfair_fight_reduction,
        levels_lost,
        "death resolved"
    );
    DeathOutcome {
        corpse_dropped,
        loss_applied: loss,
        unfair_fight_reduction: fight.unfair_fight_reduction,
        pvp_death: fight.pvp_death,
        levels_lost,
    }
}

fn drops_corpse(character: &Character, cx: &RuleContext<'_>, killer: Option<&CreatureView>) -> bool {
    let in_pvp_zone = cx
        .env
        .world()
        .is_ok_and(|world| world.zone(character.position) == ZoneType::Pvp);
    !(in_pvp_zone && killer.is_some_and(CreatureView::is_player_controlled))
}

fn lose_magic_level(character: &mut Character, vocation: &Vocation, loss: f64) {
    let ledger = &mut character.progression;
    let total: u64 = (1..=ledger.magic_level)
        .map(|level| vocation.req_mana(level))
        .sum::<u64>()
        + ledger.mana_spent;
    let mut lost = (total as f64 * loss) as u64;

    while lost > ledger.mana_spent && ledger.magic_level > 0 {
        lost -= ledger.mana_spent;
        ledger.mana_spent = vocation.req_mana(ledger.magic_level);
        ledger.magic_level -= 1;
    }
    ledger.mana_spent = ledger.mana_spent.saturating_sub(lost);

    let current = vocation.req_mana(ledger.magic_level);
    let next = vocation.req_mana(ledger.magic_level + 1);
    ledger.magic_level_percent = if next > current {
        percent_level(ledger.mana_spent, next)
    } else {
        0.0
    };
}

fn lose_skills(character: &mut Character, vocation: &Vocation, loss: f64) {
    for skill in SkillKind::iter() {
        let record = character.progression.skills.get_mut(skill);
        let total: u64 = (SkillRecord::STARTING_LEVEL + 1..=record.level)
            .map(|level| vocation.req_skill_tries(skill, level))
            .sum::<u64>()
            + record.tries;
        let mut lost = (total as f64 * loss) as u64;

        while lost > record.tries {
            lost -= record.tries;
            if record.level <= SkillRecord::STARTING_LEVEL {
                record.level = SkillRecord::STARTING_LEVEL;
                record.tries = 0;
                lost = 0;
                break;
            }
            record.tries = vocation.req_skill_tries(skill, record.level);
            record.level -= 1;
        }
        record.tries = record.tries.saturating_sub(lost);
        record.percent = percent_level(
            record.tries,
            vocation.req_skill_tries(skill, record.level + 1),
        );
    }
}

fn lose_experience(
    character: &mut Character,
    cx: &RuleContext<'_>,
    vocation: Option<&Vocation>,
    loss: f64,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> u32 {
    let amount = (character.progression.experience as f64 * loss) as u64;
    let amount = hooks.adjust_experience_loss(character, amount);
    if amount == 0 {
        return 0;
    }
    let vocationless = vocation.is_none_or(|v| v.id.is_none());
    if vocationless || character.level() > 7 {
        character.progression.experience = character.progression.experience.saturating_sub(amount);
    }

    let from = character.level();
    let lost = drop_levels(character, cx, vocation, false);
    if lost > 0 {
        let to = character.level();
        sink.notify(Notification::text(
            MessageClass::EventAdvance,
            format!("You were downgraded from Level {from} to Level {to}."),
        ));
        sink.notify(Notification::Advance {
            track: Track::Level,
            from,
            to,
        });
        hooks.on_advance(character, Track::Level, from, to);
    }
    lost
}
