//! Death-loss percentages and the unfair-fight reduction.

use crate::config::LossFormula;
use crate::context::RuleContext;
use crate::env::{CreatureView, Vocation};
use crate::state::Character;

/// Level from which the legacy formula switches from a flat 5 %.
const LEGACY_CURVE_LEVEL: u32 = 24;

/// Fraction (0.0..=1.0) of progression lost on death before any reduction.
///
/// Twist of Fate does not count as a blessing here.
pub fn lost_percent(character: &Character, cx: &RuleContext<'_>, vocation: Option<&Vocation>) -> f64 {
    let blessings = character.blessings.regular_count(cx.config.max_blessing);
    let promoted = vocation.is_some_and(Vocation::is_promoted);

    match cx.config.loss_formula {
        LossFormula::Flat(percent) => {
            let percent = percent - if promoted { 3 } else { 0 } - blessings as i32;
            f64::from(percent.max(0)) / 100.0
        }
        LossFormula::Legacy => {
            let level = character.level();
            let base = if level >= LEGACY_CURVE_LEVEL {
                let experience = character.progression.experience;
                if experience == 0 {
                    return 0.0;
                }
                let level = f64::from(level) + character.progression.level_percent / 100.0;
                ((level + 50.0) * 50.0 * (level * level - 5.0 * level + 8.0)) / experience as f64
            } else {
                5.0
            };
            let mut reduction = f64::from(blessings) * 8.0;
            if promoted {
                reduction += 30.0;
            }
            (base * (1.0 - reduction / 100.0) / 100.0).max(0.0)
        }
    }
}

/// Who took part in the fight that killed the character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FightAssessment {
    pub pvp_death: bool,
    /// Percent of the normal loss applied, 100 for a fair fight.
    pub unfair_fight_reduction: u8,
}

/// Splits recent damage into player and other sources.
///
/// Damage older than `in_fight_window_ms` is ignored. A death counts as PvP
/// when the last hit is player-controlled or players dealt at least
/// `pvp_damage_share` of the damage; a PvP death against a group whose
/// levels outweigh the victim's is reduced, never below the configured
/// floor.
pub fn assess_fight(
    character: &Character,
    cx: &RuleContext<'_>,
    killer: Option<&CreatureView>,
) -> FightAssessment {
    let world = cx.env.world().ok();
    let window = cx.config.in_fight_window_ms;
    let mut player_damage: u64 = 0;
    let mut other_damage: u64 = 0;
    let mut level_sum: u64 = 0;

    for (attacker, record) in &character.combat.damage_map {
        if cx.now.since(record.last_hit) > window {
            continue;
        }
        match world.and_then(|world| world.player_level(*attacker)) {
            Some(level) => {
                player_damage += record.total;
                level_sum += u64::from(level);
            }
            None => other_damage += record.total,
        }
    }

    let total = player_damage + other_damage;
    let pvp_death = total > 0
        && (killer.is_some_and(CreatureView::is_player_controlled)
            || player_damage as f64 / total as f64 >= cx.config.pvp_damage_share);

    let level = u64::from(character.level());
    let unfair_fight_reduction = if pvp_death && level_sum > level {
        let share = (level as f64 / level_sum as f64 * 100.0).round() as u32;
        share.max(cx.config.unfair_fight_floor).min(100) as u8
    } else {
        100
    };

    FightAssessment {
        pvp_death,
        unfair_fight_reduction,
    }
}
