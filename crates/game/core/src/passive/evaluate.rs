//! Periodic passive evaluations.
//!
//! Each function recomputes the major stats one passive controls from the
//! live combat state and writes them through `set_major`, so re-running with
//! unchanged inputs changes nothing. The return value tells whether any
//! stat moved.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::context::RuleContext;
use crate::env::{AmmoType, CreatureKind, ItemTypeId, WorldOracle, ZoneType};
use crate::state::{Character, ItemArena, MajorStat, PassiveKind, Position};
use crate::stats::attack_weapon;

/// Creatures counted before the Battle Instinct scan stops.
const BATTLE_INSTINCT_CAP: u16 = 8;
/// Creatures needed before Battle Instinct grants anything.
const BATTLE_INSTINCT_THRESHOLD: u16 = 5;

/// Picks the value for a passive stage (1..=3). Stage 0 grants nothing.
pub(crate) fn by_stage(stage: u8, values: [i32; 3]) -> i32 {
    match stage {
        0 => 0,
        1 => values[0],
        2 => values[1],
        _ => values[2],
    }
}

pub(crate) fn world<'a>(character: &Character, cx: &RuleContext<'a>) -> Option<&'a dyn WorldOracle> {
    match cx.env.world() {
        Ok(world) => Some(world),
        Err(error) => {
            warn!(character = %character.id, %error, "passive evaluation without world view");
            None
        }
    }
}

pub(crate) fn zone(character: &Character, cx: &RuleContext<'_>) -> ZoneType {
    world(character, cx).map_or(ZoneType::Normal, |world| world.zone(character.position))
}

/// The 3×3 block centred on `center`, centre included.
fn area(center: Position) -> ArrayVec<Position, 9> {
    (-1..=1)
        .flat_map(|dx| (-1..=1).map(move |dy| center.offset(dx, dy)))
        .collect()
}

/// Dispatches one periodic passive.
pub(crate) fn evaluate(
    kind: PassiveKind,
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
) -> bool {
    match kind {
        PassiveKind::BattleInstinct => battle_instinct(character, cx),
        PassiveKind::PositionalTactics => positional_tactics(character, cx),
        PassiveKind::BallisticMastery => ballistic_mastery(character, arena, cx),
        PassiveKind::CombatMastery => combat_mastery(character, arena, cx),
        PassiveKind::DivineEmpowerment => divine_empowerment(character, cx),
        _ => false,
    }
}

/// Melee and shield bonus for being surrounded.
pub fn battle_instinct(character: &mut Character, cx: &RuleContext<'_>) -> bool {
    let Some(world) = world(character, cx) else {
        return false;
    };
    let mut nearby: u16 = 0;
    for tile in area(character.position) {
        if nearby >= BATTLE_INSTINCT_CAP {
            break;
        }
        let Some(creature) = world.top_visible_creature(tile) else {
            continue;
        };
        if creature.id == character.id || creature.is_summon_of(character.id) {
            continue;
        }
        nearby += 1;
    }

    let passives = &mut character.passives;
    passives.creatures_nearby = 0;
    let (melee, shield) = if nearby >= BATTLE_INSTINCT_THRESHOLD {
        passives.creatures_nearby = nearby;
        let extra = i32::from(nearby - (BATTLE_INSTINCT_THRESHOLD - 1));
        (extra, 6 * extra)
    } else {
        (0, 0)
    };
    let mut changed = passives.set_major(MajorStat::Melee, melee);
    changed |= passives.set_major(MajorStat::Shield, shield);
    changed
}

/// Distance bonus with no monster adjacent, magic bonus otherwise.
pub fn positional_tactics(character: &mut Character, cx: &RuleContext<'_>) -> bool {
    let Some(world) = world(character, cx) else {
        return false;
    };
    let engaged = area(character.position).into_iter().any(|tile| {
        world.top_visible_creature(tile).is_some_and(|creature| {
            creature.id != character.id
                && creature.kind == CreatureKind::Monster
                && !creature.master.is_some_and(|m| m.is_player)
        })
    });

    let (distance, magic) = if engaged { (0, 3) } else { (3, 0) };
    let passives = &mut character.passives;
    let mut changed = passives.set_major(MajorStat::Distance, distance);
    changed |= passives.set_major(MajorStat::Magic, magic);
    changed
}

/// Critical damage with bolts, physical and holy damage with arrows.
pub fn ballistic_mastery(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
) -> bool {
    let ammo = attack_weapon(character, arena, &cx.env, false)
        .map_or(AmmoType::None, |weapon| weapon.item_type.ammo_type);
    let (critical, physical, holy) = match ammo {
        AmmoType::Bolt => (10, 0, 0),
        AmmoType::Arrow => (0, 2, 2),
        _ => (0, 0, 0),
    };
    let passives = &mut character.passives;
    let mut changed = passives.set_major(MajorStat::CriticalDamage, critical);
    changed |= passives.set_major(MajorStat::PhysicalDamage, physical);
    changed |= passives.set_major(MajorStat::HolyDamage, holy);
    changed
}

/// Critical damage with two-handed weapons, shield defense otherwise.
pub fn combat_mastery(character: &mut Character, arena: &ItemArena, cx: &RuleContext<'_>) -> bool {
    let two_handed = attack_weapon(character, arena, &cx.env, true)
        .is_some_and(|weapon| weapon.item_type.is_two_handed());
    let stage = character.passives.stage(PassiveKind::CombatMastery);
    let (critical, defense) = if two_handed {
        (by_stage(stage, [4, 8, 12]), 0)
    } else {
        (0, by_stage(stage, [10, 20, 30]))
    };
    let passives = &mut character.passives;
    let mut changed = passives.set_major(MajorStat::MasteryCriticalDamage, critical);
    changed |= passives.set_major(MajorStat::Defense, defense);
    changed
}

/// Damage bonus while standing on an empowerment field.
pub fn divine_empowerment(character: &mut Character, cx: &RuleContext<'_>) -> bool {
    let empowered = cx.config.divine_empowerment_item.is_some_and(|item| {
        world(character, cx)
            .is_some_and(|world| world.tile_item_count(character.position, ItemTypeId(item)) > 0)
    });
    let damage = if empowered {
        by_stage(
            character.passives.stage(PassiveKind::DivineEmpowerment),
            [8, 10, 12],
        )
    } else {
        0
    };
    character.passives.set_major(MajorStat::Damage, damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::env::CreatureView;
    use crate::state::{CreatureId, Slot, Timestamp};
    use crate::testing::*;

    const NOW: Timestamp = Timestamp(10_000);

    fn surround(fx: &mut Fixture, count: usize) {
        for (i, tile) in HOME.neighbors().take(count).enumerate() {
            fx.world
                .place(tile, CreatureView::monster(CreatureId(100 + i as u32)));
        }
    }

    #[test]
    fn battle_instinct_needs_five_neighbors() {
        let mut fx = Fixture::new();
        let mut character = knight();
        surround(&mut fx, 4);

        assert!(!battle_instinct(&mut character, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::Melee), 0);

        surround(&mut fx, 5);
        assert!(battle_instinct(&mut character, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::Melee), 1);
        assert_eq!(character.passives.major(MajorStat::Shield), 6);
        assert_eq!(character.passives.creatures_nearby, 5);

        // same inputs, nothing moves
        assert!(!battle_instinct(&mut character, &fx.cx(NOW)));
    }

    #[test]
    fn battle_instinct_ignores_self_and_own_summons() {
        let mut fx = Fixture::new();
        let mut character = knight();
        surround(&mut fx, 4);
        fx.world.place(HOME, CreatureView::player(character.id));
        let last = HOME.offset(1, 1);
        fx.world.place(
            last,
            CreatureView::monster(CreatureId(50)).summoned_by(character.id, true),
        );

        battle_instinct(&mut character, &fx.cx(NOW));
        assert_eq!(character.passives.major(MajorStat::Melee), 0);
    }

    #[test]
    fn battle_instinct_caps_at_eight() {
        let mut fx = Fixture::new();
        let mut character = knight();
        character.id = CreatureId(999);
        surround(&mut fx, 8);
        fx.world.place(HOME, CreatureView::monster(CreatureId(42)));

        battle_instinct(&mut character, &fx.cx(NOW));
        assert_eq!(character.passives.major(MajorStat::Melee), 4);
        assert_eq!(character.passives.major(MajorStat::Shield), 24);
    }

    #[test]
    fn positional_tactics_swaps_distance_for_magic() {
        let mut fx = Fixture::new();
        let mut character = knight();

        positional_tactics(&mut character, &fx.cx(NOW));
        assert_eq!(character.passives.major(MajorStat::Distance), 3);
        assert_eq!(character.passives.major(MajorStat::Magic), 0);

        fx.world.place(
            HOME.offset(0, 1),
            CreatureView::monster(CreatureId(7)).summoned_by(CreatureId(8), true),
        );
        positional_tactics(&mut character, &fx.cx(NOW));
        assert_eq!(character.passives.major(MajorStat::Distance), 3);

        fx.world
            .place(HOME.offset(1, 0), CreatureView::monster(CreatureId(9)));
        positional_tactics(&mut character, &fx.cx(NOW));
        assert_eq!(character.passives.major(MajorStat::Distance), 0);
        assert_eq!(character.passives.major(MajorStat::Magic), 3);
    }

    #[test]
    fn ballistic_mastery_follows_loaded_ammo() {
        let mut fx = Fixture::new();
        let mut character = knight();
        fx.wear(&mut character, Slot::Left, CROSSBOW);
        let quiver = fx.wear(&mut character, Slot::Right, QUIVER);
        let bolts = fx.spawn_stack(BOLT, 10);
        fx.stow(quiver, bolts);

        assert!(ballistic_mastery(&mut character, &fx.arena, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::CriticalDamage), 10);

        let mut archer = knight();
        fx.wear(&mut archer, Slot::Left, BOW);
        let quiver = fx.wear(&mut archer, Slot::Right, QUIVER);
        let arrows = fx.spawn_stack(ARROW, 10);
        fx.stow(quiver, arrows);

        ballistic_mastery(&mut archer, &fx.arena, &fx.cx(NOW));
        assert_eq!(archer.passives.major(MajorStat::CriticalDamage), 0);
        assert_eq!(archer.passives.major(MajorStat::PhysicalDamage), 2);
        assert_eq!(archer.passives.major(MajorStat::HolyDamage), 2);
    }

    #[test]
    fn stage_zero_combat_mastery_grants_nothing() {
        let mut fx = Fixture::new();
        let mut character = knight();
        character.passives.unlock(PassiveKind::CombatMastery, 0);

        assert!(!combat_mastery(&mut character, &fx.arena, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::Defense), 0);

        fx.wear(&mut character, Slot::Left, GIANT_SWORD);
        assert!(!combat_mastery(&mut character, &fx.arena, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::MasteryCriticalDamage), 0);
    }

    #[test]
    fn combat_mastery_is_idempotent() {
        let mut fx = Fixture::new();
        let mut character = knight();
        character.passives.unlock(PassiveKind::CombatMastery, 2);
        fx.wear(&mut character, Slot::Left, GIANT_SWORD);

        assert!(combat_mastery(&mut character, &fx.arena, &fx.cx(NOW)));
        assert_eq!(
            character.passives.major(MajorStat::MasteryCriticalDamage),
            8
        );
        assert!(!combat_mastery(&mut character, &fx.arena, &fx.cx(NOW)));

        character.equipment.take(Slot::Left);
        assert!(combat_mastery(&mut character, &fx.arena, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::MasteryCriticalDamage), 0);
        assert_eq!(character.passives.major(MajorStat::Defense), 20);
    }

    #[test]
    fn divine_empowerment_decays_off_the_field() {
        let mut fx = Fixture::new();
        fx.config = GameConfig {
            divine_empowerment_item: Some(EMPOWERMENT_FIELD.0),
            ..GameConfig::default()
        };
        let mut character = knight();
        character.passives.unlock(PassiveKind::DivineEmpowerment, 3);
        fx.world.ground.insert((HOME, EMPOWERMENT_FIELD), 1);

        assert!(divine_empowerment(&mut character, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::Damage), 12);

        fx.world.ground.clear();
        assert!(divine_empowerment(&mut character, &fx.cx(NOW)));
        assert_eq!(character.passives.major(MajorStat::Damage), 0);
    }

    #[test]
    fn stage_values_clamp_to_known_stages() {
        assert_eq!(by_stage(0, [1, 2, 3]), 0);
        assert_eq!(by_stage(1, [1, 2, 3]), 1);
        assert_eq!(by_stage(2, [1, 2, 3]), 2);
        assert_eq!(by_stage(9, [1, 2, 3]), 3);
    }
}
