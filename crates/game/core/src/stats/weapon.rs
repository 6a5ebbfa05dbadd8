//! Hand-slot lookups shared by the calculator, the overlay and the resolver.

use tracing::warn;

use crate::env::{GameEnv, ItemType, WeaponType};
use crate::state::{Character, ItemArena, ItemId, MajorStat, SkillKind, Slot};

/// An equipped item together with its type.
#[derive(Clone, Copy, Debug)]
pub struct Equipped<'a> {
    pub id: ItemId,
    pub slot: Slot,
    pub item_type: &'a ItemType,
}

/// Resolves what sits in `slot`.
///
/// A dangling arena index or an unknown item type is logged and treated as
/// an empty slot.
pub fn equipped<'a>(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'a>,
    slot: Slot,
) -> Option<Equipped<'a>> {
    let id = character.equipment.get(slot)?;
    let Some(instance) = arena.get(id) else {
        warn!(character = %character.id, ?slot, item = %id, "equipped item missing from arena");
        return None;
    };
    match env.item_type(instance.type_id) {
        Ok(item_type) => Some(Equipped { id, slot, item_type }),
        Err(error) => {
            warn!(character = %character.id, ?slot, %error, "equipped item type unavailable");
            None
        }
    }
}

/// Best shield and the weapon held in either hand.
///
/// Scans right then left; the higher-defense shield wins and any other
/// non-empty weapon class counts as the weapon.
pub fn shield_and_weapon<'a>(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'a>,
) -> (Option<Equipped<'a>>, Option<Equipped<'a>>) {
    let mut shield: Option<Equipped<'a>> = None;
    let mut weapon = None;
    for slot in [Slot::Right, Slot::Left] {
        let Some(item) = equipped(character, arena, env, slot) else {
            continue;
        };
        match item.item_type.weapon_type {
            WeaponType::None => {}
            WeaponType::Shield => {
                if shield.is_none_or(|s| item.item_type.defense > s.item_type.defense) {
                    shield = Some(item);
                }
            }
            _ => weapon = Some(item),
        }
    }
    (shield, weapon)
}

/// The weapon used for attacking, checked left hand first.
///
/// Distance weapons that fire quiver ammunition resolve to the matching ammo
/// in the right-hand quiver unless `ignore_ammo` is set; without a loaded
/// quiver they resolve to nothing.
pub fn attack_weapon<'a>(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'a>,
    ignore_ammo: bool,
) -> Option<Equipped<'a>> {
    [Slot::Left, Slot::Right]
        .into_iter()
        .find_map(|slot| weapon_in(character, arena, env, slot, ignore_ammo))
}

fn weapon_in<'a>(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'a>,
    slot: Slot,
    ignore_ammo: bool,
) -> Option<Equipped<'a>> {
    let item = equipped(character, arena, env, slot)?;
    if item.item_type.weapon_type.is_off_hand() {
        return None;
    }
    if item.item_type.weapon_type != WeaponType::Distance
        || ignore_ammo
        || !item.item_type.ammo_type.uses_quiver()
    {
        return Some(item);
    }

    let quiver = equipped(character, arena, env, Slot::Right)?;
    if !quiver.item_type.quiver {
        return None;
    }
    let contents = &arena.get(quiver.id)?.contents;
    contents.iter().find_map(|&ammo_id| {
        let ammo = arena.get(ammo_id)?;
        let ammo_type = env.item_type(ammo.type_id).ok()?;
        (ammo_type.ammo_type == item.item_type.ammo_type).then_some(Equipped {
            id: ammo_id,
            slot: Slot::Right,
            item_type: ammo_type,
        })
    })
}

/// Skill level including equipment/condition bonuses and major stats.
pub fn effective_skill(character: &Character, skill: SkillKind) -> u32 {
    let base = character.skill(skill).level as i32;
    let major = match skill {
        SkillKind::Fist | SkillKind::Club | SkillKind::Sword | SkillKind::Axe => {
            character.passives.major(MajorStat::Melee)
        }
        SkillKind::Shield => character.passives.major(MajorStat::Shield),
        SkillKind::Distance => character.passives.major(MajorStat::Distance),
        SkillKind::Fishing => 0,
    };
    character.combat.skill_bonuses[skill as usize].apply(base + major, 0, u16::MAX as i32) as u32
}

/// Magic level including bonuses and the magic major stat.
pub fn effective_magic_level(character: &Character) -> u32 {
    let base = character.progression.magic_level as i32 + character.passives.major(MajorStat::Magic);
    character.combat.magic_bonus.apply(base, 0, u16::MAX as i32) as u32
}

/// Skill trained by attacking with `weapon`; fist fighting when unarmed.
pub fn weapon_skill_kind(weapon: Option<&ItemType>) -> Option<SkillKind> {
    let Some(weapon) = weapon else {
        return Some(SkillKind::Fist);
    };
    match weapon.weapon_type {
        WeaponType::Sword => Some(SkillKind::Sword),
        WeaponType::Club => Some(SkillKind::Club),
        WeaponType::Axe => Some(SkillKind::Axe),
        WeaponType::Distance => Some(SkillKind::Distance),
        _ => None,
    }
}

/// Effective level of the skill used with `weapon`, 0 for weapons without one.
pub fn weapon_skill(character: &Character, weapon: Option<&ItemType>) -> u32 {
    weapon_skill_kind(weapon).map_or(0, |skill| effective_skill(character, skill))
}
