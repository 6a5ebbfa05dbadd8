//! Slot arbitration queries.
//!
//! These functions never mutate; [`try_equip`](super::try_equip) and
//! [`try_unequip`](super::try_unequip) run them before touching anything.

use std::collections::VecDeque;

use strum::IntoEnumIterator;
use tracing::warn;

use crate::config::GameConfig;
use crate::context::RuleContext;
use crate::env::{AmmoType, GameEnv, ItemType, SlotPositions, WeaponType};
use crate::state::{Character, CharacterFlags, ItemArena, ItemId, ItemInstance, Slot, SlotTarget};

use super::EquipError;

/// Where an accepted item ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The slot is free or holds a stack the item merges into.
    Accepted(Slot),
    /// The slot holds something else that has to move out first.
    NeedsExchange { slot: Slot, displaced: ItemId },
    /// No slot fits; the item goes into a carried container.
    Stored { container: ItemId },
}

impl Placement {
    pub fn slot(self) -> Option<Slot> {
        match self {
            Placement::Accepted(slot) | Placement::NeedsExchange { slot, .. } => Some(slot),
            Placement::Stored { .. } => None,
        }
    }
}

/// First place an item would land when dropped on the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Slot(Slot),
    Container(ItemId),
}

const BODY_POSITIONS: SlotPositions = SlotPositions::HEAD
    .union(SlotPositions::NECKLACE)
    .union(SlotPositions::BACKPACK)
    .union(SlotPositions::ARMOR)
    .union(SlotPositions::LEGS)
    .union(SlotPositions::FEET)
    .union(SlotPositions::RING);

fn lookup<'i, 'a>(
    arena: &'i ItemArena,
    env: &GameEnv<'a>,
    item: ItemId,
) -> Result<(&'i ItemInstance, &'a ItemType), EquipError> {
    let instance = arena.get(item).ok_or(EquipError::NotPossible)?;
    match env.item_type(instance.type_id) {
        Ok(item_type) => Ok((instance, item_type)),
        Err(error) => {
            warn!(%item, %error, "cannot place item with unknown type");
            Err(EquipError::NotPossible)
        }
    }
}

/// Checks whether `count` of `item` may go to `target`.
///
/// `SlotTarget::Wherever` resolves through [`query_destination`] and fails
/// with `NotEnoughRoom` when nothing fits.
pub fn query_add(
    character: &Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    item: ItemId,
    target: SlotTarget,
    count: u32,
) -> Result<Placement, EquipError> {
    let (instance, item_type) = lookup(arena, &cx.env, item)?;
    if !item_type.pickupable {
        return Err(EquipError::CannotPickup);
    }

    let slot = match target {
        SlotTarget::Named(slot) => slot,
        SlotTarget::Wherever => {
            return match query_destination(character, arena, cx, item) {
                Some(Destination::Slot(slot)) => {
                    query_add(character, arena, cx, item, SlotTarget::Named(slot), count)
                }
                Some(Destination::Container(container)) => {
                    if has_capacity(character, arena, &cx.env, item, count, 0) {
                        Ok(Placement::Stored { container })
                    } else {
                        Err(EquipError::NotEnoughCapacity)
                    }
                }
                None => Err(EquipError::NotEnoughRoom),
            };
        }
    };

    check_slot(character, arena, cx.env, cx.config, slot, item, instance, item_type, count)?;

    let mut displaced_weight = 0;
    let mut placement = Placement::Accepted(slot);
    if let Some(occupant) = character.equipment.get(slot)
        && occupant != item
    {
        let merges = item_type.stackable
            && arena
                .get(occupant)
                .is_some_and(|o| o.type_id == instance.type_id);
        if !merges {
            let items = cx.env.items().ok();
            displaced_weight = items.map_or(0, |items| arena.total_weight(occupant, items));
            placement = Placement::NeedsExchange {
                slot,
                displaced: occupant,
            };
        }
    }

    if !has_capacity(character, arena, &cx.env, item, count, displaced_weight) {
        return Err(EquipError::NotEnoughCapacity);
    }
    Ok(placement)
}

#[allow(clippy::too_many_arguments)]
fn check_slot(
    character: &Character,
    arena: &ItemArena,
    env: GameEnv<'_>,
    config: &GameConfig,
    slot: Slot,
    item: ItemId,
    instance: &ItemInstance,
    item_type: &ItemType,
    count: u32,
) -> Result<(), EquipError> {
    let positions = item_type.slot_positions;
    let classic = config.classic_equipment_slots;

    let rejection = if positions.intersects(BODY_POSITIONS) {
        EquipError::CannotBeDressed
    } else if positions.contains(SlotPositions::TWO_HAND) {
        EquipError::PutThisObjectInBothHands
    } else if positions.intersects(SlotPositions::HAND) && classic {
        EquipError::PutThisObjectInYourHand
    } else {
        EquipError::CannotBeDressed
    };

    match slot {
        Slot::Ammo if positions.contains(SlotPositions::AMMO) || classic => Ok(()),
        Slot::Right | Slot::Left if positions.contains(SlotPositions::for_slot(slot)) => {
            let other = slot
                .opposite_hand()
                .and_then(|hand| character.equipment.get(hand));
            if classic {
                classic_hand(arena, env, item, instance, item_type, other, count)
            } else {
                modern_hand(arena, env, item, slot, item_type, other)
            }
        }
        Slot::Ammo | Slot::Right | Slot::Left => Err(rejection),
        _ if positions.contains(SlotPositions::for_slot(slot)) => Ok(()),
        _ => Err(rejection),
    }
}

fn classic_hand(
    arena: &ItemArena,
    env: GameEnv<'_>,
    item: ItemId,
    instance: &ItemInstance,
    item_type: &ItemType,
    other: Option<ItemId>,
    count: u32,
) -> Result<(), EquipError> {
    let Some(other) = other else {
        return Ok(());
    };
    if item_type.is_two_handed() {
        return if other == item {
            Ok(())
        } else {
            Err(EquipError::BothHandsNeedToBeFree)
        };
    }

    let other_type = lookup(arena, &env, other).ok().map(|(_, t)| t);
    let other_weapon = other_type.map_or(WeaponType::None, |t| t.weapon_type);
    if other_type.is_some_and(ItemType::is_two_handed) {
        Err(EquipError::DropTwoHandedItem)
    } else if other == item && count == instance.count {
        Ok(())
    } else if other_weapon == WeaponType::Shield && item_type.weapon_type == WeaponType::Shield {
        Err(EquipError::CanOnlyUseOneShield)
    } else if other_weapon.is_off_hand() || item_type.weapon_type.is_off_hand() {
        Ok(())
    } else {
        Err(EquipError::CanOnlyUseOneWeapon)
    }
}

/// Right hand takes shields and quivers, left hand takes weapons; a distance
/// weapon may share the hands with a quiver holding its ammunition.
fn modern_hand(
    arena: &ItemArena,
    env: GameEnv<'_>,
    item: ItemId,
    slot: Slot,
    item_type: &ItemType,
    other: Option<ItemId>,
) -> Result<(), EquipError> {
    if slot == Slot::Right {
        if !item_type.is_shield() && !item_type.quiver {
            return Err(EquipError::CannotBeDressed);
        }
        let Some(left) = other else {
            return Ok(());
        };
        let Ok((_, left_type)) = lookup(arena, &env, left) else {
            return Ok(());
        };
        if !left_type.is_two_handed() && !item_type.is_two_handed() {
            return Ok(());
        }
        let pairs = item_type.quiver
            && left_type.weapon_type == WeaponType::Distance
            && quiver_holds_only(arena, env, item, left_type.ammo_type);
        return if pairs {
            Ok(())
        } else {
            Err(EquipError::BothHandsNeedToBeFree)
        };
    }

    if item_type.weapon_type.is_off_hand() {
        return Err(EquipError::CannotBeDressed);
    }
    let Some(right) = other else {
        return Ok(());
    };
    if !item_type.is_two_handed() {
        return Ok(());
    }
    let pairs = item_type.weapon_type == WeaponType::Distance
        && lookup(arena, &env, right).is_ok_and(|(_, right_type)| right_type.quiver)
        && quiver_holds_only(arena, env, right, item_type.ammo_type);
    if pairs {
        Ok(())
    } else {
        Err(EquipError::BothHandsNeedToBeFree)
    }
}

/// True when every piece of ammunition in `quiver` matches `ammo`.
fn quiver_holds_only(arena: &ItemArena, env: GameEnv<'_>, quiver: ItemId, ammo: AmmoType) -> bool {
    let Some(quiver) = arena.get(quiver) else {
        return false;
    };
    quiver.contents.iter().all(|&id| {
        lookup(arena, &env, id).map_or(true, |(_, t)| {
            t.ammo_type == AmmoType::None || t.ammo_type == ammo
        })
    })
}

/// True when `item` is equipped or sits inside something equipped.
pub fn is_carried(character: &Character, arena: &ItemArena, item: ItemId) -> bool {
    character
        .equipment
        .iter()
        .any(|(_, root)| arena.is_within(root, item))
}

/// Whether the character can carry `count` of `item` once `freed` weight
/// leaves the inventory.
pub fn has_capacity(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'_>,
    item: ItemId,
    count: u32,
    freed: u32,
) -> bool {
    if character.flags.contains(CharacterFlags::CANNOT_PICKUP_ITEMS) {
        return false;
    }
    if character.flags.contains(CharacterFlags::HAS_INFINITE_CAPACITY)
        || is_carried(character, arena, item)
    {
        return true;
    }
    let Ok((instance, item_type)) = lookup(arena, env, item) else {
        return false;
    };
    let weight = if item_type.container {
        env.items()
            .map_or(item_type.weight, |items| arena.total_weight(item, items))
    } else if item_type.stackable {
        item_type.weight.saturating_mul(count.min(instance.count))
    } else {
        item_type.weight
    };
    weight <= character.free_capacity().saturating_add(freed)
}

/// How many of `item` fit at `target`.
///
/// # Errors
///
/// `NotEnoughRoom` when fewer than `count` fit, `NotPossible` for unknown
/// items.
pub fn query_max_count(
    character: &Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    item: ItemId,
    target: SlotTarget,
    count: u32,
) -> Result<u32, EquipError> {
    let (instance, item_type) = lookup(arena, &cx.env, item)?;
    let stack = GameConfig::MAX_STACK;
    let accepts = |slot: Slot, count: u32| {
        matches!(
            query_add(character, arena, cx, item, SlotTarget::Named(slot), count),
            Ok(Placement::Accepted(_))
        )
    };
    let room_in = |slot: Slot| -> Option<u32> {
        let occupant = character.equipment.get(slot)?;
        let existing = arena.get(occupant)?;
        (occupant != item
            && item_type.stackable
            && existing.type_id == instance.type_id
            && existing.count < stack)
            .then(|| stack - existing.count)
    };
    let empty_room = if item_type.stackable { stack } else { 1 };

    let max = match target {
        SlotTarget::Wherever => Slot::iter()
            .map(|slot| match character.equipment.get(slot) {
                Some(_) => room_in(slot)
                    .filter(|&remainder| accepts(slot, remainder))
                    .unwrap_or(0),
                None if accepts(slot, instance.count) => empty_room,
                None => 0,
            })
            .sum::<u32>(),
        SlotTarget::Named(slot) => match character.equipment.get(slot) {
            Some(_) => room_in(slot).unwrap_or(0),
            None if accepts(slot, count) => empty_room,
            None => 0,
        },
    };

    if max < count {
        Err(EquipError::NotEnoughRoom)
    } else {
        Ok(max)
    }
}

/// Checks whether `count` of an equipped `item` may be taken off.
pub fn query_remove(
    character: &Character,
    arena: &ItemArena,
    env: &GameEnv<'_>,
    item: ItemId,
    count: u32,
) -> Result<(), EquipError> {
    if character.equipment.slot_of(item).is_none() {
        return Err(EquipError::NotPossible);
    }
    let (instance, item_type) = lookup(arena, env, item)?;
    if count == 0 || (item_type.stackable && count > instance.count) {
        return Err(EquipError::NotPossible);
    }
    if !item_type.moveable {
        return Err(EquipError::NotMoveable);
    }
    Ok(())
}

/// Finds where `item` lands when dropped on the character.
///
/// Stackable items prefer an equipped stack with room, then any free slot
/// that accepts them; otherwise the first carried container, searched
/// breadth first, wins.
pub fn query_destination(
    character: &Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    item: ItemId,
) -> Option<Destination> {
    let (instance, item_type) = lookup(arena, &cx.env, item).ok()?;
    let accepts = |slot: Slot| {
        matches!(
            query_add(character, arena, cx, item, SlotTarget::Named(slot), instance.count),
            Ok(Placement::Accepted(_))
        )
    };

    let mut containers = VecDeque::new();
    for slot in Slot::iter() {
        let Some(occupant) = character.equipment.get(slot) else {
            if accepts(slot) {
                return Some(Destination::Slot(slot));
            }
            continue;
        };
        if occupant == item {
            continue;
        }
        let Some(existing) = arena.get(occupant) else {
            continue;
        };
        if item_type.stackable
            && existing.type_id == instance.type_id
            && existing.count < GameConfig::MAX_STACK
            && accepts(slot)
        {
            return Some(Destination::Slot(slot));
        }
        if is_container(arena, cx.env, occupant) {
            containers.push_back(occupant);
        }
    }

    let mut first_free = None;
    while let Some(container) = containers.pop_front() {
        if arena.is_within(item, container) {
            continue;
        }
        first_free.get_or_insert(container);
        let Some(bag) = arena.get(container) else {
            continue;
        };
        for &child in &bag.contents {
            let Some(content) = arena.get(child) else {
                continue;
            };
            if item_type.stackable
                && child != item
                && content.type_id == instance.type_id
                && content.count < GameConfig::MAX_STACK
            {
                return Some(Destination::Container(container));
            }
            if is_container(arena, cx.env, child) {
                containers.push_back(child);
            }
        }
        if !item_type.stackable {
            break;
        }
    }
    first_free.map(Destination::Container)
}

fn is_container(arena: &ItemArena, env: GameEnv<'_>, item: ItemId) -> bool {
    lookup(arena, &env, item).is_ok_and(|(_, t)| t.container)
}
