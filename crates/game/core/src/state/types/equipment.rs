//! Equipment slots worn by a character.
//!
//! Slots reference items by [`ItemId`]; the instances themselves live in the
//! [`ItemArena`](super::ItemArena). While equipped an item is owned by the
//! character and nothing else may reference it.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use super::ItemId;

/// Logical body slot.
///
/// `Right` is the shield/quiver hand, `Left` the weapon hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Head,
    Necklace,
    Backpack,
    Armor,
    Right,
    Left,
    Legs,
    Feet,
    Ring,
    Ammo,
}

impl Slot {
    /// Slots whose armor value counts toward total armor.
    pub const ARMOR_SLOTS: [Slot; 6] = [
        Slot::Head,
        Slot::Necklace,
        Slot::Armor,
        Slot::Legs,
        Slot::Feet,
        Slot::Ring,
    ];

    pub const fn is_hand(self) -> bool {
        matches!(self, Slot::Right | Slot::Left)
    }

    /// The other hand, if this slot is a hand.
    pub const fn opposite_hand(self) -> Option<Slot> {
        match self {
            Slot::Right => Some(Slot::Left),
            Slot::Left => Some(Slot::Right),
            _ => None,
        }
    }
}

/// Target of an equip request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotTarget {
    Named(Slot),
    /// Let the resolver pick the first slot that accepts the item.
    Wherever,
}

impl From<Slot> for SlotTarget {
    fn from(slot: Slot) -> Self {
        SlotTarget::Named(slot)
    }
}

/// Fixed array of equipment slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: [Option<ItemId>; Slot::COUNT],
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<ItemId> {
        self.slots[slot as usize]
    }

    pub fn is_empty(&self, slot: Slot) -> bool {
        self.slots[slot as usize].is_none()
    }

    /// Places an item, returning whatever occupied the slot before.
    pub fn set(&mut self, slot: Slot, item: ItemId) -> Option<ItemId> {
        self.slots[slot as usize].replace(item)
    }

    pub fn take(&mut self, slot: Slot) -> Option<ItemId> {
        self.slots[slot as usize].take()
    }

    /// Slot currently holding `item`.
    pub fn slot_of(&self, item: ItemId) -> Option<Slot> {
        self.iter()
            .find_map(|(slot, id)| (id == item).then_some(slot))
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, ItemId)> + '_ {
        use strum::IntoEnumIterator;
        Slot::iter().filter_map(|slot| self.get(slot).map(|id| (slot, id)))
    }
}
