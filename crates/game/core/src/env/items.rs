use bitflags::bitflags;
use strum::{EnumCount, EnumIter};

use crate::state::Slot;

pub trait ItemOracle: Send + Sync {
    fn item_type(&self, id: ItemTypeId) -> Option<&ItemType>;
}

/// Reference to an item type stored outside the core (lookup via Env).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTypeId(pub u16);

/// Weapon class of an item type. Everything that is not held in a hand is
/// `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeaponType {
    #[default]
    None,
    Sword,
    Club,
    Axe,
    Shield,
    Distance,
    Wand,
    Ammo,
    Missile,
}

impl WeaponType {
    /// Types that never count as "the weapon" when scanning the hands.
    pub const fn is_off_hand(self) -> bool {
        matches!(self, Self::None | Self::Shield | Self::Ammo)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AmmoType {
    #[default]
    None,
    Bolt,
    Arrow,
    Spear,
    ThrowingStar,
    ThrowingKnife,
    Stone,
}

impl AmmoType {
    /// Ammo that is drawn from a quiver rather than thrown from the hand.
    pub const fn uses_quiver(self) -> bool {
        matches!(self, Self::Bolt | Self::Arrow)
    }
}

/// Damage element used for absorption lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatType {
    Physical,
    Energy,
    Earth,
    Fire,
    LifeDrain,
    ManaDrain,
    Healing,
    Drown,
    Ice,
    Holy,
    Death,
}

bitflags! {
    /// Body positions an item type may occupy.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SlotPositions: u16 {
        const HEAD = 1 << 0;
        const NECKLACE = 1 << 1;
        const BACKPACK = 1 << 2;
        const ARMOR = 1 << 3;
        const RIGHT = 1 << 4;
        const LEFT = 1 << 5;
        const LEGS = 1 << 6;
        const FEET = 1 << 7;
        const RING = 1 << 8;
        const AMMO = 1 << 9;
        const TWO_HAND = 1 << 11;
        const HAND = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl SlotPositions {
    /// Position bit matching a body slot.
    pub const fn for_slot(slot: Slot) -> Self {
        match slot {
            Slot::Head => Self::HEAD,
            Slot::Necklace => Self::NECKLACE,
            Slot::Backpack => Self::BACKPACK,
            Slot::Armor => Self::ARMOR,
            Slot::Right => Self::RIGHT,
            Slot::Left => Self::LEFT,
            Slot::Legs => Self::LEGS,
            Slot::Feet => Self::FEET,
            Slot::Ring => Self::RING,
            Slot::Ammo => Self::AMMO,
        }
    }
}

/// Static item type metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: String,
    /// Weight in hundredths of an ounce.
    pub weight: u32,
    pub weapon_type: WeaponType,
    pub ammo_type: AmmoType,
    pub slot_positions: SlotPositions,
    pub armor: i32,
    pub defense: i32,
    pub extra_defense: i32,
    pub stackable: bool,
    pub pickupable: bool,
    pub moveable: bool,
    pub container: bool,
    pub quiver: bool,
    pub spellbook: bool,
    /// Charges a fresh instance starts with; 0 means unlimited use.
    pub charges: u16,
    /// Absorb percent per combat type, indexed by `CombatType as usize`.
    pub absorb_percent: [i16; CombatType::COUNT],
    /// Extra absorb applied only to damage from fields.
    pub field_absorb_percent: [i16; CombatType::COUNT],
}

impl ItemType {
    pub fn new(id: ItemTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_two_handed(&self) -> bool {
        self.slot_positions.contains(SlotPositions::TWO_HAND)
    }

    pub fn is_shield(&self) -> bool {
        self.weapon_type == WeaponType::Shield
    }

    pub fn absorb(&self, combat: CombatType) -> i16 {
        self.absorb_percent[combat as usize]
    }

    pub fn field_absorb(&self, combat: CombatType) -> i16 {
        self.field_absorb_percent[combat as usize]
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_weapon(mut self, weapon_type: WeaponType) -> Self {
        self.weapon_type = weapon_type;
        self
    }

    pub fn with_ammo(mut self, ammo_type: AmmoType) -> Self {
        self.ammo_type = ammo_type;
        self
    }

    pub fn with_slots(mut self, slot_positions: SlotPositions) -> Self {
        self.slot_positions = slot_positions;
        self
    }

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_defense(mut self, defense: i32, extra_defense: i32) -> Self {
        self.defense = defense;
        self.extra_defense = extra_defense;
        self
    }

    pub fn with_absorb(mut self, combat: CombatType, percent: i16) -> Self {
        self.absorb_percent[combat as usize] = percent;
        self
    }

    pub fn with_field_absorb(mut self, combat: CombatType, percent: i16) -> Self {
        self.field_absorb_percent[combat as usize] = percent;
        self
    }

    pub fn with_charges(mut self, charges: u16) -> Self {
        self.charges = charges;
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn container(mut self) -> Self {
        self.container = true;
        self
    }

    pub fn quiver(mut self) -> Self {
        self.quiver = true;
        self.container = true;
        self
    }

    pub fn spellbook(mut self) -> Self {
        self.spellbook = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.moveable = false;
        self.pickupable = false;
        self
    }
}

impl Default for ItemType {
    fn default() -> Self {
        Self {
            id: ItemTypeId(0),
            name: String::new(),
            weight: 0,
            weapon_type: WeaponType::None,
            ammo_type: AmmoType::None,
            slot_positions: SlotPositions::empty(),
            armor: 0,
            defense: 0,
            extra_defense: 0,
            stackable: false,
            pickupable: true,
            moveable: true,
            container: false,
            quiver: false,
            spellbook: false,
            charges: 0,
            absorb_percent: [0; CombatType::COUNT],
            field_absorb_percent: [0; CombatType::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_mask_covers_both_hands() {
        assert!(SlotPositions::HAND.contains(SlotPositions::LEFT));
        assert!(SlotPositions::HAND.contains(SlotPositions::RIGHT));
        assert!(!SlotPositions::HAND.contains(SlotPositions::TWO_HAND));
    }

    #[test]
    fn two_handed_comes_from_slot_bits() {
        let bow = ItemType::new(ItemTypeId(3350), "bow")
            .with_weapon(WeaponType::Distance)
            .with_ammo(AmmoType::Arrow)
            .with_slots(SlotPositions::HAND | SlotPositions::TWO_HAND);
        assert!(bow.is_two_handed());
        assert!(bow.ammo_type.uses_quiver());
        assert!(!bow.weapon_type.is_off_hand());
    }
}
