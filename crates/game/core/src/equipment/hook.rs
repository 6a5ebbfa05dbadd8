//! Equip and unequip hooks.
//!
//! Hosts plug script callbacks (move events, imbuement toggles, set bonuses)
//! in here. The check methods run before any slot is touched; returning
//! false aborts the move with [`EquipError::HookRejected`](super::EquipError).
//! The notification methods run after the slot array has been updated.

use crate::env::ItemType;
use crate::state::{Character, ItemId, Slot};

pub trait EquipHook {
    /// Whether `item` may be dressed in `slot`.
    fn can_equip(
        &mut self,
        _character: &Character,
        _item: ItemId,
        _item_type: &ItemType,
        _slot: Slot,
    ) -> bool {
        true
    }

    /// Whether `item` may leave `slot`, including when it is displaced by an
    /// exchange.
    fn can_unequip(&mut self, _character: &Character, _item: ItemId, _slot: Slot) -> bool {
        true
    }

    fn on_equip(&mut self, _character: &mut Character, _item: ItemId, _slot: Slot) {}

    fn on_unequip(&mut self, _character: &mut Character, _item: ItemId, _slot: Slot) {}
}

/// Hook that accepts everything and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl EquipHook for NoHooks {}
