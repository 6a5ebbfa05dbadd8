//! Equipment slot arbitration.
//!
//! [`resolver`] answers whether an item fits a slot (hand exclusivity,
//! two-handed rules, quiver pairing, capacity, stacking). [`transfer`] applies
//! accepted moves and keeps the derived state in step.
mod error;
mod hook;
pub mod resolver;
pub mod transfer;

pub use error::EquipError;
pub use hook::{EquipHook, NoHooks};
pub use resolver::{
    Destination, Placement, has_capacity, is_carried, query_add, query_destination,
    query_max_count, query_remove,
};
pub use transfer::{
    EquipOutcome, EquipRequest, discard_slots, inventory_weight, try_equip, try_unequip,
};
