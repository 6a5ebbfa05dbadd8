//! Item instances and the arena that owns them.
//!
//! Every item instance lives in exactly one [`ItemArena`] slot. Equipment
//! slots and containers hold [`ItemId`] indices; moving an item moves the
//! index, never the instance. Indices carry a generation so a stale id
//! (item consumed, slot reused) resolves to nothing instead of a wrong item.

use std::fmt;

use crate::env::{ItemOracle, ItemTypeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId {
    index: u32,
    generation: u32,
}

impl ItemId {
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}v{}", self.index, self.generation)
    }
}

/// A concrete item: type, stack count, remaining charges and, for
/// containers, the ids of the items inside.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub type_id: ItemTypeId,
    pub count: u32,
    pub charges: u16,
    pub contents: Vec<ItemId>,
}

impl ItemInstance {
    pub fn new(type_id: ItemTypeId) -> Self {
        Self {
            type_id,
            count: 1,
            charges: 0,
            contents: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_charges(mut self, charges: u16) -> Self {
        self.charges = charges;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
enum Entry {
    Occupied { generation: u32, item: ItemInstance },
    Vacant { generation: u32 },
}

/// Generational arena of item instances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemArena {
    entries: Vec<Entry>,
    free: Vec<u32>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an instance and returns its id.
    pub fn insert(&mut self, item: ItemInstance) -> ItemId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.entries[index as usize];
            let generation = match slot {
                Entry::Vacant { generation } => generation.wrapping_add(1),
                Entry::Occupied { generation, .. } => generation.wrapping_add(1),
            };
            *slot = Entry::Occupied { generation, item };
            return ItemId { index, generation };
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry::Occupied {
            generation: 0,
            item,
        });
        ItemId {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemInstance> {
        match self.entries.get(id.index as usize)? {
            Entry::Occupied { generation, item } if *generation == id.generation => Some(item),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemInstance> {
        match self.entries.get_mut(id.index as usize)? {
            Entry::Occupied { generation, item } if *generation == id.generation => Some(item),
            _ => None,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Removes an item and everything inside it.
    pub fn remove(&mut self, id: ItemId) -> Option<ItemInstance> {
        let entry = self.entries.get_mut(id.index as usize)?;
        let generation = match entry {
            Entry::Occupied { generation, .. } if *generation == id.generation => *generation,
            _ => return None,
        };
        let Entry::Occupied { item, .. } =
            std::mem::replace(entry, Entry::Vacant { generation })
        else {
            return None;
        };
        self.free.push(id.index);
        for child in &item.contents {
            self.remove(*child);
        }
        Some(item)
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Occupied { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight of an item including everything it contains.
    ///
    /// Unknown types weigh nothing.
    pub fn total_weight(&self, id: ItemId, items: &dyn ItemOracle) -> u32 {
        let Some(instance) = self.get(id) else {
            return 0;
        };
        let Some(item_type) = items.item_type(instance.type_id) else {
            return 0;
        };
        let own = if item_type.stackable {
            item_type.weight.saturating_mul(instance.count)
        } else {
            item_type.weight
        };
        instance
            .contents
            .iter()
            .fold(own, |acc, child| acc.saturating_add(self.total_weight(*child, items)))
    }

    /// True if `needle` is `root` or sits somewhere inside it.
    pub fn is_within(&self, root: ItemId, needle: ItemId) -> bool {
        if root == needle {
            return true;
        }
        self.get(root)
            .is_some_and(|item| item.contents.iter().any(|c| self.is_within(*c, needle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ItemCatalog, ItemType};

    #[test]
    fn stale_ids_do_not_resolve_after_reuse() {
        let mut arena = ItemArena::new();
        let first = arena.insert(ItemInstance::new(ItemTypeId(1)));
        arena.remove(first);
        let second = arena.insert(ItemInstance::new(ItemTypeId(2)));

        assert_eq!(first.index(), second.index());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second).map(|i| i.type_id), Some(ItemTypeId(2)));
    }

    #[test]
    fn removing_a_container_removes_contents() {
        let mut arena = ItemArena::new();
        let arrow = arena.insert(ItemInstance::new(ItemTypeId(3447)).with_count(50));
        let mut quiver = ItemInstance::new(ItemTypeId(35562));
        quiver.contents.push(arrow);
        let quiver = arena.insert(quiver);

        assert!(arena.is_within(quiver, arrow));
        arena.remove(quiver);
        assert!(arena.is_empty());
    }

    #[test]
    fn total_weight_scales_stacks_and_adds_contents() {
        let catalog: ItemCatalog = [
            ItemType::new(ItemTypeId(3447), "arrow")
                .with_weight(70)
                .stackable(),
            ItemType::new(ItemTypeId(35562), "quiver")
                .with_weight(1_100)
                .quiver(),
        ]
        .into_iter()
        .collect();

        let mut arena = ItemArena::new();
        let arrows = arena.insert(ItemInstance::new(ItemTypeId(3447)).with_count(10));
        let mut quiver = ItemInstance::new(ItemTypeId(35562));
        quiver.contents.push(arrows);
        let quiver = arena.insert(quiver);

        // 1100 + 70 * 10
        assert_eq!(arena.total_weight(quiver, &catalog), 1_800);
    }
}
