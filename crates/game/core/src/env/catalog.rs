//! In-memory oracle implementations backed by ordered maps.
//!
//! Content loaders fill these once at startup; the data is immutable while
//! the game runs.

use std::collections::BTreeMap;

use super::{ItemOracle, ItemType, ItemTypeId, Vocation, VocationId, VocationOracle};

/// ItemOracle implementation with static item types.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCatalog {
    types: BTreeMap<ItemTypeId, ItemType>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an item type.
    pub fn insert(&mut self, item: ItemType) {
        self.types.insert(item.id, item);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemType> {
        self.types.values()
    }
}

impl FromIterator<ItemType> for ItemCatalog {
    fn from_iter<T: IntoIterator<Item = ItemType>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for item in iter {
            catalog.insert(item);
        }
        catalog
    }
}

impl ItemOracle for ItemCatalog {
    fn item_type(&self, id: ItemTypeId) -> Option<&ItemType> {
        self.types.get(&id)
    }
}

/// VocationOracle implementation with static vocation data.
///
/// Always contains the starting vocation so low-level gain lookups resolve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VocationTable {
    vocations: BTreeMap<VocationId, Vocation>,
}

impl VocationTable {
    pub fn new() -> Self {
        let mut vocations = BTreeMap::new();
        vocations.insert(VocationId::NONE, Vocation::default());
        Self { vocations }
    }

    /// Adds or replaces a vocation.
    pub fn insert(&mut self, vocation: Vocation) {
        self.vocations.insert(vocation.id, vocation);
    }

    pub fn len(&self) -> usize {
        self.vocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vocation> {
        self.vocations.values()
    }
}

impl Default for VocationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Vocation> for VocationTable {
    fn from_iter<T: IntoIterator<Item = Vocation>>(iter: T) -> Self {
        let mut table = Self::new();
        for vocation in iter {
            table.insert(vocation);
        }
        table
    }
}

impl VocationOracle for VocationTable {
    fn vocation(&self, id: VocationId) -> Option<&Vocation> {
        self.vocations.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocation_table_always_knows_the_starting_vocation() {
        let table: VocationTable = [Vocation::new(VocationId(4), "Knight")]
            .into_iter()
            .collect();
        assert!(table.vocation(VocationId::NONE).is_some());
        assert_eq!(table.vocation(VocationId(4)).map(|v| v.name.as_str()), Some("Knight"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn catalog_replaces_existing_types() {
        let mut catalog = ItemCatalog::new();
        catalog.insert(ItemType::new(ItemTypeId(1), "old"));
        catalog.insert(ItemType::new(ItemTypeId(1), "new"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.item_type(ItemTypeId(1)).map(|t| t.name.as_str()), Some("new"));
    }
}
