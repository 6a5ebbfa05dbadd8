//! Item catalog loader.

use std::collections::HashSet;
use std::path::Path;

use character_core::{ItemCatalog, ItemType};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    pub items: Vec<ItemType>,
}

/// Loader for item types from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item types from a RON file.
    ///
    /// Duplicate ids are rejected rather than silently replaced.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse item catalog RON {}: {}", path.display(), e)
        })
    }

    /// Parse item types from RON text.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let file: ItemFile = ron::from_str(content)?;

        let mut seen = HashSet::new();
        for item in &file.items {
            if !seen.insert(item.id) {
                anyhow::bail!("duplicate item type {:?} ({})", item.id, item.name);
            }
        }

        // quivers hold ammunition like any other container
        Ok(file
            .items
            .into_iter()
            .map(|mut item| {
                item.container |= item.quiver;
                item
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use character_core::{ItemOracle, ItemTypeId};
    use character_core::env::{SlotPositions, WeaponType};

    use super::*;

    #[test]
    fn parses_slot_flags_and_weapon_types() {
        let catalog = ItemLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (
                items: [
                    (
                        id: 3281,
                        name: "giant sword",
                        weight: 18000,
                        weapon_type: sword,
                        slot_positions: "LEFT | RIGHT | TWO_HAND",
                        defense: 22,
                    ),
                ],
            )
            "#,
        )
        .unwrap();

        let sword = catalog.item_type(ItemTypeId(3281)).unwrap();
        assert_eq!(sword.weapon_type, WeaponType::Sword);
        assert!(sword.is_two_handed());
        assert!(sword.slot_positions.contains(SlotPositions::HAND));
        assert!(sword.pickupable);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ItemLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (items: [(id: 1, name: "a"), (id: 1, name: "b")])
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate item type"));
    }

    #[test]
    fn quivers_are_containers() {
        let catalog = ItemLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (items: [(id: 35562, name: "quiver", slot_positions: "RIGHT", quiver: true)])
            "#,
        )
        .unwrap();
        assert!(catalog.item_type(ItemTypeId(35562)).unwrap().container);
    }
}
