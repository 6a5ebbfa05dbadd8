//! Sparse in-memory world view.

use std::collections::HashMap;

use character_core::{CreatureId, CreatureView, ItemTypeId, Position, WorldOracle, ZoneType};
use serde::{Deserialize, Serialize};

/// Tiles the rules can query: creatures, ground items, zones and the levels
/// of online players. Unset tiles are empty normal-zone ground.
#[derive(Clone, Debug, Default)]
pub struct GridWorld {
    creatures: HashMap<Position, CreatureView>,
    ground: HashMap<(Position, ItemTypeId), u32>,
    zones: HashMap<Position, ZoneType>,
    levels: HashMap<CreatureId, u32>,
}

/// One change to the world, applied by the simulation worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEdit {
    /// Places a creature on top of a tile; `level` marks an online player.
    PlaceCreature {
        at: Position,
        creature: CreatureView,
        level: Option<u32>,
    },
    ClearTile {
        at: Position,
    },
    SetZone {
        at: Position,
        zone: ZoneType,
    },
    SetGroundItems {
        at: Position,
        item: ItemTypeId,
        count: u32,
    },
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, edit: WorldEdit) {
        match edit {
            WorldEdit::PlaceCreature {
                at,
                creature,
                level,
            } => {
                if let Some(level) = level {
                    self.levels.insert(creature.id, level);
                }
                self.creatures.insert(at, creature);
            }
            WorldEdit::ClearTile { at } => {
                if let Some(creature) = self.creatures.remove(&at) {
                    self.levels.remove(&creature.id);
                }
            }
            WorldEdit::SetZone { at, zone } => {
                if zone == ZoneType::Normal {
                    self.zones.remove(&at);
                } else {
                    self.zones.insert(at, zone);
                }
            }
            WorldEdit::SetGroundItems { at, item, count } => {
                if count == 0 {
                    self.ground.remove(&(at, item));
                } else {
                    self.ground.insert((at, item), count);
                }
            }
        }
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }
}

impl WorldOracle for GridWorld {
    fn top_visible_creature(&self, at: Position) -> Option<CreatureView> {
        self.creatures.get(&at).copied()
    }

    fn tile_item_count(&self, at: Position, item: ItemTypeId) -> u32 {
        self.ground.get(&(at, item)).copied().unwrap_or(0)
    }

    fn zone(&self, at: Position) -> ZoneType {
        self.zones.get(&at).copied().unwrap_or_default()
    }

    fn player_level(&self, id: CreatureId) -> Option<u32> {
        self.levels.get(&id).copied()
    }
}
