use crate::state::{CreatureId, Position};

use super::ItemTypeId;

/// Read-only view of the world around a character.
///
/// Implementations answer from a point-in-time snapshot; the core never
/// mutates the world through this trait.
pub trait WorldOracle: Send + Sync {
    /// Topmost creature visible on a tile, if any.
    fn top_visible_creature(&self, at: Position) -> Option<CreatureView>;

    /// Number of items of the given type lying on a tile.
    fn tile_item_count(&self, at: Position, item: ItemTypeId) -> u32;

    fn zone(&self, at: Position) -> ZoneType;

    /// Level of an online character, `None` for anything that is not one.
    fn player_level(&self, id: CreatureId) -> Option<u32>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CreatureKind {
    Player,
    Monster,
    Npc,
}

/// Creature as seen from a neighboring tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureView {
    pub id: CreatureId,
    pub kind: CreatureKind,
    /// Owner when the creature is a summon.
    pub master: Option<Summoner>,
    /// Bestiary race, used for charm-rune blessing checks.
    pub race_id: Option<u16>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summoner {
    pub id: CreatureId,
    pub is_player: bool,
}

impl CreatureView {
    pub fn player(id: CreatureId) -> Self {
        Self {
            id,
            kind: CreatureKind::Player,
            master: None,
            race_id: None,
        }
    }

    pub fn monster(id: CreatureId) -> Self {
        Self {
            id,
            kind: CreatureKind::Monster,
            master: None,
            race_id: None,
        }
    }

    pub fn summoned_by(mut self, master: CreatureId, is_player: bool) -> Self {
        self.master = Some(Summoner {
            id: master,
            is_player,
        });
        self
    }

    pub fn with_race(mut self, race_id: u16) -> Self {
        self.race_id = Some(race_id);
        self
    }

    pub fn is_player(&self) -> bool {
        self.kind == CreatureKind::Player
    }

    /// Player or a player's summon.
    pub fn is_player_controlled(&self) -> bool {
        self.is_player() || self.master.is_some_and(|m| m.is_player)
    }

    pub fn is_summon_of(&self, owner: CreatureId) -> bool {
        self.master.is_some_and(|m| m.id == owner)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoneType {
    #[default]
    Normal,
    Protection,
    NoPvp,
    Pvp,
}
