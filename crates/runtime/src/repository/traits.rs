//! Repository contracts for saving and loading characters.

use serde::{Deserialize, Serialize};

use character_core::{Character, CreatureId, ItemArena, Timestamp};

use crate::repository::Result;

/// Everything needed to resume a character where it left off.
///
/// Pending scheduled actions are not part of a snapshot; they belong to the
/// session that queued them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub character: Character,
    pub arena: ItemArena,
    pub saved_at: Timestamp,
}

impl CharacterSnapshot {
    pub fn id(&self) -> CreatureId {
        self.character.id
    }
}

/// Persistence for character snapshots, keyed by character id.
pub trait SnapshotRepository: Send + Sync {
    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()>;

    fn load(&self, id: CreatureId) -> Result<Option<CharacterSnapshot>>;

    fn exists(&self, id: CreatureId) -> bool;

    fn delete(&self, id: CreatureId) -> Result<()>;
}
