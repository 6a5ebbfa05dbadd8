//! In-memory SnapshotRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use character_core::CreatureId;

use crate::repository::{CharacterSnapshot, RepositoryError, Result, SnapshotRepository};

/// In-memory implementation of SnapshotRepository.
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    snapshots: RwLock<HashMap<CreatureId, CharacterSnapshot>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for InMemorySnapshotRepository {
    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.insert(snapshot.id(), snapshot.clone());
        Ok(())
    }

    fn load(&self, id: CreatureId) -> Result<Option<CharacterSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.get(&id).cloned())
    }

    fn exists(&self, id: CreatureId) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: CreatureId) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.remove(&id);
        Ok(())
    }
}
