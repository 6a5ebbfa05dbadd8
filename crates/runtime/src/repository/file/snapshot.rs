//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use character_core::CreatureId;

use crate::repository::{CharacterSnapshot, RepositoryError, Result, SnapshotRepository};

/// File-based implementation of SnapshotRepository.
///
/// Snapshots are stored as `character_{id}.json`. Writes go to a temporary
/// file first and are renamed into place, so a crash never leaves a torn
/// snapshot behind.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    /// Create a new file-based snapshot repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self, id: CreatureId) -> PathBuf {
        self.base_dir.join(format!("character_{}.json", id.0))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        let path = self.snapshot_path(snapshot.id());
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved {} to {}", snapshot.id(), path.display());
        Ok(())
    }

    fn load(&self, id: CreatureId) -> Result<Option<CharacterSnapshot>> {
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: CharacterSnapshot = serde_json::from_slice(&bytes)?;
        if snapshot.id() != id {
            return Err(RepositoryError::CharacterMismatch {
                expected: id,
                found: snapshot.id(),
            });
        }

        tracing::debug!("Loaded {} from {}", id, path.display());
        Ok(Some(snapshot))
    }

    fn exists(&self, id: CreatureId) -> bool {
        self.snapshot_path(id).exists()
    }

    fn delete(&self, id: CreatureId) -> Result<()> {
        let path = self.snapshot_path(id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted snapshot of {}", id);
        }
        Ok(())
    }
}
