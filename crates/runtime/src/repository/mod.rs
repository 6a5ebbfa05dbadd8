//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during gameplay: the character
//! aggregate, the items it owns and the clock it was saved at.
//!
//! Static game content (items, vocations, config) is handled by oracles, not
//! repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSnapshotRepository;
pub use memory::InMemorySnapshotRepository;
pub use traits::{CharacterSnapshot, SnapshotRepository};
