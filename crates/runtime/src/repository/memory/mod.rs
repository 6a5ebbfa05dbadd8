//! In-memory repository implementations for testing and development.

mod snapshot;

pub use snapshot::InMemorySnapshotRepository;
