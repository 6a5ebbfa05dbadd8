//! Host glue around the character rules.
//!
//! This crate wires content, a world oracle and a background simulation
//! worker into a runtime API. Consumers embed [`Runtime`] to drive the clock,
//! subscribe to character notifications, and issue equip/progression/death
//! commands through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] bundles content and the world view handed to the rules
//! - [`repository`] persists character snapshots
//! - [`logging`] installs the tracing subscriber
pub mod api;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, TickReport, Topic};
pub use oracle::{GridWorld, OracleManager, WorldEdit};
pub use repository::{
    CharacterSnapshot, FileSnapshotRepository, InMemorySnapshotRepository, RepositoryError,
    SnapshotRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
