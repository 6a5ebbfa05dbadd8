//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker and an optional wall-clock task,
//! wires up the command channel and event bus, and exposes a builder-based
//! API for hosts.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use character_content::Content;
use character_core::{Character, GameConfig, ItemArena, Timestamp};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::repository::{CharacterSnapshot, SnapshotRepository};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Clock advance per wall-clock tick when [`Runtime::start_clock`] runs.
    pub tick_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            tick_interval_ms: 1_000,
        }
    }
}

/// Main runtime that drives one character.
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    sim_worker_handle: JoinHandle<()>,
    clock_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Advance the simulated clock in real time, one
    /// `tick_interval_ms` step per interval. Calling it twice restarts the
    /// clock task.
    pub fn start_clock(&mut self) {
        self.stop_clock();

        let step = self.config.tick_interval_ms;
        let handle = self.handle.clone();
        self.clock_handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(step));
            loop {
                interval.tick().await;
                if let Err(error) = handle.advance(step).await {
                    warn!(target: "runtime::clock", %error, "clock stopped");
                    break;
                }
            }
        }));
    }

    pub fn stop_clock(&mut self) {
        if let Some(clock) = self.clock_handle.take() {
            clock.abort();
        }
    }

    /// Persist the current character through `repository`.
    pub async fn save(&self, repository: &dyn SnapshotRepository) -> Result<()> {
        let snapshot = self.handle.snapshot().await?;
        repository.save(&snapshot)?;
        info!(character = %snapshot.id(), at = %snapshot.saved_at, "character saved");
        Ok(())
    }

    /// Shutdown the runtime gracefully
    ///
    /// Commands queued before the call still run; handles cloned out of the
    /// runtime fail with [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stop_clock();
        self.handle.stop().await?;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    snapshot: Option<CharacterSnapshot>,
    oracles: Option<OracleManager>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            snapshot: None,
            oracles: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use loaded content for the oracles and the game configuration.
    pub fn content(mut self, content: &Content) -> Self {
        self.oracles = Some(OracleManager::from_content(content));
        self.config.game_config = content.config.clone();
        self
    }

    /// Set the oracle manager directly
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Start a fresh character with an empty item arena at time zero.
    pub fn character(mut self, character: Character) -> Self {
        self.snapshot = Some(CharacterSnapshot {
            character,
            arena: ItemArena::new(),
            saved_at: Timestamp::ZERO,
        });
        self
    }

    /// Resume a saved character.
    pub fn snapshot(mut self, snapshot: CharacterSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingContent)?;
        let snapshot = self.snapshot.ok_or(RuntimeError::MissingCharacter)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        info!(
            character = %snapshot.id(),
            at = %snapshot.saved_at,
            "starting runtime"
        );
        let sim_worker = SimulationWorker::new(
            snapshot,
            oracles,
            self.config.game_config.clone(),
            command_rx,
            event_bus,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            config: self.config,
            sim_worker_handle,
            clock_handle: None,
        })
    }
}
