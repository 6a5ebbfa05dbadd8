//! Oracle bundle handed to the character rules.
//!
//! Item types and vocations are immutable at runtime and shared behind
//! [`Arc`]; the [`GridWorld`] belongs to the simulation worker, which applies
//! [`WorldEdit`]s between ticks.
mod world;

use std::sync::Arc;

use character_core::{Env, GameEnv, ItemCatalog, VocationTable};
use character_content::Content;

pub use world::{GridWorld, WorldEdit};

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) items: Arc<ItemCatalog>,
    pub(crate) vocations: Arc<VocationTable>,
    pub(crate) world: GridWorld,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(items: Arc<ItemCatalog>, vocations: Arc<VocationTable>, world: GridWorld) -> Self {
        Self {
            items,
            vocations,
            world,
        }
    }

    /// Builds the manager from loaded content and an empty world.
    pub fn from_content(content: &Content) -> Self {
        Self::new(
            Arc::new(content.items.clone()),
            Arc::new(content.vocations.clone()),
            GridWorld::default(),
        )
    }

    /// Converts oracle manager into GameEnv for character-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(self.items.as_ref(), self.vocations.as_ref(), &self.world).into_game_env()
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn vocations(&self) -> &VocationTable {
        &self.vocations
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GridWorld {
        &mut self.world
    }
}
