//! Traits describing read-only collaborator data.
//!
//! Oracles expose item types, vocation balance tables and a tile query over
//! the surrounding world. The [`Env`] aggregate bundles them so the engine can
//! access everything it needs without hard coupling to concrete
//! implementations.
mod catalog;
mod error;
mod items;
mod vocations;
mod world;

pub use catalog::{ItemCatalog, VocationTable};
pub use error::OracleError;
pub use items::{
    AmmoType, CombatType, ItemOracle, ItemType, ItemTypeId, SlotPositions, WeaponType,
};
pub use vocations::{
    MANA_BASE, SKILL_BASE_TRIES, SKILL_CURVE_START, Vocation, VocationId, VocationOracle,
};
pub use world::{CreatureKind, CreatureView, Summoner, WorldOracle, ZoneType};

/// Aggregates read-only oracles required by the rule modules.
pub struct Env<'a, I, V, W>
where
    I: ItemOracle + ?Sized,
    V: VocationOracle + ?Sized,
    W: WorldOracle + ?Sized,
{
    items: Option<&'a I>,
    vocations: Option<&'a V>,
    world: Option<&'a W>,
}

impl<I, V, W> Clone for Env<'_, I, V, W>
where
    I: ItemOracle + ?Sized,
    V: VocationOracle + ?Sized,
    W: WorldOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, V, W> Copy for Env<'_, I, V, W>
where
    I: ItemOracle + ?Sized,
    V: VocationOracle + ?Sized,
    W: WorldOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn ItemOracle + 'a, dyn VocationOracle + 'a, dyn WorldOracle + 'a>;

impl<'a, I, V, W> Env<'a, I, V, W>
where
    I: ItemOracle + ?Sized,
    V: VocationOracle + ?Sized,
    W: WorldOracle + ?Sized,
{
    pub fn new(items: Option<&'a I>, vocations: Option<&'a V>, world: Option<&'a W>) -> Self {
        Self {
            items,
            vocations,
            world,
        }
    }

    pub fn with_all(items: &'a I, vocations: &'a V, world: &'a W) -> Self {
        Self::new(Some(items), Some(vocations), Some(world))
    }

    pub fn empty() -> Self {
        Self {
            items: None,
            vocations: None,
            world: None,
        }
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no items oracle was provided.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the VocationOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::VocationsNotAvailable` if no vocation oracle was provided.
    pub fn vocations(&self) -> Result<&'a V, OracleError> {
        self.vocations.ok_or(OracleError::VocationsNotAvailable)
    }

    /// Returns the WorldOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::WorldNotAvailable` if no world oracle was provided.
    pub fn world(&self) -> Result<&'a W, OracleError> {
        self.world.ok_or(OracleError::WorldNotAvailable)
    }

    /// Looks up an item type.
    ///
    /// # Errors
    ///
    /// Fails when the item oracle is missing or does not know the type.
    pub fn item_type(&self, id: ItemTypeId) -> Result<&'a ItemType, OracleError> {
        self.items()?
            .item_type(id)
            .ok_or(OracleError::ItemTypeNotFound(id))
    }

    /// Looks up a vocation.
    ///
    /// # Errors
    ///
    /// Fails when the vocation oracle is missing or does not know the id.
    pub fn vocation(&self, id: VocationId) -> Result<&'a Vocation, OracleError> {
        self.vocations()?
            .vocation(id)
            .ok_or(OracleError::VocationNotFound(id))
    }
}

impl<'a, I, V, W> Env<'a, I, V, W>
where
    I: ItemOracle + 'a,
    V: VocationOracle + 'a,
    W: WorldOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let items: Option<&'a dyn ItemOracle> = self.items.map(|items| items as _);
        let vocations: Option<&'a dyn VocationOracle> = self.vocations.map(|v| v as _);
        let world: Option<&'a dyn WorldOracle> = self.world.map(|world| world as _);
        Env::new(items, vocations, world)
    }
}
