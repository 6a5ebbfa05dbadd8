//! Deterministic character rules shared by every host.
//!
//! `character-core` owns the equip-slot arbitration, derived stat math,
//! progression ledger, passive overlay, death loss and reputation rules for a
//! single character. It performs no I/O and reads no clock: time arrives as a
//! [`Timestamp`] inside [`RuleContext`], collaborator data arrives through the
//! oracles in [`env`], and client-facing output leaves through a
//! [`NotificationSink`]. [`engine::CharacterEngine`] bundles those pieces for
//! hosts that prefer one entry point.
pub mod config;
pub mod context;
pub mod death;
pub mod engine;
pub mod env;
pub mod equipment;
pub mod error;
pub mod notify;
pub mod passive;
pub mod progression;
pub mod reputation;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use config::{GameConfig, LossFormula, SkullConfig, WorldType};
pub use context::RuleContext;
pub use death::{DeathOutcome, FightAssessment};
pub use engine::{CharacterEngine, DeadlineScheduler, ScheduleHandle, ScheduledAction};
pub use env::{
    CreatureKind, CreatureView, Env, GameEnv, ItemCatalog, ItemOracle, ItemType, ItemTypeId,
    OracleError, Vocation, VocationId, VocationOracle, VocationTable, WorldOracle, ZoneType,
};
pub use equipment::{EquipError, EquipHook, EquipOutcome, EquipRequest, NoHooks};
pub use error::{ErrorSeverity, GameError};
pub use notify::{Discard, MessageClass, Notification, NotificationSink};
pub use progression::{BaseRates, ProgressionHooks};
pub use state::{
    Character, CharacterBuilder, CreatureId, ItemArena, ItemId, ItemInstance, Position,
    ResourceMeter, SkillKind, Skull, Slot, Timestamp, Track,
};
pub use stats::{Absorbed, DerivedStats, IncomingDamage};
