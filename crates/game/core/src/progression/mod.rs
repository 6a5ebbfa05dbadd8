//! Progression ledger rules.
//!
//! Gains arrive from the host (kills, spell casts, hits) and pass through
//! [`ProgressionHooks`] before the threshold walk in [`ledger`] applies them.
//! Percent fields are recomputed by every mutation here, so
//! [`ProgressionLedger`](crate::state::ProgressionLedger) never holds a stale
//! percentage.
pub mod curves;
mod hook;
pub mod ledger;
pub mod training;

pub use curves::{MAX_BASE_SPEED, base_speed_for_level, exp_for_level, percent_level};
pub use hook::{BaseRates, ProgressionHooks};
pub use ledger::{add_experience, add_mana_spent, add_skill_advance, remove_experience};
pub use training::{
    BlockType, TRAINING_WINDOW, add_offline_training_tries, on_attacked_creature_block_hit,
    on_block_hit,
};
