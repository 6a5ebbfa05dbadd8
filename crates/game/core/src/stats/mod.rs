//! Derived stat computation.
//!
//! Everything here reads the character aggregate and the oracles and
//! produces numbers; nothing in this module mutates progression or slots.
//!
//! ```text
//! [ Skills + major stats + BonusStack ] -> effective skill
//!      ↓
//! [ Equipped hands / body slots ]       -> mitigation, defense, armor
//!      ↓
//! [ Stance + attack clock ]             -> attack factor, defense factor
//!      ↓
//! [ Absorb percents + potions + avatar ] -> damage actually taken
//! ```
//!
//! ## Bonus Stack
//!
//! Skill, magic level and mitigation bonuses share one calculation order:
//! `Flat → %Inc → Clamp`

pub mod absorb;
pub mod bonus;
pub mod derived;
pub mod weapon;

pub use absorb::{Absorbed, IncomingDamage, absorb_damage};
pub use bonus::{Bonus, BonusSource, BonusStack};
pub use derived::{
    DerivedStats, armor, attack_factor, compute_derived_stats, defense, defense_factor, mitigation,
};
pub use weapon::{
    Equipped, attack_weapon, effective_magic_level, effective_skill, equipped, shield_and_weapon,
    weapon_skill, weapon_skill_kind,
};
