//! Character state representation.
//!
//! This module owns the data structures that describe a character, its
//! equipment, progression ledger, conditions and passive overlay, plus the
//! item arena shared with the world. Hosts read this state freely but mutate
//! it through the rule modules and [`CharacterEngine`](crate::engine::CharacterEngine).
pub mod types;

pub use types::{
    Blessings, Character, CharacterBuilder, CharacterFlags, CombatProfile, Condition,
    ConditionKind, ConditionSet, CreatureId, DamageRecord, Equipment, FightMode, ItemArena,
    ItemId, ItemInstance, MajorStat, PassiveKind, PassiveState, Position, ProgressionLedger,
    Reputation, ResourceMeter, SkillKind, SkillRecord, Skills, Skull, Slot, SlotTarget,
    Timestamp, Track, UnjustifiedKill,
};
