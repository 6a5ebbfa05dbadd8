pub mod blessings;
pub mod character;
pub mod common;
pub mod conditions;
pub mod equipment;
pub mod item;
pub mod passive;
pub mod progression;
pub mod reputation;

pub use blessings::Blessings;
pub use character::{
    Character, CharacterBuilder, CharacterFlags, CombatProfile, DamageRecord, FightMode,
};
pub use common::{CreatureId, Position, ResourceMeter, Timestamp};
pub use conditions::{Condition, ConditionKind, ConditionSet};
pub use equipment::{Equipment, Slot, SlotTarget};
pub use item::{ItemArena, ItemId, ItemInstance};
pub use passive::{MajorStat, PassiveKind, PassiveState};
pub use progression::{ProgressionLedger, SkillKind, SkillRecord, Skills, Track};
pub use reputation::{Reputation, Skull, UnjustifiedKill};
