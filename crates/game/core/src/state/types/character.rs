//! The character aggregate.
//!
//! A [`Character`] is composed of owned value types: identity, resources,
//! [`ProgressionLedger`], [`Equipment`], [`CombatProfile`], [`PassiveState`],
//! [`Blessings`] and [`Reputation`]. Player-only behavior is gated by
//! [`CharacterFlags`] capability checks.

use std::collections::BTreeMap;

use bitflags::bitflags;
use strum::EnumCount;

use crate::env::VocationId;
use crate::state::{
    Blessings, ConditionSet, CreatureId, Equipment, PassiveState, Position, ProgressionLedger,
    Reputation, ResourceMeter, SkillKind, SkillRecord, Timestamp,
};
use crate::stats::{BonusStack, DerivedStats};

bitflags! {
    /// Per-character capability and suppression flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CharacterFlags: u32 {
        const CANNOT_PICKUP_ITEMS = 1 << 0;
        const HAS_INFINITE_CAPACITY = 1 << 1;
        const NOT_GAIN_MANA = 1 << 2;
        const NOT_GAIN_EXPERIENCE = 1 << 3;
        const NOT_GAIN_SKILL = 1 << 4;
        const NOT_GAIN_IN_FIGHT = 1 << 5;
        const SET_MAX_SPEED = 1 << 6;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FightMode {
    Attack,
    #[default]
    Balanced,
    Defense,
}

/// Damage received from one attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRecord {
    pub total: u64,
    pub last_hit: Timestamp,
}

/// Combat-facing state: stance, conditions, bonuses and training counters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatProfile {
    pub fight_mode: FightMode,
    pub last_attack: Timestamp,
    pub conditions: ConditionSet,
    pub damage_map: BTreeMap<CreatureId, DamageRecord>,
    pub pz_locked: bool,
    /// When false the next death costs nothing and re-arms the flag.
    pub skill_loss: bool,
    pub skill_bonuses: [BonusStack; SkillKind::COUNT],
    pub magic_bonus: BonusStack,
    /// Increased-percent entries scale mitigation.
    pub mitigation_bonus: BonusStack,
    /// Derived stats as of the last equipment change.
    pub cached: DerivedStats,
    pub shield_block_count: u32,
    pub blood_hit_count: u32,
    /// Whether the last swing earns an attack-skill try once it lands.
    pub add_attack_skill_point: bool,
}

impl Default for CombatProfile {
    fn default() -> Self {
        Self {
            fight_mode: FightMode::default(),
            last_attack: Timestamp::ZERO,
            conditions: ConditionSet::empty(),
            damage_map: BTreeMap::new(),
            pz_locked: false,
            skill_loss: true,
            skill_bonuses: Default::default(),
            magic_bonus: BonusStack::new(),
            mitigation_bonus: BonusStack::new(),
            cached: DerivedStats::default(),
            shield_block_count: 0,
            blood_hit_count: 0,
            add_attack_skill_point: false,
        }
    }
}

impl CombatProfile {
    /// Records damage dealt by `attacker` at `now`.
    pub fn record_damage(&mut self, attacker: CreatureId, amount: u64, now: Timestamp) {
        let entry = self.damage_map.entry(attacker).or_insert(DamageRecord {
            total: 0,
            last_hit: now,
        });
        entry.total = entry.total.saturating_add(amount);
        entry.last_hit = now;
    }

    /// Drops attackers whose last hit is more than `window_ms` before `now`.
    pub fn prune_damage(&mut self, now: Timestamp, window_ms: u64) {
        self.damage_map
            .retain(|_, record| now.since(record.last_hit) <= window_ms);
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: CreatureId,
    pub name: String,
    pub vocation: VocationId,
    pub position: Position,
    pub temple: Position,
    pub flags: CharacterFlags,
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    /// Carrying capacity in hundredths of an ounce.
    pub capacity: u32,
    /// Weight of everything equipped, same unit as `capacity`.
    pub inventory_weight: u32,
    pub base_speed: u32,
    pub progression: ProgressionLedger,
    pub equipment: Equipment,
    pub combat: CombatProfile,
    pub passives: PassiveState,
    pub blessings: Blessings,
    pub reputation: Reputation,
    /// Bestiary race whose kills count as blessed (charm rune).
    pub charm_rune_bless: Option<u16>,
}

impl Character {
    pub fn builder(id: CreatureId, name: impl Into<String>) -> CharacterBuilder {
        CharacterBuilder::new(id, name)
    }

    pub fn free_capacity(&self) -> u32 {
        if self.flags.contains(CharacterFlags::HAS_INFINITE_CAPACITY) {
            return u32::MAX;
        }
        self.capacity.saturating_sub(self.inventory_weight)
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn skill(&self, skill: SkillKind) -> &SkillRecord {
        self.progression.skills.get(skill)
    }

    pub fn is_in_fight(&self, now: Timestamp) -> bool {
        self.combat
            .conditions
            .has(crate::state::ConditionKind::InFight, now)
    }
}

/// Builder for restoring or creating characters.
pub struct CharacterBuilder {
    character: Character,
}

impl CharacterBuilder {
    fn new(id: CreatureId, name: impl Into<String>) -> Self {
        Self {
            character: Character {
                id,
                name: name.into(),
                vocation: VocationId::NONE,
                position: Position::default(),
                temple: Position::default(),
                flags: CharacterFlags::empty(),
                health: ResourceMeter::full(150),
                mana: ResourceMeter::full(0),
                capacity: 40_000,
                inventory_weight: 0,
                base_speed: 220,
                progression: ProgressionLedger::default(),
                equipment: Equipment::empty(),
                combat: CombatProfile::default(),
                passives: PassiveState::default(),
                blessings: Blessings::default(),
                reputation: Reputation::default(),
                charm_rune_bless: None,
            },
        }
    }

    pub fn vocation(mut self, vocation: VocationId) -> Self {
        self.character.vocation = vocation;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.character.position = position;
        self
    }

    pub fn temple(mut self, temple: Position) -> Self {
        self.character.temple = temple;
        self
    }

    pub fn flags(mut self, flags: CharacterFlags) -> Self {
        self.character.flags = flags;
        self
    }

    pub fn health(mut self, maximum: u32) -> Self {
        self.character.health = ResourceMeter::full(maximum);
        self
    }

    pub fn mana(mut self, maximum: u32) -> Self {
        self.character.mana = ResourceMeter::full(maximum);
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.character.capacity = capacity;
        self
    }

    /// Sets level and the matching experience floor.
    pub fn level(mut self, level: u32, experience: u64) -> Self {
        self.character.progression.level = level;
        self.character.progression.experience = experience;
        self
    }

    pub fn magic_level(mut self, magic_level: u32, mana_spent: u64) -> Self {
        self.character.progression.magic_level = magic_level;
        self.character.progression.mana_spent = mana_spent;
        self
    }

    pub fn skill(mut self, skill: SkillKind, level: u32, tries: u64) -> Self {
        let record = self.character.progression.skills.get_mut(skill);
        record.level = level;
        record.tries = tries;
        self
    }

    pub fn fight_mode(mut self, mode: FightMode) -> Self {
        self.character.combat.fight_mode = mode;
        self
    }

    pub fn blessing(mut self, index: u8, count: u8) -> Self {
        self.character.blessings.add(index, count);
        self
    }

    pub fn build(self) -> Character {
        self.character
    }
}
