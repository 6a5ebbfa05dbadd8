//! Progression ledger: experience, magic level and per-skill records.
//!
//! Fields are public for reading and for hosts that restore persisted
//! characters; in-game changes go through
//! [`progression`](crate::progression) so percent fields never go stale.

use strum::{EnumCount, EnumIter, IntoStaticStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillKind {
    #[strum(serialize = "fist fighting")]
    Fist,
    #[strum(serialize = "club fighting")]
    Club,
    #[strum(serialize = "sword fighting")]
    Sword,
    #[strum(serialize = "axe fighting")]
    Axe,
    #[strum(serialize = "distance fighting")]
    Distance,
    #[strum(serialize = "shielding")]
    Shield,
    #[strum(serialize = "fishing")]
    Fishing,
}

impl SkillKind {
    /// Skills boosted by the melee major stat.
    pub const MELEE: [SkillKind; 4] = [
        SkillKind::Fist,
        SkillKind::Club,
        SkillKind::Sword,
        SkillKind::Axe,
    ];

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Level, accumulated tries and percent toward the next level of one skill.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillRecord {
    pub level: u32,
    pub tries: u64,
    pub percent: f64,
}

impl SkillRecord {
    pub const STARTING_LEVEL: u32 = 10;

    pub fn new(level: u32) -> Self {
        Self {
            level,
            tries: 0,
            percent: 0.0,
        }
    }
}

impl Default for SkillRecord {
    fn default() -> Self {
        Self::new(Self::STARTING_LEVEL)
    }
}

/// Per-skill records indexed by [`SkillKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skills([SkillRecord; SkillKind::COUNT]);

impl Skills {
    pub fn get(&self, skill: SkillKind) -> &SkillRecord {
        &self.0[skill as usize]
    }

    pub fn get_mut(&mut self, skill: SkillKind) -> &mut SkillRecord {
        &mut self.0[skill as usize]
    }

    pub fn level(&self, skill: SkillKind) -> u32 {
        self.0[skill as usize].level
    }
}

/// Which ledger a progression event applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Track {
    Level,
    MagicLevel,
    Skill(SkillKind),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionLedger {
    pub experience: u64,
    pub level: u32,
    pub level_percent: f64,
    pub magic_level: u32,
    pub mana_spent: u64,
    pub magic_level_percent: f64,
    pub skills: Skills,
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
            level_percent: 0.0,
            magic_level: 0,
            mana_spent: 0,
            magic_level_percent: 0.0,
            skills: Skills::default(),
        }
    }
}
