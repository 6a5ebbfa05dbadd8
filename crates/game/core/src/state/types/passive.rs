//! Wheel of Destiny passive state.
//!
//! Holds which passives are unlocked (and at which stage), the deadline of
//! each passive's next re-evaluation and the currently applied major-stat
//! values. Only [`passive`](crate::passive) writes the major stats.

use strum::{EnumCount, EnumIter, IntoStaticStr};

use crate::state::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassiveKind {
    #[strum(serialize = "Battle Instinct")]
    BattleInstinct,
    #[strum(serialize = "Positional Tactics")]
    PositionalTactics,
    #[strum(serialize = "Ballistic Mastery")]
    BallisticMastery,
    #[strum(serialize = "Combat Mastery")]
    CombatMastery,
    #[strum(serialize = "Divine Empowerment")]
    DivineEmpowerment,
    #[strum(serialize = "Gift of Life")]
    GiftOfLife,
    #[strum(serialize = "Blessing of the Grove")]
    BlessingOfTheGrove,
    #[strum(serialize = "Twin Burst")]
    TwinBurst,
    #[strum(serialize = "Executioner's Throw")]
    ExecutionersThrow,
    #[strum(serialize = "Beam Mastery")]
    BeamMastery,
    #[strum(serialize = "Drain Body")]
    DrainBody,
    #[strum(serialize = "Avatar of Light")]
    AvatarOfLight,
    #[strum(serialize = "Avatar of Steel")]
    AvatarOfSteel,
    #[strum(serialize = "Avatar of Nature")]
    AvatarOfNature,
    #[strum(serialize = "Avatar of Storm")]
    AvatarOfStorm,
}

impl PassiveKind {
    /// Passives re-evaluated by the combat tick, in evaluation order.
    pub const PERIODIC: [PassiveKind; 5] = [
        PassiveKind::BattleInstinct,
        PassiveKind::PositionalTactics,
        PassiveKind::BallisticMastery,
        PassiveKind::CombatMastery,
        PassiveKind::DivineEmpowerment,
    ];

    pub const fn is_avatar(self) -> bool {
        matches!(
            self,
            PassiveKind::AvatarOfLight
                | PassiveKind::AvatarOfSteel
                | PassiveKind::AvatarOfNature
                | PassiveKind::AvatarOfStorm
        )
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Stat slots the overlay controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MajorStat {
    Melee,
    Shield,
    Distance,
    Magic,
    CriticalDamage,
    MasteryCriticalDamage,
    PhysicalDamage,
    HolyDamage,
    Defense,
    Damage,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveState {
    unlocked: [bool; PassiveKind::COUNT],
    stages: [u8; PassiveKind::COUNT],
    deadlines: [Timestamp; PassiveKind::COUNT],
    major: [i32; MajorStat::COUNT],
    /// Remaining Gift of Life cooldown in seconds.
    pub gift_of_life_cooldown: u32,
    /// Last time the Gift of Life cooldown was decremented.
    pub cooldown_clock: Timestamp,
    /// Active avatar and the moment it ends.
    pub avatar: Option<(PassiveKind, Timestamp)>,
    /// Creatures counted by the last Battle Instinct scan when it applied.
    pub creatures_nearby: u16,
}

impl PassiveState {
    pub const MAX_STAGE: u8 = 3;

    pub fn unlock(&mut self, kind: PassiveKind, stage: u8) {
        self.unlocked[kind as usize] = true;
        self.stages[kind as usize] = stage.min(Self::MAX_STAGE);
    }

    pub fn lock(&mut self, kind: PassiveKind) {
        self.unlocked[kind as usize] = false;
        self.stages[kind as usize] = 0;
    }

    pub fn is_unlocked(&self, kind: PassiveKind) -> bool {
        self.unlocked[kind as usize]
    }

    pub fn stage(&self, kind: PassiveKind) -> u8 {
        self.stages[kind as usize]
    }

    pub fn deadline(&self, kind: PassiveKind) -> Timestamp {
        self.deadlines[kind as usize]
    }

    pub fn set_deadline(&mut self, kind: PassiveKind, at: Timestamp) {
        self.deadlines[kind as usize] = at;
    }

    pub fn major(&self, stat: MajorStat) -> i32 {
        self.major[stat as usize]
    }

    /// Writes a major stat; returns true only if the value changed.
    pub fn set_major(&mut self, stat: MajorStat, value: i32) -> bool {
        let slot = &mut self.major[stat as usize];
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Zeroes every major stat; returns true if any was nonzero.
    pub fn reset_majors(&mut self) -> bool {
        let changed = self.major.iter().any(|&v| v != 0);
        self.major = [0; MajorStat::COUNT];
        changed
    }

    pub fn any_periodic_unlocked(&self) -> bool {
        PassiveKind::PERIODIC.iter().any(|k| self.is_unlocked(*k))
    }
}
