//! Server-wide tunables shared by every character.

use crate::state::Timestamp;

/// How the base death-loss percentage is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LossFormula {
    /// Flat percent points, reduced by 3 for promoted vocations and 1 per blessing.
    Flat(i32),
    /// Level-curve formula: 5 % below level 24, experience-relative above,
    /// reduced by 30 % when promoted and 8 % per blessing.
    Legacy,
}

impl Default for LossFormula {
    fn default() -> Self {
        Self::Flat(GameConfig::DEFAULT_DEATH_LOSE_PERCENT)
    }
}

/// World PvP ruleset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WorldType {
    NoPvp,
    #[default]
    Pvp,
    PvpEnforced,
}

/// Unjustified-kill thresholds and skull durations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkullConfig {
    pub day_kills_to_red: u32,
    pub week_kills_to_red: u32,
    pub month_kills_to_red: u32,
    pub red_duration_days: u32,
    pub black_duration_days: u32,
    pub orange_duration_days: u32,
}

impl SkullConfig {
    pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

    pub fn red_duration_ms(&self) -> u64 {
        u64::from(self.red_duration_days) * Self::DAY_MS
    }

    pub fn black_duration_ms(&self) -> u64 {
        u64::from(self.black_duration_days) * Self::DAY_MS
    }

    pub fn orange_duration_ms(&self) -> u64 {
        u64::from(self.orange_duration_days) * Self::DAY_MS
    }
}

impl Default for SkullConfig {
    fn default() -> Self {
        Self {
            day_kills_to_red: 3,
            week_kills_to_red: 5,
            month_kills_to_red: 10,
            red_duration_days: 1,
            black_duration_days: 3,
            orange_duration_days: 7,
        }
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Classic slot rules let either hand hold weapons and shields; the modern
    /// ruleset pins shields/quivers to the right hand and weapons to the left.
    pub classic_equipment_slots: bool,

    pub loss_formula: LossFormula,

    /// Highest blessing index counted toward loss reduction.
    pub max_blessing: u8,

    pub world_type: WorldType,

    /// Duration of the in-fight condition added on every aggressive action.
    pub pz_locked_ms: u64,

    /// Per-passive re-evaluation interval of the Wheel of Destiny overlay.
    pub passive_interval_ms: u64,

    /// Damage older than this is ignored when judging an unfair fight.
    pub in_fight_window_ms: u64,

    /// Share of recent damage dealt by players that turns a death into a
    /// PvP death.
    pub pvp_damage_share: f64,

    /// Lower bound (percent) of the unfair-fight loss reduction.
    pub unfair_fight_floor: u32,

    /// Health restored after dying with a black skull.
    pub black_skull_death_health: i32,

    /// Ground item type that powers Divine Empowerment.
    pub divine_empowerment_item: Option<u16>,

    /// Level at which the experience curve stops.
    pub max_level: u32,

    pub skulls: SkullConfig,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_CONDITIONS: usize = 32;
    pub const MAX_STACK: u32 = 100;
    pub const MAX_BLESSINGS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEATH_LOSE_PERCENT: i32 = 10;
    pub const DEFAULT_PZ_LOCKED_MS: u64 = 60_000;
    pub const DEFAULT_PASSIVE_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_IN_FIGHT_WINDOW_MS: u64 = 5 * 60 * 1000;
    pub const DEFAULT_PVP_DAMAGE_SHARE: f64 = 0.5;
    pub const DEFAULT_UNFAIR_FIGHT_FLOOR: u32 = 20;
    pub const DEFAULT_BLACK_SKULL_DEATH_HEALTH: i32 = 40;
    pub const DEFAULT_MAX_LEVEL: u32 = 2_000;

    pub fn new() -> Self {
        Self {
            classic_equipment_slots: true,
            loss_formula: LossFormula::default(),
            max_blessing: Self::MAX_BLESSINGS as u8,
            world_type: WorldType::default(),
            pz_locked_ms: Self::DEFAULT_PZ_LOCKED_MS,
            passive_interval_ms: Self::DEFAULT_PASSIVE_INTERVAL_MS,
            in_fight_window_ms: Self::DEFAULT_IN_FIGHT_WINDOW_MS,
            pvp_damage_share: Self::DEFAULT_PVP_DAMAGE_SHARE,
            unfair_fight_floor: Self::DEFAULT_UNFAIR_FIGHT_FLOOR,
            black_skull_death_health: Self::DEFAULT_BLACK_SKULL_DEATH_HEALTH,
            divine_empowerment_item: None,
            max_level: Self::DEFAULT_MAX_LEVEL,
            skulls: SkullConfig::default(),
        }
    }

    pub fn with_loss_formula(loss_formula: LossFormula) -> Self {
        Self {
            loss_formula,
            ..Self::new()
        }
    }

    pub fn with_modern_slots() -> Self {
        Self {
            classic_equipment_slots: false,
            ..Self::new()
        }
    }

    /// Deadline of the next passive re-evaluation when one runs at `now`.
    pub fn next_passive_deadline(&self, now: Timestamp) -> Timestamp {
        now + self.passive_interval_ms
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
