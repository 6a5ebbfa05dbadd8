use strum::EnumCount;

use crate::state::SkillKind;

pub trait VocationOracle: Send + Sync {
    fn vocation(&self, id: VocationId) -> Option<&Vocation>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VocationId(pub u16);

impl VocationId {
    /// Vocation of fresh characters; also the gain table used below level 9.
    pub const NONE: Self = Self(0);

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Base tries per skill, indexed by `SkillKind as usize`.
pub const SKILL_BASE_TRIES: [u64; SkillKind::COUNT] = [50, 50, 50, 50, 30, 100, 20];

/// Mana required for the first magic level before the multiplier applies.
pub const MANA_BASE: f64 = 400.0;

/// Skill levels below this carry no tries requirement of their own.
pub const SKILL_CURVE_START: u32 = 11;

/// Per-vocation balance data: level gains, curves and combat multipliers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Vocation {
    pub id: VocationId,
    pub name: String,
    /// Vocation this one is promoted into; `None` for top-tier vocations.
    pub promotion: Option<VocationId>,

    pub hp_gain: u32,
    pub mana_gain: u32,
    /// Capacity gained per level, in hundredths of an ounce.
    pub cap_gain: u32,
    pub base_speed: u32,
    pub attack_speed_ms: u64,

    pub armor_multiplier: f64,
    pub defense_multiplier: f64,
    pub mitigation_factor: f64,
    pub mitigation_primary_shield: f64,
    pub mitigation_secondary_shield: f64,

    pub skill_multipliers: [f64; SkillKind::COUNT],
    pub mana_multiplier: f64,

    /// Curves plateau at these levels.
    pub max_skill_level: u32,
    pub max_magic_level: u32,
}

impl Vocation {
    pub fn new(id: VocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// A vocation counts as promoted when it has no further promotion and is
    /// not the starting vocation.
    pub fn is_promoted(&self) -> bool {
        self.promotion.is_none() && !self.id.is_none()
    }

    /// Tries needed to advance from `level - 1` to `level` of `skill`.
    pub fn req_skill_tries(&self, skill: SkillKind, level: u32) -> u64 {
        let level = level.min(self.max_skill_level);
        let exponent = i32::try_from(level).unwrap_or(i32::MAX) - SKILL_CURVE_START as i32;
        let base = SKILL_BASE_TRIES[skill as usize] as f64;
        (base * self.skill_multipliers[skill as usize].powi(exponent)) as u64
    }

    /// Mana needed to advance from `magic_level - 1` to `magic_level`.
    ///
    /// Rounded to the nearest multiple of 20.
    pub fn req_mana(&self, magic_level: u32) -> u64 {
        if magic_level == 0 {
            return 0;
        }
        let level = magic_level.min(self.max_magic_level);
        let exponent = i32::try_from(level).unwrap_or(i32::MAX) - 1;
        let raw = (MANA_BASE * self.mana_multiplier.powi(exponent)) as u64;
        let remainder = raw % 20;
        if remainder < 10 {
            raw - remainder
        } else {
            raw + (20 - remainder)
        }
    }

    pub fn with_gains(mut self, hp: u32, mana: u32, cap: u32) -> Self {
        self.hp_gain = hp;
        self.mana_gain = mana;
        self.cap_gain = cap;
        self
    }

    pub fn with_promotion(mut self, promotion: VocationId) -> Self {
        self.promotion = Some(promotion);
        self
    }

    pub fn with_mitigation(mut self, factor: f64, primary: f64, secondary: f64) -> Self {
        self.mitigation_factor = factor;
        self.mitigation_primary_shield = primary;
        self.mitigation_secondary_shield = secondary;
        self
    }

    pub fn with_skill_multiplier(mut self, skill: SkillKind, multiplier: f64) -> Self {
        self.skill_multipliers[skill as usize] = multiplier;
        self
    }

    pub fn with_mana_multiplier(mut self, multiplier: f64) -> Self {
        self.mana_multiplier = multiplier;
        self
    }

    pub fn with_attack_speed(mut self, attack_speed_ms: u64) -> Self {
        self.attack_speed_ms = attack_speed_ms;
        self
    }
}

impl Default for Vocation {
    fn default() -> Self {
        Self {
            id: VocationId::NONE,
            name: String::from("None"),
            promotion: None,
            hp_gain: 5,
            mana_gain: 5,
            cap_gain: 1_000,
            base_speed: 220,
            attack_speed_ms: 2_000,
            armor_multiplier: 1.0,
            defense_multiplier: 1.0,
            mitigation_factor: 1.0,
            mitigation_primary_shield: 1.0,
            mitigation_secondary_shield: 1.0,
            skill_multipliers: [1.5, 2.0, 2.0, 2.0, 2.0, 1.5, 1.1],
            mana_multiplier: 4.0,
            max_skill_level: 200,
            max_magic_level: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_curve_starts_at_base_for_level_eleven() {
        let knight = Vocation::new(VocationId(4), "Knight")
            .with_skill_multiplier(SkillKind::Sword, 1.1);
        assert_eq!(knight.req_skill_tries(SkillKind::Sword, 11), 50);
        // 50 * 1.1 = 55.000000000000007 -> 55
        assert_eq!(knight.req_skill_tries(SkillKind::Sword, 12), 55);
        // 50 * 1.21 = 60.5 -> 60
        assert_eq!(knight.req_skill_tries(SkillKind::Sword, 13), 60);
    }

    #[test]
    fn skill_curve_plateaus_at_max_level() {
        let mut vocation = Vocation::new(VocationId(1), "Sorcerer");
        vocation.max_skill_level = 15;
        let at_max = vocation.req_skill_tries(SkillKind::Club, 15);
        assert_eq!(vocation.req_skill_tries(SkillKind::Club, 16), at_max);
    }

    #[test]
    fn mana_curve_rounds_to_twenty() {
        let vocation = Vocation::new(VocationId(1), "Sorcerer").with_mana_multiplier(1.1);
        assert_eq!(vocation.req_mana(0), 0);
        assert_eq!(vocation.req_mana(1), 400);
        // 400 * 1.1 = 440
        assert_eq!(vocation.req_mana(2), 440);
        // 400 * 1.21 = 484 -> 480
        assert_eq!(vocation.req_mana(3), 480);
        // 400 * 1.331 = 532.4 -> 532 -> 540
        assert_eq!(vocation.req_mana(4), 540);
    }

    #[test]
    fn promotion_flags() {
        let none = Vocation::default();
        let base = Vocation::new(VocationId(4), "Knight").with_promotion(VocationId(8));
        let elite = Vocation::new(VocationId(8), "Elite Knight");
        assert!(!none.is_promoted());
        assert!(!base.is_promoted());
        assert!(elite.is_promoted());
    }
}
