//! Wheel of Destiny passive overlay.
//!
//! Periodic passives write [`MajorStat`](crate::state::MajorStat) values that
//! the stat calculator adds on top of trained skills. They are re-evaluated
//! from live combat state whenever their per-passive deadline passes and are
//! zeroed as soon as the character leaves combat.
//!
//! Every evaluation compares before it writes, so a tick with unchanged
//! inputs mutates nothing and sends nothing.
mod evaluate;
mod overlay;
mod targeted;

pub use evaluate::{
    ballistic_mastery, battle_instinct, combat_mastery, divine_empowerment, positional_tactics,
};
pub use overlay::{add_in_fight_ticks, on_combat_tick, tick_gift_of_life_cooldown};
pub use targeted::{
    AvatarSkill, LeechKind, TargetView, activate_avatar, avatar_skill, battle_healing_amount,
    beam_mastery_bonus, blessing_of_the_grove_healing, drain_body_leech,
    executioners_throw_bonus, trigger_gift_of_life, twin_burst_bonus,
};
