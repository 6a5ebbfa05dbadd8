//! Experience, skill tries and mana spent.
//!
//! Every gain follows the same threshold walk: while the accumulated amount
//! reaches the next requirement, advance one level and restart the count.
//! A curve that stops growing (max level) ends the walk.

use tracing::{debug, warn};

use crate::context::RuleContext;
use crate::env::{Vocation, VocationId};
use crate::notify::{MessageClass, Notification, NotificationSink};
use crate::state::{Character, CharacterFlags, CreatureId, SkillKind, Track};

use super::curves::{MAX_BASE_SPEED, base_speed_for_level, exp_for_level, percent_level};
use super::hook::ProgressionHooks;

/// Highest level that still uses the starter gain table.
const STARTER_GAIN_MAX_LEVEL: u32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LevelGains {
    pub health: u32,
    pub mana: u32,
    pub capacity: u32,
}

impl LevelGains {
    fn of(vocation: &Vocation) -> Self {
        Self {
            health: vocation.hp_gain,
            mana: vocation.mana_gain,
            capacity: vocation.cap_gain,
        }
    }

    /// Gains for reaching (or leaving) `level`.
    ///
    /// Characters with a vocation still use the no-vocation table up to
    /// level 8 when `starter_table` is set.
    pub(crate) fn at(
        cx: &RuleContext<'_>,
        vocation: Option<&Vocation>,
        level: u32,
        starter_table: bool,
    ) -> Self {
        let Some(vocation) = vocation else {
            return Self::default();
        };
        if starter_table && !vocation.id.is_none() && level <= STARTER_GAIN_MAX_LEVEL {
            return cx
                .env
                .vocation(VocationId::NONE)
                .map_or_else(|_| Self::of(&Vocation::default()), Self::of);
        }
        Self::of(vocation)
    }
}

pub(crate) fn vocation_of<'a>(cx: &RuleContext<'a>, character: &Character) -> Option<&'a Vocation> {
    match cx.env.vocation(character.vocation) {
        Ok(vocation) => Some(vocation),
        Err(error) => {
            warn!(character = %character.id, %error, "progression without vocation data");
            None
        }
    }
}

pub(crate) fn update_base_speed(character: &mut Character, vocation: Option<&Vocation>) {
    if character.flags.contains(CharacterFlags::SET_MAX_SPEED) {
        character.base_speed = MAX_BASE_SPEED;
    } else if let Some(vocation) = vocation {
        character.base_speed = base_speed_for_level(vocation.base_speed, character.level());
    }
}

/// Outcome of one threshold walk.
struct Walk {
    level: u32,
    count: u64,
    percent: f64,
}

/// Advances `level` while `count + amount` reaches `req(level + 1)`.
fn walk_up(level: u32, count: u64, mut amount: u64, req: impl Fn(u32) -> u64) -> Walk {
    let mut level = level;
    let mut count = count;
    let mut current = req(level);
    let mut next = req(level + 1);
    while count.saturating_add(amount) >= next {
        amount -= next.saturating_sub(count);
        level += 1;
        count = 0;
        current = next;
        next = req(level + 1);
        if current >= next {
            amount = 0;
            break;
        }
    }
    count += amount;
    let percent = if next > current {
        percent_level(count, next)
    } else {
        0.0
    };
    Walk {
        level,
        count,
        percent,
    }
}

/// Adds skill tries; returns the number of levels gained.
pub fn add_skill_advance(
    character: &mut Character,
    cx: &RuleContext<'_>,
    skill: SkillKind,
    count: u64,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> u32 {
    if character.flags.contains(CharacterFlags::NOT_GAIN_SKILL) {
        return 0;
    }
    let Some(vocation) = vocation_of(cx, character) else {
        return 0;
    };
    let record = *character.skill(skill);
    if vocation.req_skill_tries(skill, record.level)
        >= vocation.req_skill_tries(skill, record.level + 1)
    {
        return 0;
    }
    let track = Track::Skill(skill);
    let count = hooks.adjust_tries(character, track, count);
    if count == 0 {
        return 0;
    }

    let walk = walk_up(record.level, record.tries, count, |level| {
        vocation.req_skill_tries(skill, level)
    });
    let updated = character.progression.skills.get_mut(skill);
    updated.level = walk.level;
    updated.tries = walk.count;
    updated.percent = walk.percent;

    let gained = walk.level - record.level;
    if gained > 0 {
        for level in record.level + 1..=walk.level {
            sink.notify(Notification::text(
                MessageClass::EventAdvance,
                format!("You advanced to {} level {level}.", skill.name()),
            ));
        }
        sink.notify(Notification::Advance {
            track,
            from: record.level,
            to: walk.level,
        });
        hooks.on_advance(character, track, record.level, walk.level);
    }
    if gained > 0 || record.percent != walk.percent {
        sink.notify(Notification::Skills);
    }
    debug!(character = %character.id, skill = skill.name(), count, level = walk.level, "skill tries added");
    gained
}

/// Adds mana spent toward the next magic level; returns levels gained.
pub fn add_mana_spent(
    character: &mut Character,
    cx: &RuleContext<'_>,
    amount: u64,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> u32 {
    if character.flags.contains(CharacterFlags::NOT_GAIN_MANA) {
        return 0;
    }
    let Some(vocation) = vocation_of(cx, character) else {
        return 0;
    };
    let from = character.progression.magic_level;
    if vocation.req_mana(from) >= vocation.req_mana(from + 1) {
        return 0;
    }
    let amount = hooks.adjust_tries(character, Track::MagicLevel, amount);
    if amount == 0 {
        return 0;
    }

    let before = character.progression.magic_level_percent;
    let walk = walk_up(from, character.progression.mana_spent, amount, |level| {
        vocation.req_mana(level)
    });
    let ledger = &mut character.progression;
    ledger.magic_level = walk.level;
    ledger.mana_spent = walk.count;
    ledger.magic_level_percent = walk.percent;

    let gained = walk.level - from;
    if gained > 0 {
        for level in from + 1..=walk.level {
            sink.notify(Notification::text(
                MessageClass::EventAdvance,
                format!("You advanced to magic level {level}."),
            ));
        }
        sink.notify(Notification::Advance {
            track: Track::MagicLevel,
            from,
            to: walk.level,
        });
        hooks.on_advance(character, Track::MagicLevel, from, walk.level);
    }
    if gained > 0 || before != walk.percent {
        sink.notify(Notification::Stats);
    }
    gained
}

/// Adds experience; returns the number of levels gained.
///
/// Level-ups grow health, mana and capacity by the vocation gains and then
/// refill health and mana.
pub fn add_experience(
    character: &mut Character,
    cx: &RuleContext<'_>,
    amount: u64,
    source: Option<CreatureId>,
    announce: bool,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> u32 {
    if character.flags.contains(CharacterFlags::NOT_GAIN_EXPERIENCE) {
        return 0;
    }
    let max_level = cx.config.max_level;
    let from = character.level();
    let mut current = exp_for_level(from, max_level);
    let mut next = exp_for_level(from + 1, max_level);
    if current >= next {
        character.progression.level_percent = 0.0;
        sink.notify(Notification::Stats);
        return 0;
    }
    let amount = hooks.adjust_experience(character, source, amount);
    if amount == 0 {
        return 0;
    }

    let ledger = &mut character.progression;
    ledger.experience = ledger.experience.saturating_add(amount);
    if announce {
        sink.notify(Notification::text(
            MessageClass::ExperienceGain,
            format!("You gained {amount} experience points."),
        ));
        sink.notify(Notification::text(
            MessageClass::Spectator,
            format!("{} gained {amount} experience points.", character.name),
        ));
    }

    let vocation = vocation_of(cx, character);
    while character.progression.experience >= next {
        character.progression.level += 1;
        let gains = LevelGains::at(cx, vocation, character.level(), true);
        character.health.grow(gains.health);
        character.mana.grow(gains.mana);
        character.capacity = character.capacity.saturating_add(gains.capacity);
        current = next;
        next = exp_for_level(character.level() + 1, max_level);
        if current >= next {
            break;
        }
    }

    let to = character.level();
    if to != from {
        character.health.refill();
        character.mana.refill();
        update_base_speed(character, vocation);
        sink.notify(Notification::text(
            MessageClass::EventAdvance,
            format!("You advanced from Level {from} to Level {to}."),
        ));
        sink.notify(Notification::Advance {
            track: Track::Level,
            from,
            to,
        });
        hooks.on_advance(character, Track::Level, from, to);
    }

    character.progression.level_percent = if next > current {
        percent_level(character.progression.experience - current, next - current)
    } else {
        0.0
    };
    sink.notify(Notification::Stats);
    debug!(character = %character.id, amount, from, to, "experience added");
    to - from
}

/// Removes experience; returns the number of levels lost.
///
/// Lost levels shrink health, mana and capacity. Current health and mana
/// are clamped to the new maximum but never refilled.
pub fn remove_experience(
    character: &mut Character,
    cx: &RuleContext<'_>,
    amount: u64,
    announce: bool,
    hooks: &mut dyn ProgressionHooks,
    sink: &mut dyn NotificationSink,
) -> u32 {
    if character.progression.experience == 0 || amount == 0 {
        return 0;
    }
    let amount = hooks.adjust_experience_loss(character, amount);
    if amount == 0 {
        return 0;
    }

    let before = character.progression.experience;
    character.progression.experience = before.saturating_sub(amount);
    if announce {
        let lost = before - character.progression.experience;
        sink.notify(Notification::text(
            MessageClass::ExperienceGain,
            format!("You lost {lost} experience points."),
        ));
        sink.notify(Notification::text(
            MessageClass::Spectator,
            format!("{} lost {lost} experience points.", character.name),
        ));
    }

    let from = character.level();
    let vocation = vocation_of(cx, character);
    let lost = drop_levels(character, cx, vocation, true);
    let to = character.level();
    if lost > 0 {
        sink.notify(Notification::text(
            MessageClass::EventAdvance,
            format!("You were downgraded from Level {from} to Level {to}."),
        ));
        sink.notify(Notification::Advance {
            track: Track::Level,
            from,
            to,
        });
        hooks.on_advance(character, Track::Level, from, to);
    }
    sink.notify(Notification::Stats);
    debug!(character = %character.id, amount, from, to, "experience removed");
    lost
}

/// Drops levels until experience covers the current level again, removing
/// the matching gains, then recomputes the level percent.
pub(crate) fn drop_levels(
    character: &mut Character,
    cx: &RuleContext<'_>,
    vocation: Option<&Vocation>,
    starter_table: bool,
) -> u32 {
    let max_level = cx.config.max_level;
    let from = character.level();
    let mut current = exp_for_level(from, max_level);
    while character.progression.level > 1 && character.progression.experience < current {
        character.progression.level -= 1;
        let gains = LevelGains::at(cx, vocation, character.level(), starter_table);
        character.health.shrink(gains.health);
        character.mana.shrink(gains.mana);
        character.capacity = character.capacity.saturating_sub(gains.capacity);
        current = exp_for_level(character.level(), max_level);
    }
    if character.level() != from {
        update_base_speed(character, vocation);
    }

    let next = exp_for_level(character.level() + 1, max_level);
    character.progression.level_percent = if next > current {
        percent_level(
            character.progression.experience.saturating_sub(current),
            next - current,
        )
    } else {
        0.0
    };
    from - character.level()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::progression::BaseRates;
    use crate::state::{CreatureId, Timestamp};
    use crate::testing::*;

    const NOW: Timestamp = Timestamp(0);

    struct DoubleRates;

    impl ProgressionHooks for DoubleRates {
        fn adjust_tries(&mut self, _character: &Character, _track: Track, tries: u64) -> u64 {
            tries * 2
        }

        fn adjust_experience(
            &mut self,
            _character: &Character,
            _source: Option<CreatureId>,
            amount: u64,
        ) -> u64 {
            amount * 2
        }
    }

    #[test]
    fn exact_tries_for_two_levels_land_on_zero() {
        let fx = Fixture::new();
        let mut character = knight();
        let mut sink = Vec::new();

        // 50 tries for level 11, 55 for level 12
        let gained = add_skill_advance(
            &mut character,
            &fx.cx(NOW),
            SkillKind::Sword,
            105,
            &mut BaseRates,
            &mut sink,
        );

        let record = character.skill(SkillKind::Sword);
        assert_eq!(gained, 2);
        assert_eq!(record.level, 12);
        assert_eq!(record.tries, 0);
        assert_eq!(record.percent, 0.0);
        assert!(sink.contains(&Notification::text(
            MessageClass::EventAdvance,
            "You advanced to sword fighting level 12."
        )));
        assert!(sink.contains(&Notification::Advance {
            track: Track::Skill(SkillKind::Sword),
            from: 10,
            to: 12
        }));
        assert!(sink.contains(&Notification::Skills));
    }

    #[test]
    fn partial_tries_update_percent() {
        let fx = Fixture::new();
        let mut character = knight();
        let mut sink = Vec::new();

        let gained = add_skill_advance(
            &mut character,
            &fx.cx(NOW),
            SkillKind::Sword,
            25,
            &mut BaseRates,
            &mut sink,
        );

        assert_eq!(gained, 0);
        assert_eq!(character.skill(SkillKind::Sword).tries, 25);
        assert_eq!(character.skill(SkillKind::Sword).percent, 50.0);
        assert_eq!(sink, vec![Notification::Skills]);
    }

    #[test]
    fn flags_and_zero_amounts_leave_ledger_alone() {
        let fx = Fixture::new();
        let cx = fx.cx(NOW);
        let mut character = knight();
        let before = character.progression.clone();
        let mut sink = Vec::new();

        add_skill_advance(&mut character, &cx, SkillKind::Axe, 0, &mut BaseRates, &mut sink);
        character.flags = CharacterFlags::NOT_GAIN_SKILL
            | CharacterFlags::NOT_GAIN_MANA
            | CharacterFlags::NOT_GAIN_EXPERIENCE;
        add_skill_advance(&mut character, &cx, SkillKind::Axe, 500, &mut BaseRates, &mut sink);
        add_mana_spent(&mut character, &cx, 5_000, &mut BaseRates, &mut sink);
        add_experience(&mut character, &cx, 5_000, None, true, &mut BaseRates, &mut sink);

        assert_eq!(character.progression, before);
        assert!(sink.is_empty());
    }

    #[test]
    fn plateaued_skill_stays_put() {
        let fx = Fixture::new();
        let mut character = Character::builder(CreatureId(2), "Maxed")
            .vocation(KNIGHT)
            .skill(SkillKind::Club, 200, 0)
            .build();

        let gained = add_skill_advance(
            &mut character,
            &fx.cx(NOW),
            SkillKind::Club,
            u64::MAX / 2,
            &mut BaseRates,
            &mut Vec::new(),
        );

        assert_eq!(gained, 0);
        assert_eq!(character.skill(SkillKind::Club).level, 200);
        assert_eq!(character.skill(SkillKind::Club).tries, 0);
    }

    #[test]
    fn mana_spent_walks_magic_levels() {
        let fx = Fixture::new();
        let cx = fx.cx(NOW);
        let mut character = knight();
        let mut sink = Vec::new();

        // knight mana curve: 400, 1200, 3600
        assert_eq!(add_mana_spent(&mut character, &cx, 400, &mut BaseRates, &mut sink), 1);
        assert_eq!(character.progression.mana_spent, 0);
        assert_eq!(add_mana_spent(&mut character, &cx, 1_600, &mut BaseRates, &mut sink), 1);

        let ledger = &character.progression;
        assert_eq!(ledger.magic_level, 2);
        assert_eq!(ledger.mana_spent, 400);
        assert_eq!(ledger.magic_level_percent, 11.11);
        assert!(sink.contains(&Notification::text(
            MessageClass::EventAdvance,
            "You advanced to magic level 2."
        )));
    }

    #[test]
    fn hooks_scale_gains() {
        let fx = Fixture::new();
        let mut character = knight();

        add_skill_advance(
            &mut character,
            &fx.cx(NOW),
            SkillKind::Shield,
            10,
            &mut DoubleRates,
            &mut Vec::new(),
        );

        assert_eq!(character.skill(SkillKind::Shield).tries, 20);
    }

    #[test]
    fn level_up_grows_and_refills_resources() {
        let fx = Fixture::new();
        let mut character = knight();
        character.health.set_current(10);
        let mut sink = Vec::new();

        let gained = add_experience(
            &mut character,
            &fx.cx(NOW),
            5_100,
            None,
            false,
            &mut BaseRates,
            &mut sink,
        );

        assert_eq!(gained, 2);
        assert_eq!(character.level(), 10);
        assert_eq!(character.health.maximum, 215);
        assert_eq!(character.health.current, 215);
        assert_eq!(character.mana.maximum, 45);
        assert_eq!(character.capacity, 52_000);
        assert_eq!(character.base_speed, 238);
        assert_eq!(character.progression.level_percent, 0.0);
        assert!(sink.contains(&Notification::text(
            MessageClass::EventAdvance,
            "You advanced from Level 8 to Level 10."
        )));
        assert_eq!(sink.last(), Some(&Notification::Stats));
    }

    #[test]
    fn early_levels_use_starter_gains() {
        let fx = Fixture::new();
        let mut character = Character::builder(CreatureId(3), "Rookie")
            .vocation(KNIGHT)
            .health(150)
            .capacity(40_000)
            .build();

        add_experience(
            &mut character,
            &fx.cx(NOW),
            100,
            None,
            false,
            &mut BaseRates,
            &mut Vec::new(),
        );

        let starter = Vocation::default();
        assert_eq!(character.level(), 2);
        assert_eq!(character.health.maximum, 150 + starter.hp_gain);
        assert_eq!(character.capacity, 40_000 + starter.cap_gain);
    }

    #[test]
    fn announced_experience_reaches_spectators() {
        let fx = Fixture::new();
        let mut character = knight();
        let mut sink = Vec::new();

        add_experience(
            &mut character,
            &fx.cx(NOW),
            1_100,
            Some(CreatureId(99)),
            true,
            &mut DoubleRates,
            &mut sink,
        );

        assert_eq!(character.progression.experience, 6_400);
        assert_eq!(character.level(), 9);
        assert_eq!(
            sink[..2],
            [
                Notification::text(
                    MessageClass::ExperienceGain,
                    "You gained 2200 experience points."
                ),
                Notification::text(
                    MessageClass::Spectator,
                    "Sir Test gained 2200 experience points."
                ),
            ]
        );
    }

    #[test]
    fn leveling_is_monotonic_over_a_gain_sequence() {
        let fx = Fixture::new();
        let mut character = knight();
        let cx = fx.cx(NOW);
        let max_level = cx.config.max_level;
        let mut expected = character.progression.experience;

        for amount in [0, 1, 399, 2_500, 17, 100_000, 0, 1_000_000, 3] {
            let before = character.level();
            let gained = add_experience(
                &mut character,
                &cx,
                amount,
                None,
                false,
                &mut BaseRates,
                &mut Vec::new(),
            );
            expected += amount;

            let level = character.level();
            assert!(level >= before, "level dropped after gaining {amount}");
            assert_eq!(level - before, gained);
            assert_eq!(character.progression.experience, expected);
            assert!(exp_for_level(level, max_level) <= expected);
            assert!(expected < exp_for_level(level + 1, max_level));
        }
    }

    #[test]
    fn max_level_blocks_experience() {
        let mut fx = Fixture::new();
        fx.config = GameConfig {
            max_level: 8,
            ..GameConfig::default()
        };
        let mut character = knight();
        let mut sink = Vec::new();

        let gained = add_experience(
            &mut character,
            &fx.cx(NOW),
            10_000,
            None,
            false,
            &mut BaseRates,
            &mut sink,
        );

        assert_eq!(gained, 0);
        assert_eq!(character.progression.experience, 4_200);
        assert_eq!(sink, vec![Notification::Stats]);
    }

    #[test]
    fn level_loss_shrinks_without_refilling() {
        let fx = Fixture::new();
        let mut character = Character::builder(CreatureId(4), "Veteran")
            .vocation(KNIGHT)
            .health(215)
            .mana(45)
            .capacity(52_000)
            .level(10, 9_300)
            .build();
        character.health.set_current(100);
        let mut sink = Vec::new();

        let lost = remove_experience(
            &mut character,
            &fx.cx(NOW),
            5_100,
            false,
            &mut BaseRates,
            &mut sink,
        );

        // level 9 drops the knight gain, level 8 the starter gain
        let starter = Vocation::default();
        assert_eq!(lost, 2);
        assert_eq!(character.level(), 8);
        assert_eq!(character.health.maximum, 215 - 15 - starter.hp_gain);
        assert_eq!(character.health.current, 100);
        assert_eq!(character.progression.level_percent, 0.0);
        assert!(sink.contains(&Notification::text(
            MessageClass::EventAdvance,
            "You were downgraded from Level 10 to Level 8."
        )));
    }

    #[test]
    fn experience_never_goes_negative() {
        let fx = Fixture::new();
        let mut character = knight();

        remove_experience(
            &mut character,
            &fx.cx(NOW),
            u64::MAX,
            true,
            &mut BaseRates,
            &mut Vec::new(),
        );

        assert_eq!(character.progression.experience, 0);
        assert_eq!(character.level(), 1);
    }
}
