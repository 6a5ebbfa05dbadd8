//! Per-character façade over the rule modules.
//!
//! A [`CharacterEngine`] borrows one character, the shared item arena, the
//! tick's [`RuleContext`] and a notification sink, and exposes every
//! operation a host needs. It holds no state of its own; hosts build one per
//! character per tick and drop it afterwards.
//!
//! Deferred work (delayed equips, forced passive refreshes) lives in a
//! [`DeadlineScheduler`] owned by the host and is drained through
//! [`CharacterEngine::run_due`].

mod scheduler;

pub use scheduler::{DeadlineScheduler, ScheduleHandle, ScheduledAction};

use tracing::debug;

use crate::context::RuleContext;
use crate::death::{self, DeathOutcome};
use crate::env::CreatureView;
use crate::equipment::{self, EquipError, EquipHook, EquipOutcome, EquipRequest, NoHooks};
use crate::notify::{Notification, NotificationSink};
use crate::passive;
use crate::progression::{self, BaseRates, BlockType, ProgressionHooks};
use crate::reputation;
use crate::state::{
    Character, ConditionKind, CreatureId, ItemArena, ItemId, SkillKind, Skull, Slot, Track,
};
use crate::stats::{self, Absorbed, DerivedStats, IncomingDamage};

/// Rule entry points for one character within one tick.
pub struct CharacterEngine<'a> {
    character: &'a mut Character,
    arena: &'a mut ItemArena,
    cx: RuleContext<'a>,
    sink: &'a mut dyn NotificationSink,
    equip_hook: Option<&'a mut dyn EquipHook>,
    progression_hooks: Option<&'a mut dyn ProgressionHooks>,
}

impl<'a> CharacterEngine<'a> {
    pub fn new(
        character: &'a mut Character,
        arena: &'a mut ItemArena,
        cx: RuleContext<'a>,
        sink: &'a mut dyn NotificationSink,
    ) -> Self {
        Self {
            character,
            arena,
            cx,
            sink,
            equip_hook: None,
            progression_hooks: None,
        }
    }

    pub fn with_equip_hook(mut self, hook: &'a mut dyn EquipHook) -> Self {
        self.equip_hook = Some(hook);
        self
    }

    pub fn with_progression_hooks(mut self, hooks: &'a mut dyn ProgressionHooks) -> Self {
        self.progression_hooks = Some(hooks);
        self
    }

    pub fn character(&self) -> &Character {
        self.character
    }

    pub fn arena(&self) -> &ItemArena {
        self.arena
    }

    pub fn context(&self) -> &RuleContext<'a> {
        &self.cx
    }

    // ===== derived stats =====

    pub fn compute_derived_stats(&self) -> DerivedStats {
        stats::compute_derived_stats(self.character, self.arena, &self.cx.env, self.cx.now)
    }

    /// Runs incoming damage through absorption; items that spent their last
    /// charge are removed from their slots.
    pub fn absorb_damage(&mut self, incoming: IncomingDamage) -> Absorbed {
        let absorbed = stats::absorb_damage(
            self.character,
            self.arena,
            &self.cx.env,
            incoming,
            self.cx.now,
        );
        equipment::discard_slots(
            self.character,
            self.arena,
            &self.cx,
            &absorbed.exhausted,
            self.sink,
        );
        absorbed
    }

    // ===== equipment =====

    pub fn try_equip(&mut self, request: EquipRequest) -> Result<EquipOutcome, EquipError> {
        let mut fallback = NoHooks;
        let hook: &mut dyn EquipHook = match self.equip_hook.as_deref_mut() {
            Some(hook) => hook,
            None => &mut fallback,
        };
        equipment::try_equip(self.character, self.arena, &self.cx, request, hook, self.sink)
    }

    pub fn try_unequip(&mut self, slot: Slot, count: u32) -> Result<ItemId, EquipError> {
        let mut fallback = NoHooks;
        let hook: &mut dyn EquipHook = match self.equip_hook.as_deref_mut() {
            Some(hook) => hook,
            None => &mut fallback,
        };
        equipment::try_unequip(self.character, self.arena, &self.cx, slot, count, hook, self.sink)
    }

    fn with_progression<R>(
        &mut self,
        run: impl FnOnce(
            &mut Character,
            &mut ItemArena,
            &RuleContext<'a>,
            &mut dyn ProgressionHooks,
            &mut dyn NotificationSink,
        ) -> R,
    ) -> R {
        let mut fallback = BaseRates;
        let hooks: &mut dyn ProgressionHooks = match self.progression_hooks.as_deref_mut() {
            Some(hooks) => hooks,
            None => &mut fallback,
        };
        run(self.character, self.arena, &self.cx, hooks, self.sink)
    }

    // ===== progression =====

    pub fn add_experience(
        &mut self,
        amount: u64,
        source: Option<CreatureId>,
        announce: bool,
    ) -> u32 {
        self.with_progression(|character, _, cx, hooks, sink| {
            progression::add_experience(character, cx, amount, source, announce, hooks, sink)
        })
    }

    pub fn remove_experience(&mut self, amount: u64, announce: bool) -> u32 {
        self.with_progression(|character, _, cx, hooks, sink| {
            progression::remove_experience(character, cx, amount, announce, hooks, sink)
        })
    }

    pub fn add_skill_advance(&mut self, skill: SkillKind, count: u64) -> u32 {
        self.with_progression(|character, _, cx, hooks, sink| {
            progression::add_skill_advance(character, cx, skill, count, hooks, sink)
        })
    }

    pub fn add_mana_spent(&mut self, amount: u64) -> u32 {
        self.with_progression(|character, _, cx, hooks, sink| {
            progression::add_mana_spent(character, cx, amount, hooks, sink)
        })
    }

    pub fn add_offline_training_tries(&mut self, track: Track, tries: u64) -> bool {
        self.with_progression(|character, _, cx, hooks, sink| {
            progression::add_offline_training_tries(character, cx, track, tries, hooks, sink)
        })
    }

    pub fn on_block_hit(&mut self) {
        self.with_progression(|character, arena, cx, hooks, sink| {
            progression::on_block_hit(character, arena, cx, hooks, sink)
        });
    }

    pub fn on_attacked_creature_block_hit(&mut self, block: BlockType) {
        progression::on_attacked_creature_block_hit(self.character, block);
    }

    // ===== passive overlay =====

    pub fn on_combat_tick(&mut self, force: bool) -> bool {
        passive::on_combat_tick(self.character, self.arena, &self.cx, force, self.sink)
    }

    pub fn add_in_fight_ticks(&mut self, pz_lock: bool) {
        passive::add_in_fight_ticks(self.character, self.arena, &self.cx, pz_lock, self.sink);
    }

    /// Returns true when Gift of Life cancelled a lethal hit.
    pub fn trigger_gift_of_life(&mut self, damage: u32) -> bool {
        passive::trigger_gift_of_life(self.character, &self.cx, damage, self.sink)
    }

    /// Takes `damage` off health, unless it is lethal and Gift of Life saves
    /// the character. Returns whether the character is still alive.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        if damage == 0 {
            return true;
        }
        if self.trigger_gift_of_life(damage) {
            return true;
        }
        let health = &mut self.character.health;
        health.set_current(health.current.saturating_sub(damage));
        self.sink.notify(Notification::Stats);
        self.character.health.current > 0
    }

    // ===== death and reputation =====

    pub fn on_death(&mut self, killer: Option<&CreatureView>) -> DeathOutcome {
        self.with_progression(|character, _, cx, hooks, sink| {
            death::on_death(character, cx, killer, hooks, sink)
        })
    }

    pub fn add_unjustified_kill(&mut self, target: CreatureId, target_name: &str) {
        reputation::add_unjustified_kill(self.character, &self.cx, target, target_name, self.sink);
    }

    pub fn on_retaliation(&mut self, avenger: CreatureId) {
        reputation::on_retaliation(self.character, avenger);
    }

    pub fn on_attack_player(
        &mut self,
        target: CreatureId,
        target_skull: Skull,
        target_attacked_us: bool,
    ) {
        reputation::on_attack_player(
            self.character,
            &self.cx,
            target,
            target_skull,
            target_attacked_us,
            self.sink,
        );
    }

    // ===== tick =====

    /// Per-tick housekeeping.
    ///
    /// Drops expired conditions (ending the fight when in-fight ran out),
    /// counts skull time down by `elapsed_ms` and refreshes the passive
    /// overlay. Returns whether the overlay changed.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        let now = self.cx.now;
        let expired = self.character.combat.conditions.remove_expired(now);
        if expired.contains(&ConditionKind::InFight) {
            debug!(character = %self.character.id, "fight ended");
            reputation::on_in_fight_end(self.character, self.sink);
            self.character
                .combat
                .prune_damage(now, self.cx.config.in_fight_window_ms);
        }
        let in_fight = self.character.is_in_fight(now);
        reputation::check_skull_ticks(self.character, elapsed_ms, in_fight, self.sink);
        self.on_combat_tick(false)
    }

    /// Runs every scheduled action due at the context time; returns how many
    /// ran. Rejected equips are reported through the sink like direct ones.
    pub fn run_due(&mut self, scheduler: &mut DeadlineScheduler<ScheduledAction>) -> usize {
        let mut ran = 0;
        while let Some((handle, action)) = scheduler.pop_due(self.cx.now) {
            debug!(character = %self.character.id, ?handle, ?action, "running scheduled action");
            match action {
                ScheduledAction::Equip(request) => {
                    let _ = self.try_equip(request);
                }
                ScheduledAction::Unequip { slot, count } => {
                    let _ = self.try_unequip(slot, count);
                }
                ScheduledAction::ForcePassiveRefresh => {
                    self.on_combat_tick(true);
                }
            }
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Condition, MajorStat, PassiveKind, ResourceMeter, SlotTarget, Timestamp};
    use crate::testing::*;

    const NOW: Timestamp = Timestamp(50_000);

    #[test]
    fn equip_and_progress_through_the_facade() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let sword = fx.spawn(SWORD);
        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(NOW);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);

        let outcome = engine
            .try_equip(EquipRequest::new(sword, SlotTarget::Named(Slot::Left)))
            .unwrap();
        assert_eq!(outcome.placed, sword);
        assert_eq!(engine.compute_derived_stats(), engine.character().combat.cached);
        assert_eq!(engine.add_skill_advance(SkillKind::Sword, 105), 2);
        assert_eq!(engine.character().inventory_weight, 3_500);

        drop(engine);
        assert!(sink.contains(&Notification::InventorySlot {
            slot: Slot::Left,
            item: Some(sword),
        }));
    }

    #[test]
    fn tick_ends_fight_and_clears_overlay() {
        let mut fx = Fixture::new();
        let mut character = knight();
        character.passives.unlock(PassiveKind::PositionalTactics, 1);
        character.reputation.skull = Skull::White;
        character
            .combat
            .conditions
            .add(Condition::timed(ConditionKind::InFight, NOW + 1_000));

        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(NOW);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);
        assert!(engine.tick(1_000));
        assert_eq!(engine.character().passives.major(MajorStat::Distance), 3);
        drop(engine);

        let (cx, arena) = fx.cx_mut(NOW + 1_000);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);
        assert!(engine.tick(1_000));
        drop(engine);

        assert_eq!(character.passives.major(MajorStat::Distance), 0);
        assert_eq!(character.reputation.skull, Skull::None);
        assert!(sink.contains(&Notification::SkullChanged(Skull::None)));
    }

    #[test]
    fn fight_end_forgets_stale_attackers() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let end = Timestamp(400_000);
        character
            .combat
            .conditions
            .add(Condition::timed(ConditionKind::InFight, end));
        character.combat.record_damage(CreatureId(20), 300, NOW);
        character.combat.record_damage(CreatureId(21), 40, Timestamp(390_000));

        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(end);
        CharacterEngine::new(&mut character, arena, cx, &mut sink).tick(1_000);

        let attackers: Vec<_> = character.combat.damage_map.keys().copied().collect();
        assert_eq!(attackers, vec![CreatureId(21)]);
    }

    #[test]
    fn scheduled_actions_run_when_due() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let helmet = fx.spawn(HELMET);
        let mut scheduler = DeadlineScheduler::new();
        scheduler.schedule(
            NOW + 500,
            ScheduledAction::Equip(EquipRequest::new(helmet, SlotTarget::Named(Slot::Head))),
        );
        let cancelled = scheduler.schedule(
            NOW + 100,
            ScheduledAction::Unequip {
                slot: Slot::Head,
                count: 1,
            },
        );
        scheduler.cancel(cancelled);

        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(NOW);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);
        assert_eq!(engine.run_due(&mut scheduler), 0);
        drop(engine);

        let (cx, arena) = fx.cx_mut(NOW + 500);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);
        assert_eq!(engine.run_due(&mut scheduler), 1);
        drop(engine);

        assert_eq!(character.equipment.get(Slot::Head), Some(helmet));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn death_through_the_facade() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(NOW);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);

        let outcome = engine.on_death(Some(&CreatureView::monster(CreatureId(300))));
        assert_eq!(outcome.levels_lost, 1);
        assert_eq!(engine.character().level(), 7);
    }

    #[test]
    fn lethal_damage_is_cancelled_once_by_gift_of_life() {
        let mut fx = Fixture::new();
        let mut character = knight();
        character.health = ResourceMeter::new(100, 1_000);
        character.passives.unlock(PassiveKind::GiftOfLife, 1);
        let mut sink = Vec::new();
        let (cx, arena) = fx.cx_mut(NOW);
        let mut engine = CharacterEngine::new(&mut character, arena, cx, &mut sink);

        assert!(engine.apply_damage(40));
        assert_eq!(engine.character().health.current, 60);

        // 20 % of 1000 healed, the hit itself never lands
        assert!(engine.apply_damage(500));
        assert_eq!(engine.character().health.current, 260);

        assert!(!engine.apply_damage(500));
        assert_eq!(engine.character().health.current, 0);
    }
}
