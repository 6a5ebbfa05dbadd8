//! Simulation worker that owns the authoritative [`Character`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! through a [`CharacterEngine`] built for the current clock, and publishes
//! every notification the rules emit on the event bus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use character_core::engine::{CharacterEngine, DeadlineScheduler, ScheduleHandle, ScheduledAction};
use character_core::{
    Absorbed, Character, CreatureId, CreatureView, DeathOutcome, DerivedStats, EquipOutcome,
    EquipRequest, GameConfig, IncomingDamage, ItemArena, ItemId, ItemInstance, Notification,
    RuleContext, SkillKind, Skull, Slot, Timestamp,
};

use crate::api::Result;
use crate::events::{Event, EventBus, TickReport};
use crate::oracle::{OracleManager, WorldEdit};
use crate::repository::CharacterSnapshot;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance the clock and run everything that came due.
    Advance {
        elapsed_ms: u64,
        reply: oneshot::Sender<TickReport>,
    },
    /// Store a new item instance in the arena.
    CreateItem {
        item: ItemInstance,
        reply: oneshot::Sender<ItemId>,
    },
    Equip {
        request: EquipRequest,
        reply: oneshot::Sender<Result<EquipOutcome>>,
    },
    Unequip {
        slot: Slot,
        count: u32,
        reply: oneshot::Sender<Result<ItemId>>,
    },
    /// Queue an action `delay_ms` after the current clock.
    Schedule {
        delay_ms: u64,
        action: ScheduledAction,
        reply: oneshot::Sender<ScheduleHandle>,
    },
    Cancel {
        handle: ScheduleHandle,
        reply: oneshot::Sender<bool>,
    },
    AddExperience {
        amount: u64,
        source: Option<CreatureId>,
        reply: oneshot::Sender<u32>,
    },
    RemoveExperience {
        amount: u64,
        reply: oneshot::Sender<u32>,
    },
    AddSkillAdvance {
        skill: SkillKind,
        count: u64,
        reply: oneshot::Sender<u32>,
    },
    AddManaSpent {
        amount: u64,
        reply: oneshot::Sender<u32>,
    },
    /// An aggressive action; starts or extends the fight.
    EnterFight {
        pz_lock: bool,
        reply: oneshot::Sender<()>,
    },
    /// Incoming damage from `attacker`, absorbed and recorded.
    Damage {
        attacker: Option<CreatureId>,
        incoming: IncomingDamage,
        reply: oneshot::Sender<Absorbed>,
    },
    Death {
        killer: Option<CreatureView>,
        reply: oneshot::Sender<DeathOutcome>,
    },
    AttackPlayer {
        target: CreatureId,
        target_skull: Skull,
        target_attacked_us: bool,
        reply: oneshot::Sender<()>,
    },
    UnjustifiedKill {
        target: CreatureId,
        target_name: String,
        reply: oneshot::Sender<()>,
    },
    EditWorld {
        edit: WorldEdit,
        reply: oneshot::Sender<()>,
    },
    DerivedStats {
        reply: oneshot::Sender<DerivedStats>,
    },
    /// Clone of the character, its items and the clock.
    Snapshot {
        reply: oneshot::Sender<CharacterSnapshot>,
    },
    /// Stop the worker even while handles are still alive.
    Shutdown,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    character: Character,
    arena: ItemArena,
    scheduler: DeadlineScheduler<ScheduledAction>,
    oracles: OracleManager,
    config: GameConfig,
    now: Timestamp,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        snapshot: CharacterSnapshot,
        oracles: OracleManager,
        config: GameConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            character: snapshot.character,
            arena: snapshot.arena,
            scheduler: DeadlineScheduler::new(),
            oracles,
            config,
            now: snapshot.saved_at,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop; ends when every handle is dropped.
    pub async fn run(mut self) {
        info!(target: "runtime::worker", character = %self.character.id, "simulation started");
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, Command::Shutdown) {
                info!(target: "runtime::worker", "shutdown command received");
                break;
            }
            self.handle_command(cmd);
        }
        info!(target: "runtime::worker", character = %self.character.id, "simulation stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        // A dropped reply receiver only means the caller stopped waiting.
        match cmd {
            Command::Advance { elapsed_ms, reply } => {
                let report = self.advance(elapsed_ms);
                let _ = reply.send(report);
            }
            Command::CreateItem { item, reply } => {
                let _ = reply.send(self.arena.insert(item));
            }
            Command::Equip { request, reply } => {
                let result = self.with_engine(|engine| engine.try_equip(request));
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Unequip { slot, count, reply } => {
                let result = self.with_engine(|engine| engine.try_unequip(slot, count));
                let _ = reply.send(result.map_err(Into::into));
            }
            Command::Schedule {
                delay_ms,
                action,
                reply,
            } => {
                let deadline = self.now + delay_ms;
                let handle = self.scheduler.schedule(deadline, action);
                debug!(target: "runtime::worker", ?handle, %deadline, ?action, "scheduled");
                let _ = reply.send(handle);
            }
            Command::Cancel { handle, reply } => {
                let _ = reply.send(self.scheduler.cancel(handle).is_some());
            }
            Command::AddExperience {
                amount,
                source,
                reply,
            } => {
                let levels = self.with_engine(|engine| engine.add_experience(amount, source, true));
                let _ = reply.send(levels);
            }
            Command::RemoveExperience { amount, reply } => {
                let levels = self.with_engine(|engine| engine.remove_experience(amount, true));
                let _ = reply.send(levels);
            }
            Command::AddSkillAdvance {
                skill,
                count,
                reply,
            } => {
                let levels = self.with_engine(|engine| engine.add_skill_advance(skill, count));
                let _ = reply.send(levels);
            }
            Command::AddManaSpent { amount, reply } => {
                let levels = self.with_engine(|engine| engine.add_mana_spent(amount));
                let _ = reply.send(levels);
            }
            Command::EnterFight { pz_lock, reply } => {
                self.with_engine(|engine| engine.add_in_fight_ticks(pz_lock));
                let _ = reply.send(());
            }
            Command::Damage {
                attacker,
                incoming,
                reply,
            } => {
                let absorbed = self.damage(attacker, incoming);
                let _ = reply.send(absorbed);
            }
            Command::Death { killer, reply } => {
                let outcome = self.with_engine(|engine| engine.on_death(killer.as_ref()));
                info!(
                    target: "runtime::worker",
                    character = %self.character.id,
                    levels_lost = outcome.levels_lost,
                    pvp = outcome.pvp_death,
                    "character died"
                );
                self.event_bus.publish(Event::Died {
                    character: self.character.id,
                    outcome,
                });
                let _ = reply.send(outcome);
            }
            Command::AttackPlayer {
                target,
                target_skull,
                target_attacked_us,
                reply,
            } => {
                self.with_engine(|engine| {
                    engine.on_attack_player(target, target_skull, target_attacked_us);
                });
                let _ = reply.send(());
            }
            Command::UnjustifiedKill {
                target,
                target_name,
                reply,
            } => {
                self.with_engine(|engine| engine.add_unjustified_kill(target, &target_name));
                let _ = reply.send(());
            }
            Command::EditWorld { edit, reply } => {
                self.oracles.world_mut().apply(edit);
                let _ = reply.send(());
            }
            Command::DerivedStats { reply } => {
                let stats = self.with_engine(|engine| engine.compute_derived_stats());
                let _ = reply.send(stats);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(CharacterSnapshot {
                    character: self.character.clone(),
                    arena: self.arena.clone(),
                    saved_at: self.now,
                });
            }
            Command::Shutdown => {}
        }
    }

    fn advance(&mut self, elapsed_ms: u64) -> TickReport {
        self.now = self.now + elapsed_ms;

        let mut scheduler = std::mem::take(&mut self.scheduler);
        let (scheduled_ran, overlay_changed) = self.with_engine(|engine| {
            let ran = engine.run_due(&mut scheduler);
            (ran, engine.tick(elapsed_ms))
        });
        self.scheduler = scheduler;

        let report = TickReport {
            now: self.now,
            scheduled_ran,
            overlay_changed,
        };
        self.event_bus.publish(Event::Ticked(report));
        report
    }

    /// Absorbs, records and applies a hit. A lethal hit is cancelled when
    /// Gift of Life triggers; otherwise health may reach zero and the host
    /// decides when to send [`Command::Death`].
    fn damage(&mut self, attacker: Option<CreatureId>, incoming: IncomingDamage) -> Absorbed {
        let absorbed = self.with_engine(|engine| {
            let absorbed = engine.absorb_damage(incoming);
            if absorbed.blocked {
                engine.on_block_hit();
                return absorbed;
            }
            let damage = u32::try_from(absorbed.damage.max(0)).unwrap_or(u32::MAX);
            engine.apply_damage(damage);
            absorbed
        });

        if let Some(attacker) = attacker
            && absorbed.damage > 0
        {
            self.character
                .combat
                .record_damage(attacker, absorbed.damage as u64, self.now);
        }
        absorbed
    }

    /// Runs `f` against an engine for the current clock, then publishes the
    /// notifications it produced.
    fn with_engine<R>(&mut self, f: impl FnOnce(&mut CharacterEngine<'_>) -> R) -> R {
        let mut outbox: Vec<Notification> = Vec::new();
        let result = {
            let cx = RuleContext::new(self.oracles.as_game_env(), &self.config, self.now);
            let mut engine =
                CharacterEngine::new(&mut self.character, &mut self.arena, cx, &mut outbox);
            f(&mut engine)
        };

        let character = self.character.id;
        for notification in outbox {
            self.event_bus.publish(Event::Notification {
                character,
                notification,
            });
        }
        result
    }
}
