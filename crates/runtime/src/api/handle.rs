//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the clock, mutating the character or streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use character_core::engine::{ScheduleHandle, ScheduledAction};
use character_core::{
    Absorbed, CreatureId, CreatureView, DeathOutcome, DerivedStats, EquipOutcome, EquipRequest,
    IncomingDamage, ItemId, ItemInstance, SkillKind, Skull, Slot,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, TickReport, Topic};
use crate::oracle::WorldEdit;
use crate::repository::CharacterSnapshot;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends a command and waits for the worker's reply.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the clock by `elapsed_ms`, running due scheduled actions,
    /// condition expiry, skull countdown and the passive overlay.
    pub async fn advance(&self, elapsed_ms: u64) -> Result<TickReport> {
        self.request(|reply| Command::Advance { elapsed_ms, reply })
            .await
    }

    pub async fn create_item(&self, item: ItemInstance) -> Result<ItemId> {
        self.request(|reply| Command::CreateItem { item, reply }).await
    }

    pub async fn equip(&self, request: EquipRequest) -> Result<EquipOutcome> {
        self.request(|reply| Command::Equip { request, reply })
            .await?
    }

    pub async fn unequip(&self, slot: Slot, count: u32) -> Result<ItemId> {
        self.request(|reply| Command::Unequip { slot, count, reply })
            .await?
    }

    /// Queue `action` to run `delay_ms` after the current clock.
    pub async fn schedule(&self, delay_ms: u64, action: ScheduledAction) -> Result<ScheduleHandle> {
        self.request(|reply| Command::Schedule {
            delay_ms,
            action,
            reply,
        })
        .await
    }

    /// Returns whether the action was still pending.
    pub async fn cancel(&self, handle: ScheduleHandle) -> Result<bool> {
        self.request(|reply| Command::Cancel { handle, reply })
            .await
    }

    /// Returns the number of levels gained.
    pub async fn add_experience(&self, amount: u64, source: Option<CreatureId>) -> Result<u32> {
        self.request(|reply| Command::AddExperience {
            amount,
            source,
            reply,
        })
        .await
    }

    /// Returns the number of levels lost.
    pub async fn remove_experience(&self, amount: u64) -> Result<u32> {
        self.request(|reply| Command::RemoveExperience { amount, reply })
            .await
    }

    pub async fn add_skill_advance(&self, skill: SkillKind, count: u64) -> Result<u32> {
        self.request(|reply| Command::AddSkillAdvance {
            skill,
            count,
            reply,
        })
        .await
    }

    pub async fn add_mana_spent(&self, amount: u64) -> Result<u32> {
        self.request(|reply| Command::AddManaSpent { amount, reply })
            .await
    }

    pub async fn enter_fight(&self, pz_lock: bool) -> Result<()> {
        self.request(|reply| Command::EnterFight { pz_lock, reply })
            .await
    }

    pub async fn damage(
        &self,
        attacker: Option<CreatureId>,
        incoming: IncomingDamage,
    ) -> Result<Absorbed> {
        self.request(|reply| Command::Damage {
            attacker,
            incoming,
            reply,
        })
        .await
    }

    pub async fn die(&self, killer: Option<CreatureView>) -> Result<DeathOutcome> {
        self.request(|reply| Command::Death { killer, reply })
            .await
    }

    pub async fn attack_player(
        &self,
        target: CreatureId,
        target_skull: Skull,
        target_attacked_us: bool,
    ) -> Result<()> {
        self.request(|reply| Command::AttackPlayer {
            target,
            target_skull,
            target_attacked_us,
            reply,
        })
        .await
    }

    pub async fn unjustified_kill(
        &self,
        target: CreatureId,
        target_name: impl Into<String>,
    ) -> Result<()> {
        let target_name = target_name.into();
        self.request(|reply| Command::UnjustifiedKill {
            target,
            target_name,
            reply,
        })
        .await
    }

    pub async fn edit_world(&self, edit: WorldEdit) -> Result<()> {
        self.request(|reply| Command::EditWorld { edit, reply })
            .await
    }

    pub async fn derived_stats(&self) -> Result<DerivedStats> {
        self.request(|reply| Command::DerivedStats { reply }).await
    }

    /// Query the current character (read-only snapshot)
    pub async fn snapshot(&self) -> Result<CharacterSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Ask the worker to stop after the commands already queued.
    pub(crate) async fn stop(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Notification` - everything the rules tell the client
    /// - `Topic::Lifecycle` - clock advances and deaths
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
