//! Write-only notification side channel.
//!
//! The core reports everything a client would need to resync through a
//! [`NotificationSink`]. Delivery is the host's problem; the core never reads
//! back what it wrote.

use crate::state::{ItemId, Position, Skull, Slot, Track};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MessageClass {
    EventAdvance,
    ExperienceGain,
    /// Experience gain seen by others on screen.
    Spectator,
    Warning,
    Status,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// Health, mana, level, capacity or derived stats changed.
    Stats,
    /// Skill records or major stats changed.
    Skills,
    InventorySlot {
        slot: Slot,
        item: Option<ItemId>,
    },
    Text {
        class: MessageClass,
        text: String,
    },
    Advance {
        track: Track,
        from: u32,
        to: u32,
    },
    /// Rejected request, shown to the actor.
    Cancel {
        code: String,
    },
    ReLoginWindow {
        unfair_fight_reduction: u8,
    },
    BlessStatus,
    MovedToTemple(Position),
    SkullChanged(Skull),
    UnjustifiedPoints,
}

impl Notification {
    pub fn text(class: MessageClass, text: impl Into<String>) -> Self {
        Notification::Text {
            class,
            text: text.into(),
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl NotificationSink for Discard {
    fn notify(&mut self, _notification: Notification) {}
}
