//! Reputation (skull) state and the unjustified-kill record.

use std::collections::BTreeSet;

use crate::state::{CreatureId, Timestamp};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Skull {
    #[default]
    None,
    Yellow,
    Green,
    White,
    Red,
    Black,
    Orange,
}

impl Skull {
    /// Skulls that only time (not leaving combat) can remove.
    pub const fn is_sticky(self) -> bool {
        matches!(self, Skull::Red | Skull::Black)
    }
}

/// One unjustified kill. Records are never deleted; the day/week/month
/// windows decide whether they still count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnjustifiedKill {
    pub target: CreatureId,
    pub at: Timestamp,
    /// Cleared once the victim retaliates.
    pub unavenged: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reputation {
    pub skull: Skull,
    /// Remaining skull duration in milliseconds.
    pub skull_ticks: i64,
    pub kills: Vec<UnjustifiedKill>,
    /// Characters this one attacked during the current fight.
    pub attacked: BTreeSet<CreatureId>,
}
