//! Rate and stamina adjustments applied before gains reach the ledger.

use crate::state::{Character, CreatureId, Track};

/// Lets the host scale or veto progression amounts.
///
/// Returning 0 from an adjust method cancels the gain without touching the
/// ledger.
pub trait ProgressionHooks {
    fn adjust_experience(
        &mut self,
        _character: &Character,
        _source: Option<CreatureId>,
        amount: u64,
    ) -> u64 {
        amount
    }

    fn adjust_experience_loss(&mut self, _character: &Character, amount: u64) -> u64 {
        amount
    }

    /// Called for skill tries and mana spent; `track` is never `Level`.
    fn adjust_tries(&mut self, _character: &Character, _track: Track, tries: u64) -> u64 {
        tries
    }

    fn on_advance(&mut self, _character: &Character, _track: Track, _from: u32, _to: u32) {}
}

/// Applies every amount as given.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseRates;

impl ProgressionHooks for BaseRates {}
