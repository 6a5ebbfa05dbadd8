//! Read-only inputs shared by every rule call within one tick.

use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::state::Timestamp;

/// Oracles, configuration and the tick clock.
///
/// `now` is sampled once per tick by the host and passed down unchanged, so
/// every rule evaluated in the same tick agrees on the time.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub env: GameEnv<'a>,
    pub config: &'a GameConfig,
    pub now: Timestamp,
}

impl<'a> RuleContext<'a> {
    pub fn new(env: GameEnv<'a>, config: &'a GameConfig, now: Timestamp) -> Self {
        Self { env, config, now }
    }

    /// Same oracles and configuration at a later time.
    pub fn at(self, now: Timestamp) -> Self {
        Self { now, ..self }
    }
}
