//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the character and executes gameplay commands
//! one at a time, so the rules never see concurrent mutation.

mod simulation;

pub use simulation::{Command, SimulationWorker};
