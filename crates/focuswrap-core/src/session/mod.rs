//! Session lifecycle: a pure state machine plus the async runner that
//! drives it against the clock and the monitoring services.

mod machine;
mod runner;
mod state;

pub use machine::{Effect, Reaction, SessionMachine};
pub use runner::{Command, SessionReport, SessionRunner, TICK_PERIOD};
pub use state::{EndReason, SessionPhase, SessionState};
