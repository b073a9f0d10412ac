mod engine;

pub use engine::{format_time, CountdownTimer, TickResult, TimerState, TimerStatus};
