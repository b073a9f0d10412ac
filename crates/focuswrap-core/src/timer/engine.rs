//! Countdown timer implementation.
//!
//! The timer is a tick-driven state machine. It does not use internal
//! threads or read the clock - the caller invokes `tick()` once per second
//! while the session is running.
//!
//! ## State Transitions
//!
//! ```text
//! Unarmed -> Armed -> Running <-> Paused
//!                        |
//!                        v
//!               Expired | Stopped  (terminal until re-armed)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Unarmed,
    Armed,
    Running,
    Paused,
    /// Reached zero. Stays here until `arm()` is called again.
    Expired,
    /// Ended early with time left. Terminal until re-armed.
    Stopped,
}

/// Flat view of the timer for display and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u64,
    pub running: bool,
    pub paused: bool,
}

/// What a single `tick()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Timer was not running; nothing changed.
    Idle,
    /// One second was consumed and time remains.
    Counted { remaining_secs: u64 },
    /// This tick brought the timer to zero. Reported exactly once.
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    status: TimerStatus,
    duration_secs: u64,
    remaining_secs: u64,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Unarmed,
            duration_secs: 0,
            remaining_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.duration_secs.saturating_sub(self.remaining_secs)
    }

    pub fn is_expired(&self) -> bool {
        self.status == TimerStatus::Expired
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            remaining_secs: self.remaining_secs,
            running: matches!(self.status, TimerStatus::Running | TimerStatus::Paused),
            paused: self.status == TimerStatus::Paused,
        }
    }

    /// 0.0 .. 1.0 fraction of the duration already consumed.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.elapsed_secs() as f64 / self.duration_secs as f64
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.remaining_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a fresh duration. Valid from any state; discards prior progress.
    pub fn arm(&mut self, duration_secs: u64) {
        self.status = TimerStatus::Armed;
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
    }

    /// Returns `true` if the timer went from Armed to Running.
    pub fn start(&mut self) -> bool {
        match self.status {
            TimerStatus::Armed => {
                self.status = TimerStatus::Running;
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.status {
            TimerStatus::Running => {
                self.status = TimerStatus::Paused;
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        match self.status {
            TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                true
            }
            _ => false,
        }
    }

    /// Consume one second. No-op unless Running.
    pub fn tick(&mut self) -> TickResult {
        if self.status != TimerStatus::Running {
            return TickResult::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.status = TimerStatus::Expired;
            TickResult::Expired
        } else {
            TickResult::Counted {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Freeze the timer where it is (user ended early).
    pub fn stop(&mut self) -> bool {
        match self.status {
            TimerStatus::Running | TimerStatus::Paused => {
                self.status = TimerStatus::Stopped;
                true
            }
            _ => false,
        }
    }
}

/// Format seconds as zero-padded `MM:SS`. Minutes keep counting past 59.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
