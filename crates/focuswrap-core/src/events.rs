use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::monitoring::MonitoringCounts;
use crate::outcome::{DisplayHandoff, SessionOutcome};
use crate::session::{EndReason, SessionPhase};

/// Every state change in a session produces an Event.
/// Front ends render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PlanArmed {
        session_id: Uuid,
        duration_secs: u64,
        checklist_len: usize,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: Uuid,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    TimerExpired {
        at: DateTime<Utc>,
    },
    ChecklistToggled {
        index: usize,
        completed: bool,
        completion_ratio: f64,
        at: DateTime<Utc>,
    },
    /// A monitoring call failed. The session carries on.
    MonitoringDegraded {
        service: String,
        call: String,
        message: String,
        at: DateTime<Utc>,
    },
    /// A command was not valid in the current phase.
    CommandRejected {
        command: String,
        reason: String,
        at: DateTime<Utc>,
    },
    SessionEnded {
        session_id: Uuid,
        reason: EndReason,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    OutcomeReady {
        session_id: Uuid,
        outcome: SessionOutcome,
        counts: MonitoringCounts,
        handoff: DisplayHandoff,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: SessionPhase,
        remaining_secs: u64,
        display: String,
        completed: usize,
        total: usize,
        at: DateTime<Utc>,
    },
}
