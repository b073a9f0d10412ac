use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::ChecklistTracker;
use crate::monitoring::MonitoringCounts;
use crate::outcome::SessionOutcome;
use crate::plan::StudyPlan;
use crate::timer::CountdownTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Armed,
    Running,
    Paused,
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Armed => "armed",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::Ended => "ended",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    TimerExpired,
    UserEnded,
}

/// Everything known about the current session.
///
/// Owned by [`super::SessionMachine`]; replaced wholesale on every arm.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub plan: Option<StudyPlan>,
    pub checklist: ChecklistTracker,
    pub timer: CountdownTimer,
    /// Set on the first start; resume never restarts monitoring.
    pub monitoring_started: bool,
    pub end_reason: Option<EndReason>,
    pub counts: Option<MonitoringCounts>,
    pub outcome: Option<SessionOutcome>,
}

impl SessionState {
    pub fn idle() -> Self {
        Self {
            id: Uuid::nil(),
            phase: SessionPhase::Idle,
            plan: None,
            checklist: ChecklistTracker::default(),
            timer: CountdownTimer::new(),
            monitoring_started: false,
            end_reason: None,
            counts: None,
            outcome: None,
        }
    }

    pub fn armed(plan: StudyPlan) -> Self {
        let mut timer = CountdownTimer::new();
        timer.arm(plan.duration_secs());
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Armed,
            checklist: ChecklistTracker::new(plan.checklist().to_vec()),
            plan: Some(plan),
            timer,
            monitoring_started: false,
            end_reason: None,
            counts: None,
            outcome: None,
        }
    }
}
