//! Pure session controller.
//!
//! The machine reads no clock and performs no I/O. Each command returns a
//! [`Reaction`]: events for the front end plus [`Effect`]s the driver must
//! carry out against the monitoring services.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::state::{EndReason, SessionPhase, SessionState};
use crate::checklist::ChecklistTracker;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::monitoring::MonitoringCounts;
use crate::outcome::{aggregate, DisplayHandoff, SessionOutcome};
use crate::plan::StudyPlan;
use crate::timer::{CountdownTimer, TickResult};

/// Remote work requested by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartMonitoring,
    StepMonitoring,
    EndMonitoring,
}

#[derive(Debug, Default)]
pub struct Reaction {
    pub events: Vec<Event>,
    pub effects: Vec<Effect>,
}

impl Reaction {
    fn event(event: Event) -> Self {
        Self {
            events: vec![event],
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SessionMachine {
    state: SessionState,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::idle(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Id of the current armed session. `None` while Idle.
    pub fn session_id(&self) -> Option<Uuid> {
        match self.state.phase {
            SessionPhase::Idle => None,
            _ => Some(self.state.id),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn plan(&self) -> Option<&StudyPlan> {
        self.state.plan.as_ref()
    }

    pub fn checklist(&self) -> &ChecklistTracker {
        &self.state.checklist
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.state.timer
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.state.end_reason
    }

    pub fn counts(&self) -> Option<&MonitoringCounts> {
        self.state.counts.as_ref()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.state.outcome.as_ref()
    }

    /// Flat values for the results view, once the session is concluded.
    pub fn handoff(&self) -> Option<DisplayHandoff> {
        self.state.outcome.as_ref().map(|outcome| {
            DisplayHandoff::new(
                outcome,
                self.state.checklist.completed_count(),
                self.state.checklist.len(),
            )
        })
    }

    /// Whether a remote result tagged with `session_id` should still be applied.
    pub fn accepts_remote(&self, session_id: Uuid) -> bool {
        self.state.phase == SessionPhase::Running && self.session_id() == Some(session_id)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            remaining_secs: self.state.timer.remaining_secs(),
            display: self.state.timer.display(),
            completed: self.state.checklist.completed_count(),
            total: self.state.checklist.len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a plan, discarding any previous session.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] while a session is Running or Paused.
    pub fn arm(&mut self, plan: StudyPlan) -> Result<Reaction> {
        match self.state.phase {
            SessionPhase::Idle | SessionPhase::Armed | SessionPhase::Ended => {}
            phase => return Err(invalid(phase, "arm")),
        }

        self.state = SessionState::armed(plan);
        info!(
            session_id = %self.state.id,
            duration_secs = self.state.timer.duration_secs(),
            items = self.state.checklist.len(),
            "session armed"
        );
        Ok(Reaction::event(Event::PlanArmed {
            session_id: self.state.id,
            duration_secs: self.state.timer.duration_secs(),
            checklist_len: self.state.checklist.len(),
            at: Utc::now(),
        }))
    }

    /// Start an armed session. From Paused this behaves as [`Self::resume`].
    pub fn start(&mut self) -> Result<Reaction> {
        match self.state.phase {
            SessionPhase::Armed => {}
            SessionPhase::Paused => return self.resume(),
            phase => return Err(invalid(phase, "start")),
        }

        self.state.timer.start();
        self.state.phase = SessionPhase::Running;
        let mut reaction = Reaction::event(Event::SessionStarted {
            session_id: self.state.id,
            remaining_secs: self.state.timer.remaining_secs(),
            at: Utc::now(),
        });
        if !self.state.monitoring_started {
            self.state.monitoring_started = true;
            reaction = reaction.with_effect(Effect::StartMonitoring);
        }
        info!(session_id = %self.state.id, "session started");
        Ok(reaction)
    }

    pub fn pause(&mut self) -> Result<Reaction> {
        if self.state.phase != SessionPhase::Running {
            return Err(invalid(self.state.phase, "pause"));
        }
        self.state.timer.pause();
        self.state.phase = SessionPhase::Paused;
        info!(session_id = %self.state.id, "session paused");
        Ok(Reaction::event(Event::SessionPaused {
            remaining_secs: self.state.timer.remaining_secs(),
            at: Utc::now(),
        }))
    }

    /// Continue a paused session. Monitoring is not restarted.
    pub fn resume(&mut self) -> Result<Reaction> {
        if self.state.phase != SessionPhase::Paused {
            return Err(invalid(self.state.phase, "resume"));
        }
        self.state.timer.resume();
        self.state.phase = SessionPhase::Running;
        info!(session_id = %self.state.id, "session resumed");
        Ok(Reaction::event(Event::SessionResumed {
            remaining_secs: self.state.timer.remaining_secs(),
            at: Utc::now(),
        }))
    }

    pub fn toggle(&mut self, index: usize) -> Result<Reaction> {
        match self.state.phase {
            SessionPhase::Armed | SessionPhase::Running | SessionPhase::Paused => {}
            phase => return Err(invalid(phase, "toggle checklist")),
        }
        let completed = self.state.checklist.toggle(index)?;
        Ok(Reaction::event(Event::ChecklistToggled {
            index,
            completed,
            completion_ratio: self.state.checklist.completion_ratio(),
            at: Utc::now(),
        }))
    }

    /// Advance one second. A no-op outside Running.
    ///
    /// A counted tick asks for one monitoring step. The expiring tick ends
    /// the session instead.
    pub fn tick(&mut self) -> Reaction {
        if self.state.phase != SessionPhase::Running {
            return Reaction::default();
        }

        match self.state.timer.tick() {
            TickResult::Idle => Reaction::default(),
            TickResult::Counted { remaining_secs } => Reaction::event(Event::Tick {
                remaining_secs,
                display: self.state.timer.display(),
                at: Utc::now(),
            })
            .with_effect(Effect::StepMonitoring),
            TickResult::Expired => {
                let mut reaction = Reaction::event(Event::Tick {
                    remaining_secs: 0,
                    display: self.state.timer.display(),
                    at: Utc::now(),
                });
                reaction.events.push(Event::TimerExpired { at: Utc::now() });
                let ended = self.finish(EndReason::TimerExpired);
                reaction.events.extend(ended.events);
                reaction.effects.extend(ended.effects);
                reaction
            }
        }
    }

    /// End the session early.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless Running or Paused.
    pub fn end(&mut self) -> Result<Reaction> {
        match self.state.phase {
            SessionPhase::Running | SessionPhase::Paused => {}
            phase => return Err(invalid(phase, "end")),
        }
        self.state.timer.stop();
        Ok(self.finish(EndReason::UserEnded))
    }

    /// Apply the final monitoring counts and compute the outcome.
    ///
    /// Calling it again after a successful conclusion returns the
    /// same outcome without recomputing it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] unless the session has ended.
    pub fn conclude(&mut self, counts: MonitoringCounts) -> Result<Reaction> {
        if self.state.phase != SessionPhase::Ended {
            return Err(invalid(self.state.phase, "conclude"));
        }
        if self.state.outcome.is_some() {
            return Ok(Reaction::default());
        }

        let outcome = aggregate(self.state.checklist.completion_ratio(), &counts);
        self.state.counts = Some(counts);
        self.state.outcome = Some(outcome);
        info!(
            session_id = %self.state.id,
            productivity = outcome.productivity_percent,
            checklist = outcome.checklist_percent,
            focus = outcome.focus_score,
            "session concluded"
        );

        let handoff = DisplayHandoff::new(
            &outcome,
            self.state.checklist.completed_count(),
            self.state.checklist.len(),
        );
        Ok(Reaction::event(Event::OutcomeReady {
            session_id: self.state.id,
            outcome,
            counts,
            handoff,
            at: Utc::now(),
        }))
    }

    fn finish(&mut self, reason: EndReason) -> Reaction {
        self.state.phase = SessionPhase::Ended;
        self.state.end_reason = Some(reason);
        info!(session_id = %self.state.id, ?reason, "session ended");
        Reaction::event(Event::SessionEnded {
            session_id: self.state.id,
            reason,
            remaining_secs: self.state.timer.remaining_secs(),
            at: Utc::now(),
        })
        .with_effect(Effect::EndMonitoring)
    }
}

fn invalid(phase: SessionPhase, action: &'static str) -> CoreError {
    CoreError::InvalidTransition { phase, action }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(secs: u64, items: &[&str]) -> StudyPlan {
        StudyPlan::new(secs, items.iter().map(|s| s.to_string()).collect(), None).unwrap()
    }

    fn armed(secs: u64) -> SessionMachine {
        let mut machine = SessionMachine::new();
        machine.arm(plan(secs, &["read", "write"])).unwrap();
        machine
    }

    #[test]
    fn new_machine_is_idle() {
        let machine = SessionMachine::new();
        assert_eq!(machine.phase(), SessionPhase::Idle);
        assert!(machine.session_id().is_none());
        assert!(machine.handoff().is_none());
    }

    #[test]
    fn arm_loads_plan() {
        let machine = armed(90);
        assert_eq!(machine.phase(), SessionPhase::Armed);
        assert_eq!(machine.timer().remaining_secs(), 90);
        assert_eq!(machine.checklist().len(), 2);
        assert!(machine.session_id().is_some());
    }

    #[test]
    fn first_start_requests_monitoring_once() {
        let mut machine = armed(60);
        let started = machine.start().unwrap();
        assert_eq!(started.effects, vec![Effect::StartMonitoring]);
        assert_eq!(machine.phase(), SessionPhase::Running);

        machine.pause().unwrap();
        let resumed = machine.start().unwrap();
        assert!(resumed.effects.is_empty());
        assert_eq!(machine.phase(), SessionPhase::Running);
    }

    #[test]
    fn resume_does_not_restart_monitoring() {
        let mut machine = armed(60);
        machine.start().unwrap();
        machine.pause().unwrap();
        let reaction = machine.resume().unwrap();
        assert!(reaction.effects.is_empty());
        assert!(matches!(reaction.events[0], Event::SessionResumed { .. }));
    }

    #[test]
    fn ticks_step_only_while_running() {
        let mut machine = armed(60);
        assert!(machine.tick().is_empty());

        machine.start().unwrap();
        assert_eq!(machine.tick().effects, vec![Effect::StepMonitoring]);
        assert_eq!(machine.timer().remaining_secs(), 59);

        machine.pause().unwrap();
        assert!(machine.tick().is_empty());
        assert_eq!(machine.timer().remaining_secs(), 59);
    }

    #[test]
    fn expiring_tick_ends_without_step() {
        let mut machine = armed(2);
        machine.start().unwrap();
        machine.tick();
        let last = machine.tick();

        assert_eq!(last.effects, vec![Effect::EndMonitoring]);
        assert!(last
            .events
            .iter()
            .any(|e| matches!(e, Event::TimerExpired { .. })));
        assert_eq!(machine.phase(), SessionPhase::Ended);
        assert_eq!(machine.end_reason(), Some(EndReason::TimerExpired));
        assert!(machine.tick().is_empty());
    }

    #[test]
    fn end_from_running_or_paused() {
        let mut machine = armed(60);
        machine.start().unwrap();
        let reaction = machine.end().unwrap();
        assert_eq!(reaction.effects, vec![Effect::EndMonitoring]);
        assert_eq!(machine.end_reason(), Some(EndReason::UserEnded));

        let mut machine = armed(60);
        machine.start().unwrap();
        machine.pause().unwrap();
        assert!(machine.end().is_ok());
        assert_eq!(machine.phase(), SessionPhase::Ended);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut machine = SessionMachine::new();
        assert!(matches!(
            machine.start(),
            Err(CoreError::InvalidTransition {
                phase: SessionPhase::Idle,
                ..
            })
        ));
        assert!(machine.toggle(0).is_err());

        let mut machine = armed(60);
        assert!(machine.pause().is_err());
        assert!(machine.resume().is_err());
        assert!(machine.end().is_err());

        machine.start().unwrap();
        assert!(machine.arm(plan(10, &["x"])).is_err());
        assert!(machine.resume().is_err());
    }

    #[test]
    fn toggle_checklist_in_active_phases() {
        let mut machine = armed(60);
        machine.toggle(0).unwrap();
        machine.start().unwrap();
        machine.toggle(1).unwrap();
        machine.pause().unwrap();
        machine.toggle(1).unwrap();
        assert_eq!(machine.checklist().completed_count(), 1);

        assert!(matches!(
            machine.toggle(5),
            Err(CoreError::IndexOutOfRange { index: 5, len: 2 })
        ));

        machine.end().unwrap();
        assert!(machine.toggle(0).is_err());
    }

    #[test]
    fn conclude_computes_outcome() {
        let mut machine = armed(60);
        assert!(machine.conclude(MonitoringCounts::fallback()).is_err());

        machine.toggle(0).unwrap();
        machine.start().unwrap();
        machine.end().unwrap();
        let reaction = machine
            .conclude(MonitoringCounts {
                productive_visits: 3,
                unproductive_visits: 1,
                attention_score: 0.9,
            })
            .unwrap();
        assert!(matches!(reaction.events[0], Event::OutcomeReady { .. }));

        let outcome = *machine.outcome().unwrap();
        assert_eq!(outcome.productivity_percent, 75);
        assert_eq!(outcome.checklist_percent, 50);
        assert_eq!(outcome.focus_score, 90);

        let handoff = machine.handoff().unwrap();
        assert_eq!((handoff.focus, handoff.score), (75, 90));
        assert_eq!((handoff.completed, handoff.total), (1, 2));

        // second call is a no-op
        assert!(machine
            .conclude(MonitoringCounts::fallback())
            .unwrap()
            .is_empty());
        assert_eq!(machine.outcome().unwrap().focus_score, 90);
    }

    #[test]
    fn queries_expose_plan_and_final_counts() {
        let mut machine = SessionMachine::new();
        let plan =
            StudyPlan::new(120, vec!["Flashcards".into()], Some("chapter 4".into())).unwrap();
        machine.arm(plan).unwrap();
        assert_eq!(machine.plan().unwrap().notes(), Some("chapter 4"));
        assert_eq!(machine.checklist().items(), ["Flashcards"]);
        assert!(machine.counts().is_none());

        machine.start().unwrap();
        assert!(machine.state().monitoring_started);
        machine.end().unwrap();
        let counts = MonitoringCounts {
            productive_visits: 2,
            unproductive_visits: 2,
            attention_score: 0.6,
        };
        machine.conclude(counts).unwrap();
        assert_eq!(machine.counts(), Some(&counts));
        assert_eq!(machine.outcome().unwrap().productivity_percent, 50);
    }

    #[test]
    fn fallback_counts_give_neutral_focus() {
        let mut machine = armed(60);
        machine.start().unwrap();
        machine.end().unwrap();
        machine.conclude(MonitoringCounts::fallback()).unwrap();
        let outcome = machine.outcome().unwrap();
        assert_eq!(outcome.focus_score, 50);
        assert_eq!(outcome.productivity_percent, 100);
        assert_eq!(outcome.checklist_percent, 0);
    }

    #[test]
    fn rearm_after_end_resets_everything() {
        let mut machine = armed(60);
        let first_id = machine.session_id().unwrap();
        machine.toggle(0).unwrap();
        machine.start().unwrap();
        machine.tick();
        machine.end().unwrap();
        machine.conclude(MonitoringCounts::fallback()).unwrap();

        machine.arm(plan(300, &["a", "b", "c"])).unwrap();
        assert_eq!(machine.phase(), SessionPhase::Armed);
        assert_ne!(machine.session_id().unwrap(), first_id);
        assert_eq!(machine.checklist().len(), 3);
        assert_eq!(machine.checklist().completed_count(), 0);
        assert_eq!(machine.timer().remaining_secs(), 300);
        assert!(machine.outcome().is_none());

        let started = machine.start().unwrap();
        assert_eq!(started.effects, vec![Effect::StartMonitoring]);
    }

    #[test]
    fn remote_results_only_accepted_while_running_same_session() {
        let mut machine = armed(60);
        let id = machine.session_id().unwrap();
        assert!(!machine.accepts_remote(id));

        machine.start().unwrap();
        assert!(machine.accepts_remote(id));
        assert!(!machine.accepts_remote(Uuid::new_v4()));

        machine.pause().unwrap();
        assert!(!machine.accepts_remote(id));
    }
}
