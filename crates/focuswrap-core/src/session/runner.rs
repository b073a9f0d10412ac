//! Async driver for [`SessionMachine`].
//!
//! One task owns the machine and multiplexes three inputs with
//! `tokio::select!`: the one-second ticker, user commands, and results of
//! remote monitoring calls running in [`JoinSet`]s. Remote calls never block
//! ticking. Step results are dropped unless they belong to the current
//! session and the session is still Running.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::machine::{Effect, Reaction, SessionMachine};
use super::state::{EndReason, SessionPhase};
use crate::error::Result;
use crate::events::Event;
use crate::monitoring::{
    EndReport, MonitoringBackend, MonitoringBridge, StartReport, ServiceStatus,
    ATTENTION_SERVICE, DOMAIN_SERVICE,
};
use crate::outcome::{DisplayHandoff, SessionOutcome};
use crate::plan::StudyPlan;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// User input for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Toggle(usize),
    End,
    Status,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Toggle(_) => "toggle",
            Command::End => "end",
            Command::Status => "status",
        }
    }
}

/// Everything a front end needs once a session has concluded.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub reason: EndReason,
    pub outcome: SessionOutcome,
    pub handoff: DisplayHandoff,
    pub monitoring: EndReport,
}

enum RemoteResult {
    Started { session_id: Uuid, report: StartReport },
    Stepped { session_id: Uuid, status: ServiceStatus },
}

pub struct SessionRunner<B: MonitoringBackend> {
    machine: SessionMachine,
    bridge: MonitoringBridge<B>,
    events: mpsc::UnboundedSender<Event>,
    starts: JoinSet<RemoteResult>,
    steps: JoinSet<RemoteResult>,
    step_failing: bool,
}

impl<B: MonitoringBackend> SessionRunner<B> {
    pub fn new(bridge: MonitoringBridge<B>, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            machine: SessionMachine::new(),
            bridge,
            events,
            starts: JoinSet::new(),
            steps: JoinSet::new(),
            step_failing: false,
        }
    }

    /// Arm the runner's machine with a plan and emit `PlanArmed`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidTransition`] if a session is in progress.
    pub fn arm(&mut self, plan: StudyPlan) -> Result<()> {
        let reaction = self.machine.arm(plan)?;
        self.step_failing = false;
        for event in reaction.events {
            self.emit(event);
        }
        Ok(())
    }

    /// Drive the armed session until it ends.
    ///
    /// Returns `None` if the command channel closes before the session was
    /// started. Closing it while Running or Paused ends the session.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Option<SessionReport> {
        let mut ticker = time::interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let reaction = self.machine.tick();
                    if let Some(report) = self.apply(reaction).await {
                        return Some(report);
                    }
                }

                command = commands.recv(), if commands_open => {
                    let command = match command {
                        Some(command) => command,
                        None => {
                            commands_open = false;
                            match self.machine.phase() {
                                SessionPhase::Running | SessionPhase::Paused => {
                                    info!("command channel closed, ending session");
                                    Command::End
                                }
                                _ => {
                                    info!("command channel closed before the session started");
                                    return None;
                                }
                            }
                        }
                    };

                    let was_running = self.machine.phase() == SessionPhase::Running;
                    if let Some(report) = self.handle(command).await {
                        return Some(report);
                    }
                    if !was_running && self.machine.phase() == SessionPhase::Running {
                        // first decrement lands one full period after (re)starting
                        ticker.reset();
                    }
                }

                Some(joined) = self.starts.join_next(), if !self.starts.is_empty() => {
                    self.on_joined(joined);
                }

                Some(joined) = self.steps.join_next(), if !self.steps.is_empty() => {
                    self.on_joined(joined);
                }
            }
        }
    }

    async fn handle(&mut self, command: Command) -> Option<SessionReport> {
        let result = match command {
            Command::Start => self.machine.start(),
            Command::Pause => self.machine.pause(),
            Command::Resume => self.machine.resume(),
            Command::Toggle(index) => self.machine.toggle(index),
            Command::End => self.machine.end(),
            Command::Status => Ok(Reaction {
                events: vec![self.machine.snapshot()],
                effects: Vec::new(),
            }),
        };

        match result {
            Ok(reaction) => {
                if command == Command::Pause {
                    self.steps.abort_all();
                }
                self.apply(reaction).await
            }
            Err(err) => {
                debug!(command = command.name(), error = %err, "command rejected");
                self.emit(Event::CommandRejected {
                    command: command.name().to_string(),
                    reason: err.to_string(),
                    at: Utc::now(),
                });
                None
            }
        }
    }

    async fn apply(&mut self, reaction: Reaction) -> Option<SessionReport> {
        for event in reaction.events {
            self.emit(event);
        }

        let mut report = None;
        for effect in reaction.effects {
            match effect {
                Effect::StartMonitoring => self.spawn_start(),
                Effect::StepMonitoring => self.spawn_step(),
                Effect::EndMonitoring => report = self.finish().await,
            }
        }
        report
    }

    fn spawn_start(&mut self) {
        let Some(session_id) = self.machine.session_id() else {
            return;
        };
        let bridge = self.bridge.clone();
        self.starts.spawn(async move {
            RemoteResult::Started {
                session_id,
                report: bridge.start_session().await,
            }
        });
    }

    fn spawn_step(&mut self) {
        let Some(session_id) = self.machine.session_id() else {
            return;
        };
        let bridge = self.bridge.clone();
        self.steps.spawn(async move {
            RemoteResult::Stepped {
                session_id,
                status: bridge.step().await,
            }
        });
    }

    async fn finish(&mut self) -> Option<SessionReport> {
        self.steps.abort_all();
        // stop must not overtake an in-flight start
        while let Some(joined) = self.starts.join_next().await {
            self.on_joined(joined);
        }

        let monitoring = self.bridge.end_session().await;
        self.degraded(DOMAIN_SERVICE, "analyze domains", &monitoring.domains);
        self.degraded(ATTENTION_SERVICE, "stop attention", &monitoring.attention);

        match self.machine.conclude(monitoring.counts) {
            Ok(reaction) => {
                for event in reaction.events {
                    self.emit(event);
                }
            }
            Err(err) => {
                warn!(error = %err, "could not conclude session");
                return None;
            }
        }

        Some(SessionReport {
            session_id: self.machine.session_id()?,
            reason: self.machine.end_reason()?,
            outcome: *self.machine.outcome()?,
            handoff: self.machine.handoff()?,
            monitoring,
        })
    }

    fn on_joined(&mut self, joined: std::result::Result<RemoteResult, JoinError>) {
        match joined {
            Ok(result) => self.on_remote(result),
            Err(err) if err.is_cancelled() => {}
            Err(err) => warn!(error = %err, "monitoring task failed"),
        }
    }

    fn on_remote(&mut self, result: RemoteResult) {
        match result {
            RemoteResult::Started { session_id, report } => {
                if self.machine.session_id() != Some(session_id) {
                    debug!(%session_id, "dropping start result from a previous session");
                    return;
                }
                self.degraded(DOMAIN_SERVICE, "clear domains", &report.domains);
                self.degraded(ATTENTION_SERVICE, "start attention", &report.attention);
            }
            RemoteResult::Stepped { session_id, status } => {
                if !self.machine.accepts_remote(session_id) {
                    debug!(%session_id, "dropping stale step result");
                    return;
                }
                match status {
                    ServiceStatus::Ok => {
                        if self.step_failing {
                            info!("attention tracker recovered");
                        }
                        self.step_failing = false;
                    }
                    ServiceStatus::Failed { .. } if self.step_failing => {}
                    failed => {
                        self.step_failing = true;
                        self.degraded(ATTENTION_SERVICE, "step attention", &failed);
                    }
                }
            }
        }
    }

    fn degraded(&self, service: &str, call: &str, status: &ServiceStatus) {
        if let Some(message) = status.failure() {
            self.emit(Event::MonitoringDegraded {
                service: service.to_string(),
                call: call.to_string(),
                message: message.to_string(),
                at: Utc::now(),
            });
        }
    }

    fn emit(&self, event: Event) {
        // a front end that stopped listening does not stop the session
        let _ = self.events.send(event);
    }
}
