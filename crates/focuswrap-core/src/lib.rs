//! # FocusWrap Core Library
//!
//! Session orchestration and metrics aggregation for timed study sessions.
//! A generated plan arms a session; a countdown drives it while two optional
//! monitoring services (a domain tracker and a webcam attention tracker) are
//! started, stepped and stopped alongside; on end the collected signals are
//! folded into a [`SessionOutcome`].
//!
//! ## Architecture
//!
//! - **Plan**: normalization of loosely formatted generator output, plus the
//!   HTTP client for the generator itself
//! - **Timer**: a tick-driven countdown that reads no clock
//! - **Monitoring**: best-effort clients for the two trackers behind the
//!   [`MonitoringBackend`] trait
//! - **Session**: the pure [`SessionMachine`] and the async [`SessionRunner`]
//! - **Storage**: TOML-based configuration
//!
//! The CLI binary (`focuswrap`) is a thin layer over this crate.

pub mod checklist;
pub mod error;
pub mod events;
pub mod monitoring;
pub mod outcome;
pub mod plan;
pub mod session;
pub mod storage;
pub mod timer;

pub use checklist::ChecklistTracker;
pub use error::{ConfigError, CoreError, MonitoringError, PlanError, Result};
pub use events::Event;
pub use monitoring::{HttpMonitoring, MonitoringBackend, MonitoringBridge, MonitoringCounts};
pub use outcome::{aggregate, DisplayHandoff, SessionOutcome};
pub use plan::{normalize, PlanGenerator, StudyPlan};
pub use session::{
    Command, EndReason, SessionMachine, SessionPhase, SessionReport, SessionRunner,
};
pub use storage::Config;
pub use timer::{format_time, CountdownTimer, TimerState};
