//! Core error types for focuswrap-core.
//!
//! This module defines the error hierarchy using thiserror. Only plan
//! errors and checklist misuse are fatal to the caller; monitoring errors
//! are absorbed by the bridge and surface as degraded results.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionPhase;

/// Core error type for focuswrap-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The plan payload could not be turned into a study plan.
    #[error("Malformed plan: {0}")]
    MalformedPlan(#[from] PlanError),

    /// One or both monitoring services could not be reached.
    ///
    /// The session path never returns this: [`crate::MonitoringBridge`]
    /// turns every [`MonitoringError`] into a fallback and a
    /// [`crate::monitoring::ServiceStatus`]. It exists for callers that use
    /// a [`crate::MonitoringBackend`] directly and propagate with `?`.
    #[error("Monitoring unavailable: {0}")]
    MonitoringUnavailable(#[from] MonitoringError),

    /// Checklist index outside `[0, len)`.
    #[error("Checklist index {index} out of range (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Command not accepted in the current phase.
    #[error("Cannot {action} while session is {phase}")]
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Why a plan payload was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("plan payload is empty")]
    Empty,

    #[error("plan payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("plan is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("timer must be a positive number of minutes, got {0}")]
    InvalidDuration(String),

    #[error("checklist must contain at least one item")]
    EmptyChecklist,

    #[error("checklist item {0} is blank")]
    BlankChecklistItem(usize),

    /// The plan-generation adapter failed or answered with an unusable body.
    #[error("plan generator failed: {0}")]
    Adapter(String),
}

/// Failure talking to one of the monitoring services.
#[derive(Error, Debug)]
pub enum MonitoringError {
    /// Connection refused, DNS failure, timeout.
    #[error("{service} service unreachable: {source}")]
    Unreachable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("{service} service returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// The service answered 2xx with a body we could not use.
    #[error("{service} service sent an unusable response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl MonitoringError {
    /// Name of the service the error came from.
    pub fn service(&self) -> &'static str {
        match self {
            MonitoringError::Unreachable { service, .. }
            | MonitoringError::Status { service, .. }
            | MonitoringError::InvalidResponse { service, .. } => service,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be prepared
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_or_fail() -> Result<u64> {
        let failed: std::result::Result<u64, MonitoringError> = Err(MonitoringError::Status {
            service: "domain tracker",
            status: 503,
        });
        Ok(failed?)
    }

    #[test]
    fn monitoring_error_propagates_as_unavailable() {
        let err = analyze_or_fail().unwrap_err();
        assert!(matches!(
            err,
            CoreError::MonitoringUnavailable(MonitoringError::Status { status: 503, .. })
        ));
        assert_eq!(
            err.to_string(),
            "Monitoring unavailable: domain tracker service returned HTTP 503"
        );
    }

    #[test]
    fn invalid_transition_names_phase_and_action() {
        let err = CoreError::InvalidTransition {
            phase: SessionPhase::Armed,
            action: "pause",
        };
        assert_eq!(err.to_string(), "Cannot pause while session is armed");
    }
}
