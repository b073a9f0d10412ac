use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{MonitoringBackend, MonitoringCounts, ServiceStatus, NEUTRAL_ATTENTION};
use crate::error::MonitoringError;

/// Per-service outcome of [`MonitoringBridge::start_session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartReport {
    pub domains: ServiceStatus,
    pub attention: ServiceStatus,
}

/// Final counts plus which services contributed to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndReport {
    pub counts: MonitoringCounts,
    pub domains: ServiceStatus,
    pub attention: ServiceStatus,
}

impl EndReport {
    /// Neither service answered; counts are pure fallback.
    pub fn is_total_failure(&self) -> bool {
        !self.domains.is_ok() && !self.attention.is_ok()
    }
}

/// Best-effort coordination of the two monitoring services.
///
/// Every operation completes with a report rather than an error. Calls to
/// the two services run concurrently and never wait on each other's
/// failures. Cloning shares the backend.
pub struct MonitoringBridge<B> {
    backend: Arc<B>,
}

impl<B> Clone for MonitoringBridge<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: MonitoringBackend> MonitoringBridge<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Clear domain history and start attention tracking.
    pub async fn start_session(&self) -> StartReport {
        let (domains, attention) = tokio::join!(
            self.backend.clear_domains(),
            self.backend.start_attention()
        );
        let report = StartReport {
            domains: observe("clear domains", domains),
            attention: observe("start attention", attention),
        };
        info!(
            domains_ok = report.domains.is_ok(),
            attention_ok = report.attention.is_ok(),
            "monitoring started"
        );
        report
    }

    /// Advance attention tracking by one frame.
    pub async fn step(&self) -> ServiceStatus {
        match self.backend.step_attention().await {
            Ok(()) => ServiceStatus::Ok,
            Err(err) => {
                debug!(error = %err, "attention step failed");
                ServiceStatus::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Fetch the domain analysis and stop attention tracking.
    ///
    /// Missing values fall back to zero visits and a neutral attention
    /// score, so the caller always gets counts.
    pub async fn end_session(&self) -> EndReport {
        let (analysis, attention) = tokio::join!(
            self.backend.analyze_domains(),
            self.backend.stop_attention()
        );

        let (productive_visits, unproductive_visits, domains) = match analysis {
            Ok(a) => (a.productive_visits(), a.unproductive_visits(), ServiceStatus::Ok),
            Err(err) => (0, 0, observe::<()>("analyze domains", Err(err))),
        };
        let (attention_score, attention) = match attention {
            Ok(summary) => (summary.score(), ServiceStatus::Ok),
            Err(err) => (NEUTRAL_ATTENTION, observe::<()>("stop attention", Err(err))),
        };

        let report = EndReport {
            counts: MonitoringCounts {
                productive_visits,
                unproductive_visits,
                attention_score,
            },
            domains,
            attention,
        };
        if report.is_total_failure() {
            warn!("no monitoring data available, using fallback counts");
        }
        report
    }
}

fn observe<T>(call: &str, result: Result<T, MonitoringError>) -> ServiceStatus {
    match result {
        Ok(_) => ServiceStatus::Ok,
        Err(err) => {
            warn!(call, service = err.service(), error = %err, "monitoring call failed");
            ServiceStatus::Failed {
                message: err.to_string(),
            }
        }
    }
}
