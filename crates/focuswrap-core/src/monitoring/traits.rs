use std::future::Future;

use super::{AttentionSummary, DomainAnalysis};
use crate::error::MonitoringError;

/// The two external trackers, seen as one backend.
///
/// Implementations hold their own network handles and keep no session
/// state between calls; the trackers own that. Every call may fail
/// independently; [`super::MonitoringBridge`] decides what a failure means.
pub trait MonitoringBackend: Send + Sync + 'static {
    /// Domain tracker: forget every visit recorded so far.
    fn clear_domains(&self) -> impl Future<Output = Result<(), MonitoringError>> + Send;

    /// Domain tracker: classify recorded visits.
    fn analyze_domains(
        &self,
    ) -> impl Future<Output = Result<DomainAnalysis, MonitoringError>> + Send;

    /// Attention tracker: open the camera and reset counters.
    fn start_attention(&self) -> impl Future<Output = Result<(), MonitoringError>> + Send;

    /// Attention tracker: sample one frame.
    fn step_attention(&self) -> impl Future<Output = Result<(), MonitoringError>> + Send;

    /// Attention tracker: release the camera and report the score.
    fn stop_attention(
        &self,
    ) -> impl Future<Output = Result<AttentionSummary, MonitoringError>> + Send;
}
