//! Bridge to the external monitoring services.
//!
//! Two local services enrich a session:
//! - a domain tracker fed by a browser extension, which classifies visited
//!   sites as productive or unproductive,
//! - a webcam attention tracker, advanced one frame per second.
//!
//! Both are optional. Nothing in this module can fail a session; failures
//! become [`ServiceStatus::Failed`] plus fallback values.

mod attention;
mod bridge;
mod domains;
mod http;
pub mod traits;

use serde::{Deserialize, Serialize};

pub use attention::AttentionTrackerClient;
pub use bridge::{EndReport, MonitoringBridge, StartReport};
pub use domains::DomainTrackerClient;
pub use http::HttpMonitoring;
pub use traits::MonitoringBackend;

pub const DOMAIN_SERVICE: &str = "domain tracker";
pub const ATTENTION_SERVICE: &str = "attention tracker";

/// Attention score used when the attention tracker cannot be reached.
pub const NEUTRAL_ATTENTION: f64 = 0.5;

/// Raw counts gathered at session end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitoringCounts {
    pub productive_visits: u64,
    pub unproductive_visits: u64,
    /// 0.0 ..= 1.0
    pub attention_score: f64,
}

impl MonitoringCounts {
    /// Counts reported when neither service answered.
    pub fn fallback() -> Self {
        Self {
            productive_visits: 0,
            unproductive_visits: 0,
            attention_score: NEUTRAL_ATTENTION,
        }
    }
}

/// `GET /domains/analyze` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub productive: Option<f64>,
    #[serde(default)]
    pub unproductive: Option<f64>,
}

impl DomainAnalysis {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }

    pub fn productive_visits(&self) -> u64 {
        visit_count(self.productive)
    }

    pub fn unproductive_visits(&self) -> u64 {
        visit_count(self.unproductive)
    }
}

fn visit_count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round() as u64,
        _ => 0,
    }
}

/// `POST /vision/stop` body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttentionSummary {
    #[serde(default)]
    pub focus_score: Option<f64>,
}

impl AttentionSummary {
    /// Score clamped into `[0, 1]`; a missing or non-finite score reads as 0.
    pub fn score(&self) -> f64 {
        match self.focus_score {
            Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Result of one call to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Failed { message: String },
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ServiceStatus::Ok)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ServiceStatus::Ok => None,
            ServiceStatus::Failed { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_missing_counts_default_to_zero() {
        let analysis: DomainAnalysis = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(analysis.is_ok());
        assert_eq!(analysis.productive_visits(), 0);
        assert_eq!(analysis.unproductive_visits(), 0);
    }

    #[test]
    fn analysis_ignores_negative_counts() {
        let analysis: DomainAnalysis =
            serde_json::from_str(r#"{"status": "ok", "productive": 4, "unproductive": -2}"#)
                .unwrap();
        assert_eq!(analysis.productive_visits(), 4);
        assert_eq!(analysis.unproductive_visits(), 0);
    }

    #[test]
    fn attention_score_is_clamped() {
        let over = AttentionSummary {
            focus_score: Some(1.4),
        };
        assert_eq!(over.score(), 1.0);
        let missing: AttentionSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.score(), 0.0);
    }
}
