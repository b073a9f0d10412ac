//! Session outcome aggregation and the flat handoff to the results view.
//!
//! Fallback rules differ on purpose:
//! - an empty checklist scores 0 percent,
//! - no recorded visits scores 100 percent productivity, since missing
//!   monitoring data is not evidence of distraction,
//! - an unreachable attention tracker arrives here as the bridge's neutral
//!   0.5 score, i.e. a focus score of 50.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::monitoring::MonitoringCounts;

/// Percentages summarizing one finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub productivity_percent: u8,
    pub checklist_percent: u8,
    pub focus_score: u8,
}

/// Combine the checklist ratio with the monitoring counts.
pub fn aggregate(checklist_ratio: f64, counts: &MonitoringCounts) -> SessionOutcome {
    let visits = counts.productive_visits.saturating_add(counts.unproductive_visits);
    let productivity_percent = if visits > 0 {
        to_percent(counts.productive_visits as f64 / visits as f64)
    } else {
        100
    };

    SessionOutcome {
        productivity_percent,
        checklist_percent: to_percent(checklist_ratio),
        focus_score: to_percent(counts.attention_score),
    }
}

fn to_percent(ratio: f64) -> u8 {
    if !ratio.is_finite() {
        return 0;
    }
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// The four integers the results view renders.
///
/// `focus` is the productivity percentage and `score` the attention-based
/// focus score; the view derives the checklist percentage from
/// `completed`/`total` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHandoff {
    pub focus: u8,
    pub score: u8,
    pub completed: usize,
    pub total: usize,
}

impl DisplayHandoff {
    pub fn new(outcome: &SessionOutcome, completed: usize, total: usize) -> Self {
        Self {
            focus: outcome.productivity_percent,
            score: outcome.focus_score,
            completed,
            total,
        }
    }

    /// Results-view URL with the handoff appended as query parameters.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("focus", &self.focus.to_string())
            .append_pair("score", &self.score.to_string())
            .append_pair("completed", &self.completed.to_string())
            .append_pair("total", &self.total.to_string());
        url
    }
}
