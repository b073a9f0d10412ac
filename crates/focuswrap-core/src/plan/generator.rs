//! Client for the plan-generation adapter.
//!
//! The adapter wraps a language model: it takes the user's free-form study
//! goals and answers with prose or markdown holding a plan object.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{normalize, StudyPlan};
use crate::error::PlanError;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    result: Option<String>,
}

/// HTTP client for `POST <endpoint>` with `{ "prompt": ... }`.
pub struct PlanGenerator {
    endpoint: String,
    http_client: Client,
}

impl PlanGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            endpoint: endpoint.into(),
            http_client,
        }
    }

    /// Ask the adapter for a raw plan payload.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Adapter`] on transport failures, non-200
    /// responses, or a body without a string `result`.
    pub async fn generate_raw(&self, prompt: &str) -> Result<String, PlanError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PlanError::Empty);
        }

        debug!(endpoint = %self.endpoint, "requesting study plan");

        let resp = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| PlanError::Adapter(e.to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, "plan generator rejected request");
            return Err(PlanError::Adapter(format!("HTTP {status}: {text}")));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| PlanError::Adapter(format!("unreadable response: {e}")))?;

        body.result
            .ok_or_else(|| PlanError::Adapter("response has no 'result' field".into()))
    }

    /// Generate and normalize a plan in one call.
    pub async fn generate(&self, prompt: &str) -> Result<StudyPlan, PlanError> {
        let raw = self.generate_raw(prompt).await?;
        normalize(&raw)
    }
}
