//! Attention tracker client -- webcam eye detection, stepped by the caller.

use std::time::Duration;

use reqwest::Client;

use super::http::{build_client, expect_success, join_url};
use super::{AttentionSummary, ATTENTION_SERVICE};
use crate::error::MonitoringError;

pub struct AttentionTrackerClient {
    base_url: String,
    http_client: Client,
}

impl AttentionTrackerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_client(base_url, build_client(timeout))
    }

    pub fn with_client(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client,
        }
    }

    async fn post(&self, path: &str) -> Result<reqwest::Response, MonitoringError> {
        let url = join_url(&self.base_url, path);
        expect_success(ATTENTION_SERVICE, self.http_client.post(&url).send().await)
    }

    /// `POST /vision/start`
    pub async fn start(&self) -> Result<(), MonitoringError> {
        self.post("/vision/start").await?;
        Ok(())
    }

    /// `POST /vision/step`
    pub async fn step(&self) -> Result<(), MonitoringError> {
        self.post("/vision/step").await?;
        Ok(())
    }

    /// `POST /vision/stop`
    pub async fn stop(&self) -> Result<AttentionSummary, MonitoringError> {
        let resp = self.post("/vision/stop").await?;
        resp.json()
            .await
            .map_err(|e| MonitoringError::InvalidResponse {
                service: ATTENTION_SERVICE,
                message: e.to_string(),
            })
    }
}
