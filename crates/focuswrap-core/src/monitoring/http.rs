//! HTTP-backed [`MonitoringBackend`] over the two local tracker services.

use std::time::Duration;

use reqwest::{Client, Response};

use super::{
    AttentionSummary, AttentionTrackerClient, DomainAnalysis, DomainTrackerClient,
    MonitoringBackend,
};
use crate::error::MonitoringError;
use crate::storage::MonitoringConfig;

pub struct HttpMonitoring {
    domains: DomainTrackerClient,
    attention: AttentionTrackerClient,
}

impl HttpMonitoring {
    /// Build both clients from config, sharing one connection pool.
    pub fn from_config(config: &MonitoringConfig) -> Self {
        let http_client = build_client(Duration::from_millis(config.request_timeout_ms));
        Self {
            domains: DomainTrackerClient::with_client(
                &config.domain_base_url,
                http_client.clone(),
            ),
            attention: AttentionTrackerClient::with_client(&config.attention_base_url, http_client),
        }
    }
}

impl MonitoringBackend for HttpMonitoring {
    async fn clear_domains(&self) -> Result<(), MonitoringError> {
        self.domains.clear().await
    }

    async fn analyze_domains(&self) -> Result<DomainAnalysis, MonitoringError> {
        self.domains.analyze().await
    }

    async fn start_attention(&self) -> Result<(), MonitoringError> {
        self.attention.start().await
    }

    async fn step_attention(&self) -> Result<(), MonitoringError> {
        self.attention.step().await
    }

    async fn stop_attention(&self) -> Result<AttentionSummary, MonitoringError> {
        self.attention.stop().await
    }
}

pub(super) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

pub(super) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Map a transport result to a 2xx response or a [`MonitoringError`].
pub(super) fn expect_success(
    service: &'static str,
    result: Result<Response, reqwest::Error>,
) -> Result<Response, MonitoringError> {
    let resp = result.map_err(|source| MonitoringError::Unreachable { service, source })?;
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(MonitoringError::Status {
            service,
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:5000/", "/domains"),
            "http://localhost:5000/domains"
        );
        assert_eq!(
            join_url("http://localhost:5000", "/vision/step"),
            "http://localhost:5000/vision/step"
        );
    }
}
