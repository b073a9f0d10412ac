//! Domain tracker client -- browsing history kept by the browser extension.

use std::time::Duration;

use reqwest::Client;

use super::http::{build_client, expect_success, join_url};
use super::{DomainAnalysis, DOMAIN_SERVICE};
use crate::error::MonitoringError;

pub struct DomainTrackerClient {
    base_url: String,
    http_client: Client,
}

impl DomainTrackerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_client(base_url, build_client(timeout))
    }

    pub fn with_client(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client,
        }
    }

    /// `DELETE /domains`
    pub async fn clear(&self) -> Result<(), MonitoringError> {
        let url = join_url(&self.base_url, "/domains");
        expect_success(DOMAIN_SERVICE, self.http_client.delete(&url).send().await)?;
        Ok(())
    }

    /// `GET /domains/analyze`
    ///
    /// A body whose `status` is not `"ok"` is reported as an invalid response.
    pub async fn analyze(&self) -> Result<DomainAnalysis, MonitoringError> {
        let url = join_url(&self.base_url, "/domains/analyze");
        let resp = expect_success(DOMAIN_SERVICE, self.http_client.get(&url).send().await)?;

        let analysis = resp
            .json::<DomainAnalysis>()
            .await
            .map_err(|e| MonitoringError::InvalidResponse {
                service: DOMAIN_SERVICE,
                message: e.to_string(),
            })?;

        if !analysis.is_ok() {
            return Err(MonitoringError::InvalidResponse {
                service: DOMAIN_SERVICE,
                message: format!("analysis status '{}'", analysis.status),
            });
        }
        Ok(analysis)
    }
}
