use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::MetricsSource;
use crate::schema::{parse_states, ApiStateRecord};
use crate::{DataError, NetworkError};

/// Metrics fetched from the Covid Act Now API
pub struct HttpMetricsSource {
    client: reqwest::Client,
    /// Endpoint without the API key
    url: String,
    api_key: Option<String>,
}

impl HttpMetricsSource {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }

    fn network_error(&self, source: NetworkError) -> DataError {
        DataError::Network {
            url: self.url.clone(),
            source,
        }
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch_states(&self) -> Result<Vec<ApiStateRecord>, DataError> {
        info!(url = %self.url, "Fetching state metrics");

        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key)]);
        }

        // Strip URLs from reqwest errors; they carry the API key
        let response = request
            .send()
            .await
            .map_err(|e| self.network_error(NetworkError::Request(e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.network_error(NetworkError::Status(status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.network_error(NetworkError::Request(e.without_url())))?;
        debug!(bytes = body.len(), "Received state metrics");

        parse_states(&body, &self.url)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}
