// Collector client: one GET against the telemetry endpoint via reqwest

use crate::config::CollectorConfig;
use crate::error::FetchError;
use crate::models::{RawPayload, RawTelemetryRecord};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::instrument;

pub struct CollectorClient {
    http: reqwest::Client,
    url: Url,
}

impl CollectorClient {
    pub fn new(config: &CollectorConfig) -> anyhow::Result<Self> {
        let url = Url::parse(&config.url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder
            .build()
            .map_err(|e| anyhow::anyhow!("collector http client: {}", e))?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and decode the current telemetry. A bare object is returned as one record.
    #[instrument(skip(self), fields(repo = "collector", operation = "fetch_records", url = %self.url))]
    pub async fn fetch_records(&self) -> Result<Vec<RawTelemetryRecord>, FetchError> {
        // The collector expects this header even on GET.
        let response = self
            .http
            .get(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records = serde_json::from_slice::<RawPayload>(&body)?.into_records();
        tracing::debug!(records = records.len(), "telemetry fetched");
        Ok(records)
    }
}
