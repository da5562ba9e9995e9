use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

use crate::{
    error::FetchError,
    model::{ArchiveErrorBody, ArchiveResponse, QueryParameters},
};

/// Public Open-Meteo historical weather endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Anything that can answer a [`QueryParameters`] with an hourly series.
#[async_trait]
pub trait ArchiveSource: Send + Sync + Debug {
    async fn fetch_hourly(&self, params: &QueryParameters) -> Result<ArchiveResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    endpoint: String,
    http: Client,
}

impl Default for OpenMeteoArchive {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl OpenMeteoArchive {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), http: Client::new() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ArchiveSource for OpenMeteoArchive {
    async fn fetch_hourly(&self, params: &QueryParameters) -> Result<ArchiveResponse, FetchError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            latitude = params.latitude,
            longitude = params.longitude,
            start = %params.start_date,
            end = %params.end_date,
            "requesting hourly archive"
        );

        let res = self.http.get(&self.endpoint).query(&params.to_query_pairs()).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ArchiveErrorBody>(&body)
                .ok()
                .and_then(|b| b.reason);

            tracing::warn!(
                status = status.as_u16(),
                reason = reason.as_deref().unwrap_or(""),
                body = %truncate_body(&body),
                "archive request rejected"
            );

            return Err(FetchError::Status {
                code: status.as_u16(),
                status_text: status.canonical_reason().map(str::to_owned),
                reason,
            });
        }

        let parsed: ArchiveResponse = serde_json::from_str(&body)?;

        if parsed.hourly.time.len() != parsed.hourly.temperature_2m.len() {
            tracing::warn!(
                times = parsed.hourly.time.len(),
                temperatures = parsed.hourly.temperature_2m.len(),
                "archive returned hourly arrays of different lengths"
            );
        }

        tracing::info!(
            hours = parsed.hourly.len(),
            latitude = ?parsed.latitude,
            longitude = ?parsed.longitude,
            "archive request succeeded"
        );
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
