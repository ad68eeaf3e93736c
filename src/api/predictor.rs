//! Prediction service client.

use super::DataConverter;
use super::wire::{ErrorBody, HealthResponse, PredictRequest, PredictResponse};
use crate::config::PredictorConfig;
use crate::error::{Error, Result};
use crate::state::{HealthReport, PredictionResult, Timeframe};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

/// Remote price-forecast service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Reachability and model status. Idempotent.
    async fn health(&self) -> Result<HealthReport>;

    /// Request one forecast for the given horizon.
    async fn predict(&self, timeframe: Timeframe) -> Result<PredictionResult>;
}

/// HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PredictorClient {
    /// Create a client from configuration.
    pub fn new(config: &PredictorConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Send a request and decode a JSON body, mapping non-2xx to a remote
    /// error carrying the service's `detail`.
    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .detail_message()
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %message, "prediction service error");
            return Err(Error::remote(status.as_u16(), message));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl PredictionService for PredictorClient {
    async fn health(&self) -> Result<HealthReport> {
        let url = self.endpoint("/health")?;
        let health: HealthResponse = self.send_json(self.http.get(url)).await?;
        Ok(DataConverter::convert_health(health))
    }

    async fn predict(&self, timeframe: Timeframe) -> Result<PredictionResult> {
        let url = self.endpoint("/predict")?;
        let body = PredictRequest {
            timeframe: timeframe.code(),
        };

        tracing::info!(timeframe = timeframe.code(), "requesting prediction");

        let resp: PredictResponse = self.send_json(self.http.post(url).json(&body)).await?;
        Ok(DataConverter::convert_prediction(resp))
    }
}
