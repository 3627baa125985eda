//! Scoring API Client
//!
//! HTTP client for the remote credit-scoring service. Every call carries its
//! own timeout and returns a typed [`ScoringError`] instead of swallowing
//! failures.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::types::{ApiStatus, Explanation, FeaturesRequest, ModelInfo, PredictionResult};
use crate::config::Config;

/// Scoring client configuration
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub base_url: String,
    pub status_timeout: Duration,
    pub model_info_timeout: Duration,
    pub predict_timeout: Duration,
    pub explain_timeout: Duration,
}

impl From<&Config> for ScoringConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_url.clone(),
            status_timeout: config.status_timeout,
            model_info_timeout: config.model_info_timeout,
            predict_timeout: config.predict_timeout,
            explain_timeout: config.explain_timeout,
        }
    }
}

const UNREADABLE_BODY: &str = "<unreadable body>";

/// Scoring client errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScoringError {
    #[error("Scoring API unreachable: {0}")]
    Connectivity(String),

    #[error("Scoring API error: {status} - {body}")]
    BadResponse { status: u16, body: String },

    #[error("Unexpected response from scoring API: {0}")]
    Decode(String),
}

impl ScoringError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScoringError::Connectivity(format!("request timed out ({})", err))
        } else {
            ScoringError::Connectivity(err.to_string())
        }
    }
}

/// Remote availability as seen before allowing interaction
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub operational: bool,
    pub status: Option<String>,
    pub model: Option<ModelInfo>,
    pub error: Option<String>,
}

/// Scoring API client. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    config: ScoringConfig,
    http_client: reqwest::Client,
}

impl ScoringClient {
    /// Create new scoring client
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        // Per-request timeouts override this ceiling
        let ceiling = config.explain_timeout.max(config.predict_timeout);

        let http_client = reqwest::Client::builder()
            .timeout(ceiling)
            .build()
            .map_err(|e| ScoringError::Connectivity(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// `GET /status`
    pub async fn status(&self) -> Result<ApiStatus, ScoringError> {
        let request = self.http_client
            .get(self.url("/status"))
            .timeout(self.config.status_timeout);

        send_json(request).await
    }

    /// `GET /model/info`
    pub async fn model_info(&self) -> Result<ModelInfo, ScoringError> {
        let request = self.http_client
            .get(self.url("/model/info"))
            .timeout(self.config.model_info_timeout);

        send_json(request).await
    }

    /// `POST /predict`
    pub async fn predict(&self, features: &[f64]) -> Result<PredictionResult, ScoringError> {
        tracing::debug!(features = features.len(), "Requesting prediction");

        let request = self.http_client
            .post(self.url("/predict"))
            .timeout(self.config.predict_timeout)
            .json(&FeaturesRequest { features });

        send_json(request).await
    }

    /// `POST /explain`
    pub async fn explain(&self, features: &[f64]) -> Result<Explanation, ScoringError> {
        tracing::debug!(features = features.len(), "Requesting explanation");

        let request = self.http_client
            .post(self.url("/explain"))
            .timeout(self.config.explain_timeout)
            .json(&FeaturesRequest { features });

        send_json(request).await
    }

    /// Health endpoint first, then model metadata.
    ///
    /// Model metadata is optional: a failure there leaves `model` empty but
    /// keeps the API usable.
    pub async fn availability(&self) -> Availability {
        let status = match self.status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Scoring API status check failed: {}", e);
                return Availability {
                    operational: false,
                    status: None,
                    model: None,
                    error: Some(e.to_string()),
                };
            }
        };

        if !status.is_operational() {
            tracing::warn!("Scoring API reports status '{}'", status.status);
            return Availability {
                operational: false,
                status: Some(status.status),
                model: None,
                error: None,
            };
        }

        let model = match self.model_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Could not load model info: {}", e);
                None
            }
        };

        Availability {
            operational: true,
            status: Some(status.status),
            model,
            error: None,
        }
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ScoringError> {
    let response = request
        .send()
        .await
        .map_err(ScoringError::from_transport)?;

    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ScoringError> {
    let status = response.status();

    if !status.is_success() {
        let body = error_body(response.text().await);
        tracing::error!("Scoring API returned {}: {}", status.as_u16(), body);
        return Err(ScoringError::BadResponse { status: status.as_u16(), body });
    }

    response.json().await
        .map_err(|e| ScoringError::Decode(e.to_string()))
}

/// Body of a failed response, or a placeholder when it cannot be read
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        tracing::warn!("Could not read scoring API error body: {}", e);
        UNREADABLE_BODY.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_placeholder() {
        assert_eq!(error_body::<String>(Ok("model crashed".into())), "model crashed");
        assert_eq!(error_body(Err("connection reset")), UNREADABLE_BODY);
    }
}
