//! Calorie-from-image estimation
//!
//! The image is handed to an external inference API; this module only
//! carries it there and reads back a calorie count.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

const ESTIMATE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("No calorie estimator is configured")]
    NotConfigured,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Estimator returned HTTP {0}")]
    Api(u16),

    #[error("Unreadable estimator response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait CalorieEstimator: Send + Sync {
    /// Estimated calories of the food in `image`
    async fn estimate(&self, image: &[u8]) -> Result<u32, EstimateError>;
}

#[derive(Debug, Serialize)]
struct EstimateRequest {
    image_base64: String,
}

#[derive(Debug, Deserialize)]
struct EstimateResponse {
    calories: f64,
}

/// Estimator backed by an HTTP inference endpoint
pub struct HttpEstimator {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpEstimator {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, EstimateError> {
        let client = reqwest::Client::builder()
            .timeout(ESTIMATE_TIMEOUT)
            .build()
            .map_err(|e| EstimateError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl CalorieEstimator for HttpEstimator {
    async fn estimate(&self, image: &[u8]) -> Result<u32, EstimateError> {
        let body = EstimateRequest {
            image_base64: base64::engine::general_purpose::STANDARD.encode(image),
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EstimateError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimateError::Api(status.as_u16()));
        }

        let parsed: EstimateResponse = response
            .json()
            .await
            .map_err(|e| EstimateError::Parse(e.to_string()))?;

        if !parsed.calories.is_finite() || parsed.calories < 0.0 {
            return Err(EstimateError::Parse(format!(
                "calories must be a non-negative number, got {}",
                parsed.calories
            )));
        }

        debug!("Estimated {} kcal from {} byte image", parsed.calories, image.len());
        Ok(parsed.calories.round() as u32)
    }
}

/// Stand-in used when no estimator URL is configured
pub struct UnconfiguredEstimator;

#[async_trait]
impl CalorieEstimator for UnconfiguredEstimator {
    async fn estimate(&self, _image: &[u8]) -> Result<u32, EstimateError> {
        Err(EstimateError::NotConfigured)
    }
}

/// The estimator described by `config`
pub fn from_config(config: &Config) -> Arc<dyn CalorieEstimator> {
    let Some(url) = &config.estimator_url else {
        return Arc::new(UnconfiguredEstimator);
    };

    match HttpEstimator::new(url.clone(), config.estimator_key.clone()) {
        Ok(estimator) => Arc::new(estimator),
        Err(e) => {
            warn!("Calorie estimator unavailable: {}", e);
            Arc::new(UnconfiguredEstimator)
        }
    }
}
