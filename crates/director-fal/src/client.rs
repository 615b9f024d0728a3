//! fal.ai HTTP client.

use std::fmt;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FalError, FalResult};
use crate::models::VideoModel;

const DEFAULT_BASE_URL: &str = "https://fal.run";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the fal.ai client.
#[derive(Clone)]
pub struct FalConfig {
    /// API key, sent as `Authorization: Key <api_key>`
    pub api_key: String,
    /// Base URL of the synchronous run endpoint
    pub base_url: String,
    /// Request timeout; generation blocks until the job finishes
    pub timeout: Duration,
}

impl Default for FalConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(900),
        }
    }
}

impl fmt::Debug for FalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FalConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FalConfig {
    /// Create config with an API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    ///
    /// A missing `FAL_KEY` leaves the key empty; client construction rejects it.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("FAL_KEY").unwrap_or_default(),
            base_url: std::env::var("FAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("FAL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(900),
            ),
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Arguments of a text-to-video generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    /// Clip length in seconds
    pub duration: f64,
}

/// Generated file reference.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedFile {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Response of a text-to-video generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    pub video: GeneratedFile,
}

// =============================================================================
// Client
// =============================================================================

/// Client for fal.ai model endpoints.
#[derive(Clone)]
pub struct FalClient {
    http: Client,
    config: FalConfig,
}

impl FalClient {
    /// Create a new client. Fails when the API key is empty.
    pub fn new(config: FalConfig) -> FalResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(FalError::MissingCredential(
                "set FAL_KEY or pass an API key".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("director-fal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FalError::Network)?;

        Ok(Self { http, config })
    }

    /// Run a model and wait for its result.
    pub async fn run(
        &self,
        model: VideoModel,
        request: &GenerationRequest<'_>,
    ) -> FalResult<GenerationResponse> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            model.as_str()
        );

        info!(model = %model, duration = request.duration, "Running fal generation");
        let started = Instant::now();

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.config.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        counter!(
            "fal_requests_total",
            "model" => model.as_str(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);
        histogram!("fal_latency_seconds", "model" => model.as_str())
            .record(started.elapsed().as_secs_f64());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FalError::request_failed(format!(
                "fal returned {}: {}",
                status, body
            )));
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|e| FalError::invalid_response(format!("missing video url: {}", e)))?;
        Ok(generation)
    }

    /// Download a generated file.
    pub async fn fetch(&self, url: &str) -> FalResult<Vec<u8>> {
        let url = url::Url::parse(url)
            .map_err(|e| FalError::invalid_response(format!("bad video url {}: {}", url, e)))?;

        debug!("Fetching generated video from {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FalError::request_failed(format!(
                "video download returned {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

// =============================================================================
// Tests
// =============================================================================
