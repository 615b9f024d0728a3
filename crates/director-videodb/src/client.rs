//! Video service HTTP client.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use urlencoding::encode;

use director_models::{CollectionId, SceneIndexId, VideoId};

use crate::error::{VideoDbError, VideoDbResult};
use crate::metrics::{record_poll, record_request};
use crate::service::VideoDb;
use crate::types::{
    CompileItem, CompileResponse, IndexSceneRequest, IndexSceneResponse, ListSceneIndexResponse,
    SceneExtraction, SceneIndexInfo, SceneIndexResponse, SceneRecord, SearchBody, SearchRequest,
    SearchResponse, SearchResults, Shot, Video,
};

const DEFAULT_BASE_URL: &str = "https://api.videodb.io";
const AUTH_HEADER: &str = "x-access-token";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the video service client.
#[derive(Clone)]
pub struct VideoDbConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Base URL of the service
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay between polls of a processing job
    pub poll_interval: Duration,
    /// Give up on a processing job after this long
    pub max_poll_wait: Duration,
}

impl Default for VideoDbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            max_poll_wait: Duration::from_secs(600),
        }
    }
}

impl fmt::Debug for VideoDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoDbConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_wait", &self.max_poll_wait)
            .finish()
    }
}

impl VideoDbConfig {
    /// Create config with an API key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> VideoDbResult<Self> {
        let api_key = std::env::var("VIDEO_DB_API_KEY")
            .map_err(|_| VideoDbError::Config("VIDEO_DB_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key,
            base_url: std::env::var("VIDEO_DB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("VIDEO_DB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            poll_interval: Duration::from_secs(
                std::env::var("VIDEO_DB_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            max_poll_wait: Duration::from_secs(
                std::env::var("VIDEO_DB_MAX_POLL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
        })
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Value,
    /// Payload of a finished job on the output endpoint
    #[serde(default)]
    response: Option<Value>,
}

impl Envelope {
    fn is_processing(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("processing") | Some("in progress")
        )
    }

    fn check(self) -> VideoDbResult<Self> {
        if self.success == Some(false) {
            return Err(VideoDbError::request_failed(
                self.message
                    .unwrap_or_else(|| "service reported failure".to_string()),
            ));
        }
        Ok(self)
    }

    fn into_payload(self) -> Value {
        self.response.unwrap_or(self.data)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the video indexing, search and compile service.
#[derive(Clone)]
pub struct VideoDbClient {
    http: Client,
    config: VideoDbConfig,
}

impl VideoDbClient {
    /// Create a new client.
    pub fn new(config: VideoDbConfig) -> VideoDbResult<Self> {
        if config.api_key.is_empty() {
            return Err(VideoDbError::Config("API key cannot be empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("director-videodb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VideoDbError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VideoDbResult<Self> {
        Self::new(VideoDbConfig::from_env()?)
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &VideoDbConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and decode the envelope payload.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> VideoDbResult<T> {
        let span = info_span!("videodb_request", operation = %operation);

        async {
            let envelope = self.send(operation, request).await?;
            let payload = if envelope.is_processing() {
                let output_url = envelope
                    .data
                    .get("output_url")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        VideoDbError::invalid_response("processing job without output_url")
                    })?
                    .to_string();
                self.poll_output(operation, &output_url).await?
            } else {
                envelope.into_payload()
            };

            serde_json::from_value(payload).map_err(VideoDbError::from)
        }
        .instrument(span)
        .await
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> VideoDbResult<Envelope> {
        let started = Instant::now();
        let response = request
            .header(AUTH_HEADER, &self.config.api_key)
            .send()
            .await?;
        let status = response.status();
        record_request(
            operation,
            status.as_u16(),
            started.elapsed().as_secs_f64() * 1000.0,
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VideoDbError::from_http_status(
                status.as_u16(),
                error_message(&body),
            ));
        }

        let envelope: Envelope = response.json().await?;
        envelope.check()
    }

    /// Poll the output endpoint of a long-running job until it settles.
    async fn poll_output(&self, operation: &str, output_url: &str) -> VideoDbResult<Value> {
        let deadline = Instant::now() + self.config.max_poll_wait;

        loop {
            record_poll(operation);
            let envelope = self.send(operation, self.http.get(output_url)).await?;
            if !envelope.is_processing() {
                return Ok(envelope.into_payload());
            }

            if Instant::now() >= deadline {
                return Err(VideoDbError::Timeout(self.config.max_poll_wait.as_secs()));
            }

            debug!(
                operation = %operation,
                "Job still processing, polling again in {:?}",
                self.config.poll_interval
            );
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

/// Pull the `message` field out of an error body when there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// =============================================================================
// Service Operations
// =============================================================================

#[async_trait]
impl VideoDb for VideoDbClient {
    async fn get_video(
        &self,
        collection_id: &CollectionId,
        video_id: &VideoId,
    ) -> VideoDbResult<Video> {
        let url = self.url(&format!("video/{}", encode(video_id.as_str())));
        let request = self
            .http
            .get(url)
            .query(&[("collection_id", collection_id.as_str())]);

        self.call("get_video", request).await.map_err(|e| match e {
            VideoDbError::NotFound(_) => {
                VideoDbError::not_found(format!("video {} in {}", video_id, collection_id))
            }
            other => other,
        })
    }

    async fn index_scene(
        &self,
        video_id: &VideoId,
        extraction: &SceneExtraction,
        prompt: &str,
    ) -> VideoDbResult<SceneIndexId> {
        let url = self.url(&format!("video/{}/index/scene", encode(video_id.as_str())));
        let body = IndexSceneRequest { extraction, prompt };

        let resp: IndexSceneResponse = self
            .call("index_scene", self.http.post(url).json(&body))
            .await?;
        Ok(resp.scene_index_id)
    }

    async fn get_scene_index(
        &self,
        video_id: &VideoId,
        scene_index_id: &SceneIndexId,
    ) -> VideoDbResult<Vec<SceneRecord>> {
        let url = self.url(&format!(
            "video/{}/index/scene/{}",
            encode(video_id.as_str()),
            encode(scene_index_id.as_str())
        ));

        let resp: SceneIndexResponse = self.call("get_scene_index", self.http.get(url)).await?;
        Ok(resp.scene_index_records)
    }

    async fn list_scene_index(&self, video_id: &VideoId) -> VideoDbResult<Vec<SceneIndexInfo>> {
        let url = self.url(&format!("video/{}/index/scene", encode(video_id.as_str())));

        let resp: ListSceneIndexResponse =
            self.call("list_scene_index", self.http.get(url)).await?;
        Ok(resp.scene_indexes)
    }

    async fn semantic_search(
        &self,
        video_id: &VideoId,
        request: &SearchRequest,
    ) -> VideoDbResult<SearchResults> {
        let url = self.url(&format!("video/{}/search", encode(video_id.as_str())));
        let body = SearchBody::from(request);

        let resp: SearchResponse = self
            .call("semantic_search", self.http.post(url).json(&body))
            .await?;
        let results = SearchResults::from(resp);

        debug!(video_id = %video_id, shots = results.len(), "Semantic search finished");
        Ok(results)
    }

    async fn compile(&self, collection_id: &CollectionId, shots: &[Shot]) -> VideoDbResult<String> {
        let items: Vec<CompileItem<'_>> = shots
            .iter()
            .map(|shot| CompileItem {
                video_id: &shot.video_id,
                collection_id,
                shots: vec![(shot.start, shot.end)],
            })
            .collect();

        let resp: CompileResponse = self
            .call("compile", self.http.post(self.url("compile")).json(&items))
            .await?;
        resp.stream_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| VideoDbError::invalid_response("compile returned no stream_url"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VideoDbConfig::default();
        assert_eq!(config.base_url, "https://api.videodb.io");
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = VideoDbClient::new(VideoDbConfig::default());
        assert!(matches!(result, Err(VideoDbError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = VideoDbConfig::new("secret-key");
        assert!(!format!("{:?}", config).contains("secret-key"));
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        assert_eq!(
            error_message(r#"{"success": false, "message": "Video not found"}"#),
            "Video not found"
        );
        assert_eq!(error_message("plain text"), "plain text");
    }
}
