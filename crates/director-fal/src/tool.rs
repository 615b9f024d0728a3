//! Text-to-video tool.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::{FalClient, FalConfig, GenerationRequest};
use crate::error::FalResult;
use crate::models::VideoModel;

/// Per-call tool options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextToVideoConfig {
    /// The model name to use for video generation
    #[serde(default)]
    pub model_name: VideoModel,
}

/// Parameters of a text-to-video call, as exposed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextToVideoParams {
    /// Description of the video to generate
    pub prompt: String,
    /// Where the generated file is written
    pub save_at: PathBuf,
    /// Video length in seconds
    pub duration: f64,
    #[serde(default)]
    pub config: TextToVideoConfig,
}

/// Generates a video from a prompt and stores it locally.
pub struct TextToVideoTool {
    client: FalClient,
}

impl TextToVideoTool {
    /// Create the tool. Fails when the API key is empty.
    pub fn new(config: FalConfig) -> FalResult<Self> {
        Ok(Self {
            client: FalClient::new(config)?,
        })
    }

    /// Create the tool around an existing client.
    pub fn from_client(client: FalClient) -> Self {
        Self { client }
    }

    /// JSON schema of [`TextToVideoParams`].
    pub fn parameters() -> schemars::schema::RootSchema {
        schemars::schema_for!(TextToVideoParams)
    }

    /// Generate a video and write it to `save_at`, replacing any existing file.
    ///
    /// Bytes are written to a sibling `.part` file first and renamed into
    /// place, so a failed download never leaves a truncated file at `save_at`.
    pub async fn text_to_video(
        &self,
        prompt: &str,
        save_at: &Path,
        duration: f64,
        config: &TextToVideoConfig,
    ) -> FalResult<()> {
        let model = config.model_name;
        let generation = self
            .client
            .run(model, &GenerationRequest { prompt, duration })
            .await?;

        let bytes = self.client.fetch(&generation.video.url).await?;

        let partial = partial_path(save_at);
        if let Err(e) = tokio::fs::write(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&partial, save_at).await {
            warn!("Failed to move {} into place: {}", partial.display(), e);
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        info!(
            model = %model,
            bytes = bytes.len(),
            "Saved generated video to {}",
            save_at.display()
        );
        Ok(())
    }

    /// Run with deserialized parameters.
    pub async fn run(&self, params: &TextToVideoParams) -> FalResult<()> {
        self.text_to_video(
            &params.prompt,
            &params.save_at,
            params.duration,
            &params.config,
        )
        .await
    }
}

fn partial_path(save_at: &Path) -> PathBuf {
    let mut name = save_at.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
