//! Text-to-video at the agent boundary.
//!
//! The tool itself returns typed errors; this is where they become an
//! [`AgentResponse`].

use serde_json::{json, Value};
use tracing::Instrument;

use director_fal::{FalConfig, TextToVideoParams, TextToVideoTool};
use director_models::AgentResponse;

use crate::error::{AgentError, AgentResult};
use crate::logging::RunLogger;

pub const TOOL_NAME: &str = "text_to_video";

/// Generate a video described by raw JSON arguments.
///
/// Missing credentials, bad arguments and generation failures all produce
/// an error response.
pub async fn generate_video_json(config: &FalConfig, session_id: &str, args: Value) -> AgentResponse {
    let params = match serde_json::from_value::<TextToVideoParams>(args) {
        Ok(params) => params,
        Err(e) => return failure(AgentError::invalid_params(e.to_string())),
    };

    let tool = match TextToVideoTool::new(config.clone()) {
        Ok(tool) => tool,
        Err(e) => return failure(e.into()),
    };

    generate_video(&tool, session_id, &params).await
}

/// Generate a video with an existing tool.
pub async fn generate_video(
    tool: &TextToVideoTool,
    session_id: &str,
    params: &TextToVideoParams,
) -> AgentResponse {
    let logger = RunLogger::new(session_id, TOOL_NAME).with_query(&params.prompt);
    let span = logger.span();

    async {
        logger.step(
            "generate",
            &format!(
                "model {}, duration {}s",
                params.config.model_name, params.duration
            ),
        );

        match run(tool, params).await {
            Ok(()) => {
                let save_at = params.save_at.display().to_string();
                logger.finished(&format!("saved to {}", save_at));
                AgentResponse::success(
                    format!("Video generated and saved at {}", save_at),
                    json!({
                        "save_at": save_at,
                        "model_name": params.config.model_name,
                    }),
                )
            }
            Err(e) => {
                logger.failed(&e);
                failure(e)
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(tool: &TextToVideoTool, params: &TextToVideoParams) -> AgentResult<()> {
    if params.prompt.trim().is_empty() {
        return Err(AgentError::invalid_params("prompt is empty"));
    }
    if !(params.duration > 0.0) {
        return Err(AgentError::invalid_params("duration must be positive"));
    }
    tool.run(params).await?;
    Ok(())
}

fn failure(e: AgentError) -> AgentResponse {
    AgentResponse::error(format!("Failed to generate video: {}", e))
}
