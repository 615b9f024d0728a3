//! Surveillance footage agent.
//!
//! Finds events in surveillance footage: makes sure the video has a scene
//! index, runs a semantic search over it, compiles the matching shots into
//! one clip and summarizes them. Three content blocks report progress:
//!
//! 1. search results
//! 2. compiled video
//! 3. text summary
//!
//! Every block ends in success or error; [`OutputMessage::close_pending`]
//! runs once before the response is built.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::Instrument;

use director_models::{
    AgentResponse, CollectionId, ContentBlock, ContentState, OutputMessage, SceneIndexId,
    SearchData, SearchResultsContent, ShotData, TextContent, VideoContent, VideoData, VideoId,
};
use director_videodb::{
    IndexType, SceneExtraction, SearchFilters, SearchRequest, Shot, Video, VideoDb,
};

use crate::agent::Agent;
use crate::error::{AgentError, AgentResult};
use crate::logging::RunLogger;
use crate::session::ProgressSink;

pub const AGENT_NAME: &str = "surveillance";

const DESCRIPTION: &str = "Agent to help you with your surveillance footage";

/// Default prompt used to describe each shot while indexing.
pub const SCENE_INDEX_PROMPT: &str = "The given video is supposed to be of Surveillance Footage

For the analysis consider the following points.

Describe the scene with the following:
People: Describe the people, their arrival, their probable profession and expressions
Actions: Outline any activities or movements occurring such as delivery driver arriving, people leaving etc.
Time: Describe the time of the scene. If the time is available at display do display it as well
Suspicious Activities: Identify any burglar, stalker etc.
Other: Identify any animals, birds etc which is visible in the scene";

mod status {
    pub const SEARCH_STARTED: &str = "Started searching in the surveillance footage";
    pub const SEARCH_DONE: &str = "Searching in footage done";
    pub const SEARCH_FAILED: &str = "Failed to get search results";

    pub const VIDEO_STARTED: &str = "Started video compilation";
    pub const VIDEO_DONE: &str = "Footage video compiled";
    pub const VIDEO_FAILED: &str = "Failed to create compilation of search results";
    pub const VIDEO_NO_MATCH: &str = "Couldn't compile a video of the results";

    pub const SUMMARY_STARTED: &str = "Started generating summary of search results";
    pub const SUMMARY_DONE: &str = "Here is the summary of search results.";
    pub const SUMMARY_FAILED: &str = "Failed to generate summary of results";
}

mod action {
    pub const STARTED: &str = "Started Processing Surveillance Footage";
    pub const INDEX_NOT_FOUND: &str = "Scene index not found";
    pub const COMPILING: &str = "Generating search result and footage clip..";
    pub const SUMMARIZING: &str = "Generating search result summary..";
}

// =============================================================================
// Parameters
// =============================================================================

/// Arguments of a surveillance run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SurveillanceParams {
    /// The ID of the collection to process
    pub collection_id: CollectionId,
    /// The ID of the video to process
    pub video_id: VideoId,
    /// Search query
    pub query: String,
    /// The prompt to use for scene indexing
    #[serde(default = "default_scene_index_prompt")]
    pub scene_index_prompt: String,
    /// Sensitivity of the model towards scene changes within the video
    #[serde(default = "default_index_threshold")]
    pub index_threshold: u32,
    /// Minimum length of a scene in frames
    #[serde(default = "default_index_min_scene_len")]
    pub index_min_scene_len: u32,
    /// Number of frames to extract per scene
    #[serde(default = "default_index_frame_count")]
    pub index_frame_count: u32,
    /// Initial filter for top N matching documents
    #[serde(default = "default_result_threshold")]
    pub result_threshold: usize,
    /// Absolute threshold filter for relevance scores
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    /// Adaptive filter: keeps results within this percentage of the score
    /// range below the best score. Useful when there is a significant gap
    /// between top results and tail results after the score threshold.
    /// dynamic_threshold = max_score - (range * dynamic_score_percentage / 100)
    #[serde(default = "default_dynamic_score_percentage")]
    pub dynamic_score_percentage: f64,
}

fn default_scene_index_prompt() -> String {
    SCENE_INDEX_PROMPT.to_string()
}

fn default_index_threshold() -> u32 {
    20
}

fn default_index_min_scene_len() -> u32 {
    15
}

fn default_index_frame_count() -> u32 {
    4
}

fn default_result_threshold() -> usize {
    5
}

fn default_score_threshold() -> f64 {
    0.2
}

fn default_dynamic_score_percentage() -> f64 {
    20.0
}

impl SurveillanceParams {
    /// Params with default indexing and search settings.
    pub fn new(
        collection_id: impl Into<CollectionId>,
        video_id: impl Into<VideoId>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            video_id: video_id.into(),
            query: query.into(),
            scene_index_prompt: default_scene_index_prompt(),
            index_threshold: default_index_threshold(),
            index_min_scene_len: default_index_min_scene_len(),
            index_frame_count: default_index_frame_count(),
            result_threshold: default_result_threshold(),
            score_threshold: default_score_threshold(),
            dynamic_score_percentage: default_dynamic_score_percentage(),
        }
    }

    /// Shot-based scene extraction built from the `index_*` settings.
    pub fn extraction(&self) -> SceneExtraction {
        SceneExtraction::ShotBased {
            threshold: self.index_threshold,
            min_scene_len: self.index_min_scene_len,
            frame_count: self.index_frame_count,
        }
    }

    /// Relevance filters sent with the search request.
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            result_threshold: self.result_threshold,
            score_threshold: self.score_threshold,
            dynamic_score_percentage: self.dynamic_score_percentage,
        }
    }

    /// Reject empty ids and blank queries before any service call.
    pub fn validate(&self) -> AgentResult<()> {
        if self.collection_id.is_empty() {
            return Err(AgentError::invalid_params("collection_id is empty"));
        }
        if self.video_id.is_empty() {
            return Err(AgentError::invalid_params("video_id is empty"));
        }
        if self.query.trim().is_empty() {
            return Err(AgentError::invalid_params("query is empty"));
        }
        Ok(())
    }
}

/// How the scene index of a run was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexAcquisition {
    /// A new index was built for this run
    Created(SceneIndexId),
    /// Creation failed; the first existing index is used
    Reused {
        scene_index_id: SceneIndexId,
        cause: String,
    },
    /// Creation failed and the video has no index
    Unavailable { cause: String },
}

impl IndexAcquisition {
    /// Handle to search with, if an index was obtained.
    pub fn scene_index_id(&self) -> Option<&SceneIndexId> {
        match self {
            IndexAcquisition::Created(id) => Some(id),
            IndexAcquisition::Reused { scene_index_id, .. } => Some(scene_index_id),
            IndexAcquisition::Unavailable { .. } => None,
        }
    }
}

/// Successful run output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveillanceOutput {
    pub stream_url: String,
    pub text: String,
}

/// Shot descriptions in order, separated by a blank line.
pub fn summarize(shots: &[Shot]) -> String {
    shots
        .iter()
        .map(|shot| shot.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn search_data(video: &Video, shots: &[Shot]) -> SearchData {
    SearchData {
        video_id: video.id.clone(),
        video_title: video.name.clone(),
        stream_url: video.stream_url.clone(),
        duration: video.length,
        shots: shots.iter().map(ShotData::from).collect(),
    }
}

/// Positions of the three blocks inside the output message.
#[derive(Debug, Default)]
struct Blocks {
    search: Option<usize>,
    video: Option<usize>,
    summary: Option<usize>,
}

// =============================================================================
// Agent
// =============================================================================

/// Surveillance footage agent.
pub struct SurveillanceAgent {
    videodb: Arc<dyn VideoDb>,
    sink: Arc<dyn ProgressSink>,
    session_id: String,
}

impl SurveillanceAgent {
    /// Create an agent reporting progress of `session_id` to `sink`.
    pub fn new(
        videodb: Arc<dyn VideoDb>,
        sink: Arc<dyn ProgressSink>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            videodb,
            sink,
            session_id: session_id.into(),
        }
    }

    /// Search the footage and build the response.
    ///
    /// Never returns with a block still in progress.
    pub async fn run(&self, params: &SurveillanceParams) -> AgentResponse {
        let logger = RunLogger::new(&self.session_id, AGENT_NAME).with_query(&params.query);
        let span = logger.span();

        async {
            logger.step(
                "start",
                &format!("video {} in {}", params.video_id, params.collection_id),
            );

            let mut message = OutputMessage::new(&self.session_id);
            message.add_agent(AGENT_NAME);
            let mut blocks = Blocks::default();

            let outcome = match params.validate() {
                Ok(()) => self.execute(params, &mut message, &mut blocks, &logger).await,
                Err(e) => Err(e),
            };

            message.close_pending(outcome.is_ok());

            match outcome {
                Ok(output) => {
                    self.sink.publish(&message).await;
                    logger.finished(&format!("compiled stream {}", output.stream_url));
                    AgentResponse::success(
                        format!("Agent {} completed task successfully!", AGENT_NAME),
                        json!({
                            "stream_url": output.stream_url,
                            "text": output.text,
                        }),
                    )
                }
                Err(AgentError::NoMatch { query }) => {
                    self.sink.push_update(&message).await;
                    let text = format!("Failed due to no search results found for query {}", query);
                    logger.warning(&text);
                    AgentResponse::error(text.clone()).with_data(json!({ "message": text }))
                }
                Err(e) => {
                    self.sink.push_update(&message).await;
                    logger.failed(&e);
                    AgentResponse::error(format!("Failed to search: {}", e))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        params: &SurveillanceParams,
        message: &mut OutputMessage,
        blocks: &mut Blocks,
        logger: &RunLogger,
    ) -> AgentResult<SurveillanceOutput> {
        message.push_action(action::STARTED);
        blocks.search = Some(message.push_content(SearchResultsContent::new(
            AGENT_NAME,
            ContentState::progress(status::SEARCH_STARTED)
                .with_failure_message(status::SEARCH_FAILED),
        )));
        self.sink.push_update(message).await;

        let video = self
            .videodb
            .get_video(&params.collection_id, &params.video_id)
            .await?;

        let acquisition = self.acquire_index(params, logger).await?;
        let scene_index_id = match acquisition {
            IndexAcquisition::Created(id) => {
                logger.index_selected(&id, "created");
                id
            }
            IndexAcquisition::Reused { scene_index_id, .. } => {
                logger.index_selected(&scene_index_id, "reused");
                scene_index_id
            }
            IndexAcquisition::Unavailable { cause } => {
                message.push_action(action::INDEX_NOT_FOUND);
                self.sink.push_update(message).await;
                return Err(AgentError::index_unavailable(cause));
            }
        };

        let request = SearchRequest {
            query: params.query.clone(),
            index_type: IndexType::Scene,
            scene_index_id: Some(scene_index_id),
            filters: params.filters(),
        };
        let results = self
            .videodb
            .semantic_search(&params.video_id, &request)
            .await?;
        self.sink.push_update(message).await;

        blocks.video = Some(message.push_content(VideoContent::new(
            AGENT_NAME,
            ContentState::progress(status::VIDEO_STARTED).with_failure_message(status::VIDEO_FAILED),
        )));
        blocks.summary = Some(message.push_content(TextContent::new(
            AGENT_NAME,
            ContentState::progress(status::SUMMARY_STARTED)
                .with_failure_message(status::SUMMARY_FAILED),
        )));

        let shots = results.shots();
        if shots.is_empty() {
            fail_block(message, blocks.search, status::SEARCH_FAILED);
            fail_block(message, blocks.video, status::VIDEO_NO_MATCH);
            fail_block(message, blocks.summary, status::SUMMARY_FAILED);
            return Err(AgentError::NoMatch {
                query: params.query.clone(),
            });
        }
        logger.step("search", &format!("{} matching shots", shots.len()));

        if let Some(ContentBlock::SearchResults(content)) =
            blocks.search.and_then(|i| message.content_mut(i))
        {
            content.search_results = vec![search_data(&video, shots)];
            content.state.succeed(status::SEARCH_DONE);
        }
        message.push_action(action::COMPILING);
        self.sink.push_update(message).await;

        let stream_url = self.videodb.compile(&params.collection_id, shots).await?;
        if let Some(ContentBlock::Video(content)) =
            blocks.video.and_then(|i| message.content_mut(i))
        {
            content.video = Some(VideoData {
                stream_url: stream_url.clone(),
            });
            content.state.succeed(status::VIDEO_DONE);
        }
        message.push_action(action::SUMMARIZING);
        self.sink.push_update(message).await;

        let text = summarize(shots);
        if let Some(ContentBlock::Text(content)) =
            blocks.summary.and_then(|i| message.content_mut(i))
        {
            content.text = text.clone();
            content.state.succeed(status::SUMMARY_DONE);
        }

        Ok(SurveillanceOutput { stream_url, text })
    }

    /// Create a scene index, falling back to the first existing one.
    ///
    /// Creation is attempted once and listing once. A failure to list is an
    /// error of the run; an empty list is [`IndexAcquisition::Unavailable`].
    pub async fn acquire_index(
        &self,
        params: &SurveillanceParams,
        logger: &RunLogger,
    ) -> AgentResult<IndexAcquisition> {
        let video_id = &params.video_id;
        let extraction = params.extraction();

        let created = match self
            .videodb
            .index_scene(video_id, &extraction, &params.scene_index_prompt)
            .await
        {
            Ok(id) => self
                .videodb
                .get_scene_index(video_id, &id)
                .await
                .map(|_| id),
            Err(e) => Err(e),
        };

        let cause = match created {
            Ok(id) => return Ok(IndexAcquisition::Created(id)),
            Err(e) => {
                let cause = e.to_string();
                logger.index_fallback(e.is_transient(), &cause);
                cause
            }
        };

        let existing = self.videodb.list_scene_index(video_id).await?;
        Ok(match existing.into_iter().next() {
            Some(info) => IndexAcquisition::Reused {
                scene_index_id: info.scene_index_id,
                cause,
            },
            None => IndexAcquisition::Unavailable { cause },
        })
    }
}

fn fail_block(message: &mut OutputMessage, index: Option<usize>, status_message: &str) {
    if let Some(block) = index.and_then(|i| message.content_mut(i)) {
        block.state_mut().fail(status_message);
    }
}

#[async_trait]
impl Agent for SurveillanceAgent {
    fn name(&self) -> &'static str {
        AGENT_NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn parameters(&self) -> RootSchema {
        schemars::schema_for!(SurveillanceParams)
    }

    async fn run_json(&self, args: Value) -> AgentResponse {
        match serde_json::from_value::<SurveillanceParams>(args) {
            Ok(params) => self.run(&params).await,
            Err(e) => AgentResponse::error(format!(
                "Failed to search: {}",
                AgentError::invalid_params(e.to_string())
            )),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
