//! Video service request/response types.

use serde::{Deserialize, Serialize};

use director_models::{CollectionId, SceneIndexId, ShotData, VideoId};

use crate::filter::SearchFilters;

/// Video record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub collection_id: CollectionId,
    /// Title shown to users
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
    /// Length in seconds
    #[serde(default)]
    pub length: Option<f64>,
}

/// How a video is cut into scenes before description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "extraction_type", content = "extraction_config")]
pub enum SceneExtraction {
    /// Cut on detected shot changes
    #[serde(rename = "shot")]
    ShotBased {
        /// Sensitivity towards scene changes
        threshold: u32,
        /// Minimum scene length in frames
        min_scene_len: u32,
        /// Frames sampled per scene
        frame_count: u32,
    },
}

/// Index searched by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Index built from scene descriptions
    #[default]
    Scene,
}

/// Body of a scene indexing request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct IndexSceneRequest<'a> {
    #[serde(flatten)]
    pub extraction: &'a SceneExtraction,
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IndexSceneResponse {
    pub scene_index_id: SceneIndexId,
}

/// Existing scene index of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneIndexInfo {
    pub scene_index_id: SceneIndexId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListSceneIndexResponse {
    #[serde(default)]
    pub scene_indexes: Vec<SceneIndexInfo>,
}

/// One described scene of a scene index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SceneIndexResponse {
    #[serde(default)]
    pub scene_index_records: Vec<SceneRecord>,
}

/// Semantic search over one index of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub index_type: IndexType,
    pub scene_index_id: Option<SceneIndexId>,
    pub filters: SearchFilters,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchBody<'a> {
    pub index_type: IndexType,
    pub search_type: &'static str,
    pub query: &'a str,
    pub result_threshold: usize,
    pub score_threshold: f64,
    pub dynamic_score_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_index_id: Option<&'a SceneIndexId>,
}

impl<'a> From<&'a SearchRequest> for SearchBody<'a> {
    fn from(req: &'a SearchRequest) -> Self {
        Self {
            index_type: req.index_type,
            search_type: "semantic",
            query: &req.query,
            result_threshold: req.filters.result_threshold,
            score_threshold: req.filters.score_threshold,
            dynamic_score_percentage: req.filters.dynamic_score_percentage,
            scene_index_id: req.scene_index_id.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHitVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchHitVideo {
    pub video_id: VideoId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchDoc {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub text: String,
}

/// Time-bounded segment of a video matching a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub video_id: VideoId,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub video_length: Option<f64>,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub search_score: f64,
}

impl From<&Shot> for ShotData {
    fn from(shot: &Shot) -> Self {
        ShotData {
            search_score: shot.search_score,
            start: shot.start,
            end: shot.end,
            text: shot.text.clone(),
        }
    }
}

/// Shots returned by a search, in service order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResults {
    shots: Vec<Shot>,
}

impl SearchResults {
    pub fn new(shots: Vec<Shot>) -> Self {
        Self { shots }
    }

    /// Shots in service order.
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Consume the results, keeping service order.
    pub fn into_shots(self) -> Vec<Shot> {
        self.shots
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }
}

impl From<SearchResponse> for SearchResults {
    fn from(resp: SearchResponse) -> Self {
        let shots = resp
            .results
            .into_iter()
            .flat_map(|hit| {
                let SearchHitVideo {
                    video_id,
                    title,
                    length,
                    docs,
                } = hit;
                docs.into_iter().map(move |doc| Shot {
                    video_id: video_id.clone(),
                    video_title: title.clone(),
                    video_length: length,
                    start: doc.start,
                    end: doc.end,
                    text: doc.text,
                    search_score: doc.score,
                })
            })
            .collect();
        Self { shots }
    }
}

/// One entry of a compile request: a video and the ranges to cut from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CompileItem<'a> {
    pub video_id: &'a VideoId,
    pub collection_id: &'a CollectionId,
    pub shots: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CompileResponse {
    pub stream_url: Option<String>,
}
