//! Video service abstraction used by the agents.

use async_trait::async_trait;

use director_models::{CollectionId, SceneIndexId, VideoId};

use crate::error::VideoDbResult;
use crate::types::{SceneExtraction, SceneIndexInfo, SceneRecord, SearchRequest, SearchResults, Shot, Video};

/// Operations of the video indexing, search and compile service.
///
/// Every call is a single request; implementations do not retry.
#[async_trait]
pub trait VideoDb: Send + Sync {
    /// Fetch a video of a collection. Missing videos are `NotFound`.
    async fn get_video(&self, collection_id: &CollectionId, video_id: &VideoId)
        -> VideoDbResult<Video>;

    /// Start a scene index for a video and wait for its handle.
    async fn index_scene(
        &self,
        video_id: &VideoId,
        extraction: &SceneExtraction,
        prompt: &str,
    ) -> VideoDbResult<SceneIndexId>;

    /// Read the described scenes of an index.
    async fn get_scene_index(
        &self,
        video_id: &VideoId,
        scene_index_id: &SceneIndexId,
    ) -> VideoDbResult<Vec<SceneRecord>>;

    /// List existing scene indexes of a video, most recent first.
    async fn list_scene_index(&self, video_id: &VideoId) -> VideoDbResult<Vec<SceneIndexInfo>>;

    /// Semantic search inside one video.
    ///
    /// The request's filters are applied by the service; shots come back
    /// as returned, in service order.
    async fn semantic_search(
        &self,
        video_id: &VideoId,
        request: &SearchRequest,
    ) -> VideoDbResult<SearchResults>;

    /// Compile shots, in the given order, into one playable stream.
    async fn compile(&self, collection_id: &CollectionId, shots: &[Shot]) -> VideoDbResult<String>;
}
