//! Client for the video indexing, search and compile service.
//!
//! The service owns scene extraction, embeddings, ranking and transcoding.
//! This crate only maps requests and responses:
//! - [`VideoDb`] is the seam the agents depend on
//! - [`VideoDbClient`] implements it over the service's REST API
//! - [`SearchFilters`] re-applies the documented relevance filters

pub mod client;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod service;
pub mod types;

pub use client::{VideoDbClient, VideoDbConfig};
pub use error::{VideoDbError, VideoDbResult};
pub use filter::SearchFilters;
pub use service::VideoDb;
pub use types::{
    IndexType, SceneExtraction, SceneIndexInfo, SceneRecord, SearchRequest, SearchResults, Shot,
    Video,
};
