//! Text-to-video generation through fal.ai.
//!
//! [`TextToVideoTool`] forwards a prompt to one of the hosted generation
//! models, downloads the produced file and stores it on disk. The API key is
//! passed in explicitly through [`FalConfig`].

pub mod client;
pub mod error;
pub mod models;
pub mod tool;

pub use client::{FalClient, FalConfig, GenerationRequest, GenerationResponse};
pub use error::{FalError, FalResult};
pub use models::VideoModel;
pub use tool::{TextToVideoConfig, TextToVideoParams, TextToVideoTool};
