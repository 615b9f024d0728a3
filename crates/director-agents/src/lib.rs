//! Director video agents.
//!
//! - [`SurveillanceAgent`] indexes, searches and compiles surveillance footage
//! - [`ProgressSink`] receives output message snapshots while agents work
//! - [`generate_video`] runs the text-to-video tool and reports its outcome
//! - [`RunLogger`] adds session context to run logs

pub mod agent;
pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod session;
pub mod surveillance;

pub use agent::Agent;
pub use config::DirectorConfig;
pub use error::{AgentError, AgentResult};
pub use generation::{generate_video, generate_video_json};
pub use logging::RunLogger;
pub use session::{ChannelSink, ProgressEvent, ProgressEventKind, ProgressSink, TracingSink};
pub use surveillance::{
    summarize, IndexAcquisition, SurveillanceAgent, SurveillanceOutput, SurveillanceParams,
    AGENT_NAME, SCENE_INDEX_PROMPT,
};
