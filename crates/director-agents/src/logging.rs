//! Structured run logging.
//!
//! A [`RunLogger`] opens one `agent_run` span per run. The span carries the
//! session, agent and query, so events emitted inside it only add what is
//! specific to the step.

use std::fmt::Display;

use tracing::{error, info, warn, Span};

use director_models::SceneIndexId;

// =============================================================================
// Run Logger
// =============================================================================

/// Logger for one agent run.
#[derive(Debug, Clone)]
pub struct RunLogger {
    session_id: String,
    agent: &'static str,
    query: Option<String>,
}

impl RunLogger {
    /// Create a logger for a run of `agent` inside a session.
    pub fn new(session_id: &str, agent: &'static str) -> Self {
        Self {
            session_id: session_id.to_string(),
            agent,
            query: None,
        }
    }

    /// Attach the user query to the run span.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    /// Span covering the whole run. Instrument the run future with it.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "agent_run",
            session_id = %self.session_id,
            agent = self.agent,
            query = self.query.as_deref().unwrap_or("")
        )
    }

    /// A named step of the run made progress.
    pub fn step(&self, step: &str, detail: &str) {
        info!(step = step, "{}", detail);
    }

    /// Scene index chosen for the search; `origin` is "created" or "reused".
    pub fn index_selected(&self, scene_index_id: &SceneIndexId, origin: &'static str) {
        info!(
            scene_index_id = %scene_index_id,
            origin = origin,
            "Scene index selected"
        );
    }

    /// Creating a scene index failed and existing indexes will be listed.
    pub fn index_fallback(&self, transient: bool, cause: &str) {
        let failure = if transient { "transient" } else { "rejected" };
        warn!(
            failure = failure,
            "Scene indexing failed, listing existing indexes: {}", cause
        );
    }

    /// The run ended without a result but without a fault either.
    pub fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    /// The run failed.
    pub fn failed(&self, error: &dyn Display) {
        error!(agent = self.agent, "Run failed: {}", error);
    }

    /// The run finished successfully.
    pub fn finished(&self, detail: &str) {
        info!(agent = self.agent, "Run finished: {}", detail);
    }
}

// =============================================================================
// Tests
// =============================================================================
