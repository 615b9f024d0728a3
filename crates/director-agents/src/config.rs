//! Binary configuration.

use director_fal::FalConfig;
use director_videodb::VideoDbConfig;
use tracing::warn;

/// Configuration of the `director` binary.
#[derive(Debug, Clone)]
pub struct DirectorConfig {
    /// Session the output messages belong to
    pub session_id: String,
    /// Emit JSON logs instead of colored text
    pub log_json: bool,
    /// Video service settings; `None` when no API key is configured
    pub videodb: Option<VideoDbConfig>,
    /// fal.ai settings; the key may be empty until text-to-video is used
    pub fal: FalConfig,
}

impl DirectorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let videodb = match VideoDbConfig::from_env() {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Video service not configured: {}", e);
                None
            }
        };

        Self {
            session_id: std::env::var("DIRECTOR_SESSION_ID")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            log_json: log_json_from_env(),
            videodb,
            fal: FalConfig::from_env(),
        }
    }
}

/// `LOG_FORMAT=json` selects JSON output.
pub fn log_json_from_env() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false)
}
