//! Director agents binary.
//!
//! ```text
//! director schema
//! director surveillance '<json>'
//! director text-to-video '<json>'
//! ```

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use director_agents::config::log_json_from_env;
use director_agents::{
    generate_video_json, Agent, DirectorConfig, SurveillanceAgent, SurveillanceParams,
    TracingSink,
};
use director_fal::TextToVideoTool;
use director_videodb::VideoDbClient;

const USAGE: &str = "usage: director <schema | surveillance '<json>' | text-to-video '<json>'>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing(log_json_from_env())?;

    let mut args = std::env::args().skip(1);
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;

    let output = match command.as_str() {
        "schema" => json!({
            "surveillance": schemars::schema_for!(SurveillanceParams),
            "text_to_video": TextToVideoTool::parameters(),
        }),
        "surveillance" => {
            let params = parse_args(args.next())?;
            let config = DirectorConfig::from_env();
            let videodb_config = config
                .videodb
                .context("VIDEO_DB_API_KEY must be set for the surveillance agent")?;
            let client = VideoDbClient::new(videodb_config)?;

            info!(session_id = %config.session_id, "Running surveillance agent");
            let agent = SurveillanceAgent::new(
                Arc::new(client),
                Arc::new(TracingSink),
                config.session_id,
            );
            serde_json::to_value(agent.run_json(params).await)?
        }
        "text-to-video" => {
            let params = parse_args(args.next())?;
            let config = DirectorConfig::from_env();

            info!(session_id = %config.session_id, "Running text-to-video");
            serde_json::to_value(
                generate_video_json(&config.fal, &config.session_id, params).await,
            )?
        }
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_args(raw: Option<String>) -> anyhow::Result<Value> {
    let raw = raw.ok_or_else(|| anyhow!(USAGE))?;
    serde_json::from_str(&raw).context("arguments must be a JSON object")
}

fn init_tracing(use_json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive("director=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}
