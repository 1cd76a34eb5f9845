#![forbid(unsafe_code)]

use mirador_chat::GeminiAssistant;
use mirador_core::{
    ENV_MIRADOR_ASSISTANT_TIMEOUT_MS, ENV_MIRADOR_BIND_ADDR, ENV_MIRADOR_GEMINI_API_KEY,
    ENV_MIRADOR_HAZARDS_PATH, ENV_MIRADOR_HOMICIDES_PATH, ENV_MIRADOR_LOG,
    ENV_MIRADOR_TOURISM_PATH,
};
use mirador_ingest::{load_tables, SourceSet};
use mirador_server::{build_app_state, build_router, ApiConfig, StartupError};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

fn require_env(name: &str) -> Result<String, StartupError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StartupError(format!(
            "required environment variable is not set: {name}"
        ))),
    }
}

#[tokio::main]
async fn main() -> ProcessExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env(ENV_MIRADOR_LOG).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(e) => {
            error!("fatal startup error: {e}");
            ProcessExitCode::from(mirador_core::ExitCode::DependencyFailure as u8)
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let homicides = PathBuf::from(require_env(ENV_MIRADOR_HOMICIDES_PATH)?);
    let tourism = PathBuf::from(require_env(ENV_MIRADOR_TOURISM_PATH)?);
    let hazards = PathBuf::from(require_env(ENV_MIRADOR_HAZARDS_PATH)?);
    // The assistant credential is required up front; a dashboard without a
    // working chat panel is not served.
    let api_key = require_env(ENV_MIRADOR_GEMINI_API_KEY)?;

    let mut config = ApiConfig::default();
    if let Ok(addr) = env::var(ENV_MIRADOR_BIND_ADDR) {
        if !addr.trim().is_empty() {
            config.bind_addr = addr;
        }
    }
    config.assistant_timeout = env_duration_ms(
        ENV_MIRADOR_ASSISTANT_TIMEOUT_MS,
        config.assistant_timeout.as_millis() as u64,
    );

    let sources = SourceSet::with_default_formats(homicides, tourism, hazards);
    let (tables, log) = load_tables(&sources)?;
    info!(
        homicides = tables.homicides.len(),
        tourism = tables.tourism.len(),
        hazards = tables.hazards.len(),
        dropped = log.dropped_rows(),
        "datasets loaded"
    );

    let assistant = GeminiAssistant::new(api_key, config.assistant_timeout)
        .map_err(|e| StartupError(format!("assistant client: {e}")))?;
    let state = build_app_state(tables, Arc::new(assistant), config.clone())?;

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| StartupError(format!("bind {} failed: {e}", config.bind_addr)))?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, build_router(Arc::new(state)))
        .await
        .map_err(|e| StartupError(format!("server terminated: {e}")))
}
