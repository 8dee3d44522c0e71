// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo serve` command implementation.
//!
//! Wires the full stack: SQLite transcript store, SQLite vector memory,
//! the Gemini backend, the room registry, the turn pipeline, and the
//! WebSocket gateway.

use std::sync::Arc;

use tracing::{error, info, warn};

use mnemo_config::MnemoConfig;
use mnemo_core::MnemoError;
use mnemo_gateway::{start_server, AuthConfig, GatewayState, RoomRegistry};
use mnemo_gemini::GeminiBackend;
use mnemo_memory::SqliteVectorMemory;
use mnemo_pipeline::TurnPipeline;
use mnemo_storage::SqliteTranscript;

/// Runs the `mnemo serve` command.
pub async fn run_serve(config: MnemoConfig) -> Result<(), MnemoError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting mnemo serve");

    // Transcript store.
    let transcript = SqliteTranscript::new(config.storage.clone());
    transcript.initialize().await?;
    let transcript = Arc::new(transcript);

    // Vector memory, sharing the transcript database file unless
    // configured with its own.
    let memory_path = config
        .memory
        .database_path
        .clone()
        .unwrap_or_else(|| config.storage.database_path.clone());
    let memory = SqliteVectorMemory::new(memory_path);
    memory.initialize().await?;
    let memory = Arc::new(memory);

    // Generative backend.
    let backend = GeminiBackend::new(&config.gemini).map_err(|e| {
        error!(error = %e, "failed to initialize Gemini backend");
        eprintln!(
            "error: Gemini API key required. Set via [gemini].api_key or the GEMINI_API_KEY environment variable."
        );
        e
    })?;
    let backend = Arc::new(backend);

    // Session registry and pipeline.
    let registry = Arc::new(RoomRegistry::new());
    let pipeline = Arc::new(TurnPipeline::new(
        transcript,
        memory,
        backend,
        registry.clone(),
        config.pipeline.clone(),
    ));

    if config.gateway.bearer_token.is_none() {
        warn!("no gateway bearer token configured -- all WebSocket handshakes will be rejected");
    }
    let state = GatewayState::new(
        registry,
        pipeline,
        AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    );

    start_server(&config.gateway, state).await
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
