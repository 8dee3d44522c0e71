// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state for the gateway.

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use mnemo_config::model::GatewayConfig;
use mnemo_core::MnemoError;
use mnemo_pipeline::TurnPipeline;

use crate::auth::AuthConfig;
use crate::handlers;
use crate::registry::RoomRegistry;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Live sessions, principals, and room membership.
    pub registry: Arc<RoomRegistry>,
    /// The per-message turn pipeline.
    pub pipeline: Arc<TurnPipeline>,
    /// Handshake authentication configuration.
    pub auth: AuthConfig,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

impl GatewayState {
    pub fn new(
        registry: Arc<RoomRegistry>,
        pipeline: Arc<TurnPipeline>,
        auth: AuthConfig,
    ) -> Self {
        Self {
            registry,
            pipeline,
            auth,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Builds the gateway router: `/ws` for sessions, `/health` for supervisors.
pub fn build_router(config: &GatewayConfig, state: GatewayState) -> Result<Router, MnemoError> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| MnemoError::Config(format!("invalid allowed_origin: {e}")))?;

    Ok(Router::new()
        .route("/health", get(handlers::get_health))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(origin)))
}

/// Start the gateway HTTP/WebSocket server.
pub async fn start_server(
    config: &GatewayConfig,
    state: GatewayState,
) -> Result<(), MnemoError> {
    let app = build_router(config, state)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MnemoError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| MnemoError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_config::model::PipelineConfig;
    use mnemo_core::types::{ContextTurn, SessionId};
    use mnemo_core::{
        AdapterType, GenerativeBackend, HealthStatus, PluginAdapter, TranscriptStore,
        VectorMemory,
    };
    use mnemo_core::types::{ChatId, Message, MessageId, PrincipalId, Role};
    use mnemo_core::types::{MemoryRecord, ScoredMemory};

    struct NullTranscript;

    #[async_trait::async_trait]
    impl PluginAdapter for NullTranscript {
        fn name(&self) -> &str {
            "null"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Storage
        }
        async fn health_check(&self) -> Result<HealthStatus, mnemo_core::MnemoError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), mnemo_core::MnemoError> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl TranscriptStore for NullTranscript {
        async fn create(
            &self,
            chat: &ChatId,
            principal: Option<&PrincipalId>,
            content: &str,
            role: Role,
        ) -> Result<Message, mnemo_core::MnemoError> {
            Ok(Message {
                id: MessageId("m".into()),
                chat_id: chat.clone(),
                principal_id: principal.cloned(),
                role,
                content: content.into(),
                created_at: String::new(),
            })
        }
        async fn find_recent(
            &self,
            _chat: &ChatId,
            _limit: usize,
        ) -> Result<Vec<Message>, mnemo_core::MnemoError> {
            Ok(vec![])
        }
    }

    struct NullMemory;

    #[async_trait::async_trait]
    impl PluginAdapter for NullMemory {
        fn name(&self) -> &str {
            "null"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Memory
        }
        async fn health_check(&self) -> Result<HealthStatus, mnemo_core::MnemoError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), mnemo_core::MnemoError> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl VectorMemory for NullMemory {
        async fn upsert(&self, _record: MemoryRecord) -> Result<(), mnemo_core::MnemoError> {
            Ok(())
        }
        async fn query(
            &self,
            _vector: &[f32],
            _limit: usize,
            _principal: &PrincipalId,
        ) -> Result<Vec<ScoredMemory>, mnemo_core::MnemoError> {
            Ok(vec![])
        }
    }

    struct NullBackend;

    #[async_trait::async_trait]
    impl PluginAdapter for NullBackend {
        fn name(&self) -> &str {
            "null"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Generative
        }
        async fn health_check(&self) -> Result<HealthStatus, mnemo_core::MnemoError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), mnemo_core::MnemoError> {
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl GenerativeBackend for NullBackend {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, mnemo_core::MnemoError> {
            Ok(vec![0.0])
        }
        async fn generate(
            &self,
            _turns: &[ContextTurn],
        ) -> Result<String, mnemo_core::MnemoError> {
            Ok("ok".into())
        }
    }

    fn make_state() -> GatewayState {
        let registry = Arc::new(RoomRegistry::new());
        let pipeline = Arc::new(TurnPipeline::new(
            Arc::new(NullTranscript),
            Arc::new(NullMemory),
            Arc::new(NullBackend),
            registry.clone(),
            PipelineConfig::default(),
        ));
        GatewayState::new(
            registry,
            pipeline,
            AuthConfig {
                bearer_token: Some("secret".into()),
            },
        )
    }

    #[tokio::test]
    async fn router_builds_with_valid_origin() {
        let state = make_state();
        let config = GatewayConfig::default();
        assert!(build_router(&config, state).is_ok());
    }

    #[tokio::test]
    async fn router_rejects_invalid_origin() {
        let state = make_state();
        let config = GatewayConfig {
            allowed_origin: "not a header\nvalue".into(),
            ..GatewayConfig::default()
        };
        assert!(build_router(&config, state).is_err());
    }

    #[test]
    fn gateway_state_is_clone() {
        let state = make_state();
        let cloned = state.clone();
        let _session = SessionId("s".into());
        assert!(Arc::ptr_eq(&state.registry, &cloned.registry));
    }
}
