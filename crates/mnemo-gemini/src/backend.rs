// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GenerativeBackend implementation backed by the Gemini REST API.

use async_trait::async_trait;

use mnemo_config::model::GeminiConfig;
use mnemo_core::types::ContextTurn;
use mnemo_core::{
    AdapterType, GenerativeBackend, HealthStatus, MnemoError, PluginAdapter,
};

use crate::client::GeminiClient;
use crate::types::{Content, Part};

/// Gemini-backed generative adapter.
///
/// Routes `generate` to the configured generation model and `embed` to
/// the configured embedding model through one shared HTTP client.
pub struct GeminiBackend {
    client: GeminiClient,
    generation_model: String,
    embedding_model: String,
}

impl GeminiBackend {
    /// Creates the backend from configuration.
    ///
    /// The API key is taken from config, falling back to the
    /// `GEMINI_API_KEY` environment variable.
    pub fn new(config: &GeminiConfig) -> Result<Self, MnemoError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                MnemoError::Config(
                    "Gemini API key required: set [gemini].api_key or GEMINI_API_KEY".into(),
                )
            })?;
        Ok(Self {
            client: GeminiClient::new(&api_key)?,
            generation_model: config.generation_model.clone(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    /// Overrides the API base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generative
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        // No cheap unauthenticated probe exists; report healthy and let
        // per-call errors surface through the pipeline's failure policy.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        self.client.embed_content(&self.embedding_model, text).await
    }

    async fn generate(&self, turns: &[ContextTurn]) -> Result<String, MnemoError> {
        let contents: Vec<Content> = turns
            .iter()
            .map(|turn| Content {
                role: Some(turn.role.to_string()),
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        self.client
            .generate_content(&self.generation_model, contents)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::types::Role;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_backend(base_url: &str) -> GeminiBackend {
        let config = GeminiConfig {
            api_key: Some("test-key".into()),
            generation_model: "gemini-2.0-flash".into(),
            embedding_model: "text-embedding-004".into(),
        };
        GeminiBackend::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = GeminiConfig {
            api_key: None,
            ..GeminiConfig::default()
        };
        // GEMINI_API_KEY may leak in from the environment; only assert
        // when it is absent.
        if std::env::var("GEMINI_API_KEY").is_err() {
            assert!(GeminiBackend::new(&config).is_err());
        }
    }

    #[tokio::test]
    async fn generate_maps_roles_to_gemini_names() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "question"}]},
                    {"role": "model", "parts": [{"text": "earlier answer"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "reply"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let turns = vec![
            ContextTurn {
                role: Role::User,
                text: "question".into(),
            },
            ContextTurn {
                role: Role::Model,
                text: "earlier answer".into(),
            },
        ];
        let reply = backend.generate(&turns).await.unwrap();
        assert_eq!(reply, "reply");
    }

    #[tokio::test]
    async fn embed_uses_embedding_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:embedContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": {"values": [0.5, -0.5]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let vector = backend.embed("some text").await.unwrap();
        assert_eq!(vector, vec![0.5, -0.5]);
    }

    #[tokio::test]
    async fn adapter_identity() {
        let server = MockServer::start().await;
        let backend = test_backend(&server.uri());
        assert_eq!(backend.name(), "gemini");
        assert_eq!(backend.adapter_type(), AdapterType::Generative);
        assert_eq!(
            backend.health_check().await.unwrap(),
            HealthStatus::Healthy
        );
    }
}
