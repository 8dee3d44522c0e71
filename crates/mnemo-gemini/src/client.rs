// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini REST API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication, and transient error retry for the `generateContent`
//! and `embedContent` endpoints.

use std::time::Duration;

use mnemo_core::MnemoError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{
    ApiErrorResponse, Content, EmbedContentRequest, EmbedContentResponse,
    GenerateContentRequest, GenerateContentResponse, Part,
};

/// Base URL for the Gemini REST API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for Gemini API communication.
///
/// Manages the authentication header, connection pooling, and retry logic
/// for transient errors (429, 500, 503).
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    pub fn new(api_key: &str) -> Result<Self, MnemoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                MnemoError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MnemoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Generates a reply from an ordered sequence of content turns.
    ///
    /// Returns the concatenated text parts of the first candidate.
    pub async fn generate_content(
        &self,
        model: &str,
        contents: Vec<Content>,
    ) -> Result<String, MnemoError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateContentRequest { contents };
        let body = self.post_with_retry(&url, &request).await?;

        let response: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| MnemoError::Provider {
                message: format!("failed to parse generateContent response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| MnemoError::Provider {
                message: "generateContent returned no candidates".into(),
                source: None,
            })?;

        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        debug!(
            model,
            finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
            chars = text.len(),
            "generation complete"
        );
        Ok(text)
    }

    /// Computes an embedding for the given text.
    pub async fn embed_content(
        &self,
        model: &str,
        text: &str,
    ) -> Result<Vec<f32>, MnemoError> {
        let url = format!("{}/models/{}:embedContent", self.base_url, model);
        let request = EmbedContentRequest {
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };
        let body = self.post_with_retry(&url, &request).await?;

        let response: EmbedContentResponse =
            serde_json::from_str(&body).map_err(|e| MnemoError::Provider {
                message: format!("failed to parse embedContent response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if response.embedding.values.is_empty() {
            return Err(MnemoError::Provider {
                message: "embedContent returned an empty vector".into(),
                source: None,
            });
        }
        Ok(response.embedding.values)
    }

    /// POSTs a JSON body, retrying once after a 1-second delay on
    /// transient statuses (429, 500, 503).
    async fn post_with_retry<T: serde::Serialize>(
        &self,
        url: &str,
        request: &T,
    ) -> Result<String, MnemoError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying Gemini request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(url)
                .json(request)
                .send()
                .await
                .map_err(|e| MnemoError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "Gemini response received");

            if status.is_success() {
                return response.text().await.map_err(|e| MnemoError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(MnemoError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body)
            {
                format!(
                    "Gemini API error ({}): {}",
                    api_err.error.status, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(MnemoError::Provider {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| MnemoError::Provider {
            message: "request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key")
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn user_turn(text: &str) -> Content {
        Content {
            role: Some("user".into()),
            parts: vec![Part { text: text.into() }],
        }
    }

    #[tokio::test]
    async fn generate_content_returns_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Paris"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client
            .generate_content("gemini-2.0-flash", vec![user_turn("capital of France?")])
            .await
            .unwrap();
        assert_eq!(text, "Paris");
    }

    #[tokio::test]
    async fn generate_content_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Pa"}, {"text": "ris"}]}
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client
            .generate_content("gemini-2.0-flash", vec![user_turn("hm?")])
            .await
            .unwrap();
        assert_eq!(text, "Paris");
    }

    #[tokio::test]
    async fn generate_content_sends_turns_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "first"}]},
                    {"role": "model", "parts": [{"text": "second"}]}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let turns = vec![
            user_turn("first"),
            Content {
                role: Some("model".into()),
                parts: vec![Part {
                    text: "second".into(),
                }],
            },
        ];
        client
            .generate_content("gemini-2.0-flash", turns)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_candidates_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content("gemini-2.0-flash", vec![user_turn("?")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn embed_content_returns_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:embedContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embedding": {"values": [0.1, 0.2, 0.3]}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let vector = client
            .embed_content("text-embedding-004", "hello")
            .await
            .unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn transient_error_retries_once_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "recovered"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let text = client
            .generate_content("gemini-2.0-flash", vec![user_turn("?")])
            .await
            .unwrap();
        assert_eq!(text, "recovered");
    }

    #[tokio::test]
    async fn non_transient_error_decodes_api_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "invalid request", "status": "INVALID_ARGUMENT"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content("gemini-2.0-flash", vec![user_turn("?")])
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("INVALID_ARGUMENT"));
        assert!(msg.contains("invalid request"));
    }
}
