// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response types for the Gemini REST API.

use serde::{Deserialize, Serialize};

/// One prompt turn in Gemini's native shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// `"user"` or `"model"`. Absent on embedding requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// A text fragment within a content turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Response body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Request body for `models/{model}:embedContent`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedContentRequest {
    pub content: Content,
}

/// Response body for `models/{model}:embedContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: EmbeddingValues,
}

/// The embedding vector payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingValues {
    pub values: Vec<f32>,
}

/// Structured error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Error detail within [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub status: String,
}
