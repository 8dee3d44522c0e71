// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo chat server.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Server identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// WebSocket gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Transcript store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vector memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Message pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the server.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "mnemo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WebSocket gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token clients must present at the WebSocket handshake.
    /// `None` rejects all handshakes (fail-closed).
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Origin allowed by the CORS layer.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4025
}

fn default_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

/// Transcript store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    "mnemo.db".to_string()
}

fn default_true() -> bool {
    true
}

/// Vector memory configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Path to the SQLite database holding memory records.
    /// `None` shares the transcript store's database file.
    #[serde(default)]
    pub database_path: Option<String>,
}

fn default_recall_limit() -> usize {
    3
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires the GEMINI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for text generation.
    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    /// Model used for embeddings.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            generation_model: default_generation_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_generation_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

/// Message pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of recent transcript messages assembled into the prompt.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Number of semantically recalled memories assembled into the prompt.
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,

    /// Deadline for the generation call, in seconds.
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            recall_limit: default_recall_limit(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

fn default_history_limit() -> usize {
    20
}

fn default_generation_timeout_secs() -> u64 {
    60
}
