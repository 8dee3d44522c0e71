// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemo chat server.

use thiserror::Error;

/// The primary error type used across all Mnemo adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transcript store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Vector memory errors (upsert failure, query failure, corrupt embedding blob).
    #[error("memory error: {source}")]
    Memory {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel errors (WebSocket handshake, frame format, delivery).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generative backend errors (API failure, malformed response, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let err = MnemoError::Provider {
            message: "API returned 500".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "provider error: API returned 500");

        let err = MnemoError::Config("missing api key".into());
        assert!(err.to_string().contains("missing api key"));
    }

    #[test]
    fn timeout_reports_duration() {
        let err = MnemoError::Timeout {
            duration: std::time::Duration::from_secs(60),
        };
        assert!(err.to_string().contains("60s"));
    }
}
