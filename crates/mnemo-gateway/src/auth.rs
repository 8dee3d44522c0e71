// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handshake authentication for the gateway.
//!
//! A single bearer token authenticates connections; the `principal`
//! query parameter identifies the authenticated user. The token is
//! accepted from the `Authorization: Bearer <token>` header or, for
//! browser WebSocket clients that cannot set headers, from the `token`
//! query parameter.
//!
//! When no token is configured, all handshakes are rejected (fail-closed).

use axum::http::HeaderMap;

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected bearer token. If `None`, every handshake is rejected.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Validates a handshake against the configured token.
///
/// Checks the `Authorization` header first, then the query-parameter
/// fallback.
pub fn authenticate(
    auth: &AuthConfig,
    headers: &HeaderMap,
    query_token: Option<&str>,
) -> bool {
    let Some(ref expected) = auth.bearer_token else {
        tracing::error!("gateway has no auth token configured -- rejecting handshake");
        return false;
    };

    let header_token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match header_token.or(query_token) {
        Some(token) => token == expected,
        None => false,
    }
}
