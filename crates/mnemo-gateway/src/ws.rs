// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for bidirectional chat sessions.
//!
//! Client -> Server (JSON):
//! ```json
//! {"type": "join", "chat": "chat-id"}
//! {"type": "message", "chat": "chat-id", "content": "What's the capital of France?"}
//! ```
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "reply", "content": "Paris.", "chat": "chat-id"}
//! ```
//!
//! Replies arrive via the room broadcast, originator included, so
//! clients must not optimistically render an awaited reply.

use std::collections::HashMap;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use mnemo_core::types::{ChatId, InboundEvent, PrincipalId, SessionId};

use crate::auth;
use crate::server::GatewayState;

/// WebSocket message from client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsIncoming {
    /// Join a conversation's room (client-directed, idempotent).
    Join { chat: String },
    /// Submit a user message for one pipeline turn.
    Message { chat: String, content: String },
}

/// WebSocket upgrade handler.
///
/// Authenticates during the handshake: the bearer token (header or
/// `token` query parameter) must match, and the `principal` query
/// parameter names the authenticated identity. Rejected handshakes
/// never upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<GatewayState>,
) -> Response {
    if !auth::authenticate(&state.auth, &headers, params.get("token").map(String::as_str)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(principal) = params.get("principal").filter(|p| !p.is_empty()).cloned()
    else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, PrincipalId(principal)))
}

/// Handle an individual WebSocket connection.
///
/// Registers the session, spawns a sender task forwarding broadcast
/// frames to the socket, and dispatches inbound frames: joins mutate
/// room membership, messages each spawn one pipeline turn so a slow
/// generation never blocks the read loop.
async fn handle_socket(socket: WebSocket, state: GatewayState, principal: PrincipalId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let session = SessionId(uuid::Uuid::new_v4().to_string());

    let (tx, mut rx) = mpsc::channel::<String>(64);
    state
        .registry
        .register(session.clone(), principal.clone(), tx);

    // Forward outbound frames (room broadcasts) to this socket.
    let sender_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let incoming: WsIncoming = match serde_json::from_str(&text) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(session = %session, "invalid WebSocket frame: {e}");
                        continue;
                    }
                };

                match incoming {
                    WsIncoming::Join { chat } => {
                        state.registry.join(&session, &ChatId(chat));
                    }
                    WsIncoming::Message { chat, content } => {
                        let event = InboundEvent {
                            chat: ChatId(chat),
                            content,
                        };
                        let pipeline = state.pipeline.clone();
                        let session = session.clone();
                        let principal = principal.clone();
                        // One logical task per inbound message event; the
                        // read loop keeps handling frames meanwhile.
                        tokio::spawn(async move {
                            pipeline.run_turn(&session, &principal, event).await;
                        });
                    }
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by the protocol layer).
        }
    }

    // Cleanup: drop liveness and membership, stop the forwarder.
    state.registry.remove_session(&session);
    sender_task.abort();
    debug!(session = %session, "websocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_frame_deserializes() {
        let json = r#"{"type": "join", "chat": "chat-1"}"#;
        let msg: WsIncoming = serde_json::from_str(json).unwrap();
        match msg {
            WsIncoming::Join { chat } => assert_eq!(chat, "chat-1"),
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn message_frame_deserializes() {
        let json = r#"{"type": "message", "chat": "chat-1", "content": "hello"}"#;
        let msg: WsIncoming = serde_json::from_str(json).unwrap();
        match msg {
            WsIncoming::Message { chat, content } => {
                assert_eq!(chat, "chat-1");
                assert_eq!(content, "hello");
            }
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn unknown_frame_type_is_an_error() {
        let json = r#"{"type": "typing", "chat": "chat-1"}"#;
        assert!(serde_json::from_str::<WsIncoming>(json).is_err());
    }

    #[test]
    fn missing_content_is_an_error() {
        let json = r#"{"type": "message", "chat": "chat-1"}"#;
        assert!(serde_json::from_str::<WsIncoming>(json).is_err());
    }
}
