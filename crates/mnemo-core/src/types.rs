// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Mnemo workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation (also the multicast room key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated identity bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a stored message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author role of a transcript message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human participant.
    User,
    /// The generative model (including synthetic error replies).
    Model,
}

/// One transcript entry. Immutable once created.
///
/// `principal_id` is `None` for synthetic replies written when no
/// authenticated principal could be attributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub principal_id: Option<PrincipalId>,
    pub role: Role,
    pub content: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Filterable metadata stored alongside an embedding.
///
/// `text` duplicates the source message content verbatim so recall can
/// return readable context without a transcript join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub chat_id: ChatId,
    pub principal_id: PrincipalId,
    pub text: String,
}

/// A stored embedding plus metadata enabling later semantic recall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    /// The transcript message this record was derived from.
    pub message_id: MessageId,
    #[serde(skip)]
    pub embedding: Vec<f32>,
    pub metadata: MemoryMetadata,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A memory record with its similarity score from a vector query.
#[derive(Debug, Clone)]
pub struct ScoredMemory {
    pub record: MemoryRecord,
    pub score: f32,
}

/// One ordered turn of the prompt handed to the generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTurn {
    pub role: Role,
    pub text: String,
}

/// Inbound message event submitted by an authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub content: String,
}

/// Reply event delivered to every member of the conversation's room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub content: String,
    pub chat: ChatId,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind the [`crate::PluginAdapter`] seam.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Memory,
    Generative,
}
