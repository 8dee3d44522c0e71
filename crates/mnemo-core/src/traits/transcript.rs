// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript store trait: the append-only ordered message log per conversation.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, Message, PrincipalId, Role};

/// Append-only ordered message log, one logical log per conversation.
///
/// Implementations must tolerate unordered concurrent writers: multiple
/// turns across multiple conversations append without coordination from
/// the pipeline.
#[async_trait]
pub trait TranscriptStore: PluginAdapter {
    /// Appends a message and returns the stored record.
    ///
    /// `principal` is `None` for synthetic replies with no attributable
    /// author.
    async fn create(
        &self,
        chat: &ChatId,
        principal: Option<&PrincipalId>,
        content: &str,
        role: Role,
    ) -> Result<Message, MnemoError>;

    /// Returns up to `limit` most recent messages for a conversation,
    /// newest-first. Callers reverse for chronological order.
    async fn find_recent(
        &self,
        chat: &ChatId,
        limit: usize,
    ) -> Result<Vec<Message>, MnemoError>;
}
