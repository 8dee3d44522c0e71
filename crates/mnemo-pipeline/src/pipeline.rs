// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-message turn pipeline.
//!
//! One [`TurnPipeline::run_turn`] call executes a complete turn: ingest,
//! remember, recall, assemble, generate, deliver, persist. Independent
//! external calls within a stage run concurrently (`try_join!`); a
//! failure in any required stage aborts the turn by writing exactly one
//! synthetic error message and performing no broadcast. Session liveness
//! is read at two checkpoints; in-flight calls are never cancelled, only
//! their effects are suppressed.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use mnemo_config::model::PipelineConfig;
use mnemo_core::types::{
    ChatId, InboundEvent, MemoryMetadata, MemoryRecord, Message, OutboundEvent,
    PrincipalId, Role, SessionId,
};
use mnemo_core::{
    GenerativeBackend, MnemoError, SessionRegistry, TranscriptStore, VectorMemory,
};

use crate::context;

/// Fixed user-facing content of the synthetic error reply.
pub const ERROR_REPLY: &str = "Error occurred: failed to process your request.";

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Reply generated, broadcast, and (best-effort) persisted.
    Completed,
    /// Originating session dropped at a liveness checkpoint; no broadcast.
    Disconnected,
    /// An upstream call failed; synthetic error message written, no broadcast.
    Failed,
}

/// Orchestrates one turn per inbound user message.
///
/// Holds only shared handles to the external collaborators; all per-turn
/// data is task-local, so concurrent turns need no coordination beyond
/// what the stores themselves provide.
pub struct TurnPipeline {
    transcript: Arc<dyn TranscriptStore>,
    memory: Arc<dyn VectorMemory>,
    backend: Arc<dyn GenerativeBackend>,
    registry: Arc<dyn SessionRegistry>,
    config: PipelineConfig,
}

impl TurnPipeline {
    pub fn new(
        transcript: Arc<dyn TranscriptStore>,
        memory: Arc<dyn VectorMemory>,
        backend: Arc<dyn GenerativeBackend>,
        registry: Arc<dyn SessionRegistry>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            transcript,
            memory,
            backend,
            registry,
            config,
        }
    }

    /// Executes one turn to completion or to a defined failure outcome.
    ///
    /// Never returns an error: every failure path ends by writing the
    /// synthetic error reply. The caller gets the outcome for
    /// observability only.
    pub async fn run_turn(
        &self,
        session: &SessionId,
        principal: &PrincipalId,
        event: InboundEvent,
    ) -> TurnOutcome {
        debug!(
            session = %session,
            principal = %principal,
            chat = %event.chat,
            "turn started"
        );
        match self.process(session, principal, &event).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    chat = %event.chat,
                    principal = %principal,
                    %error,
                    "turn failed, writing synthetic error reply"
                );
                self.write_error_reply(&event.chat, Some(principal)).await;
                TurnOutcome::Failed
            }
        }
    }

    async fn process(
        &self,
        session: &SessionId,
        principal: &PrincipalId,
        event: &InboundEvent,
    ) -> Result<TurnOutcome, MnemoError> {
        // Ingest: persist the user message and embed it, concurrently.
        // Both must succeed before anything else happens.
        let (user_msg, user_vec) = tokio::try_join!(
            self.transcript
                .create(&event.chat, Some(principal), &event.content, Role::User),
            self.backend.embed(&event.content),
        )?;

        // Remember: index the user message for future recall.
        self.memory
            .upsert(memory_record(&user_msg, user_vec.clone(), principal))
            .await?;

        // Recall: similar past messages and recent transcript, concurrently.
        let (memories, mut history) = tokio::try_join!(
            self.memory
                .query(&user_vec, self.config.recall_limit, principal),
            self.transcript
                .find_recent(&event.chat, self.config.history_limit),
        )?;
        // find_recent returns newest-first; the prompt wants chronological.
        history.reverse();

        let turns = context::assemble(&memories, &history);

        // Liveness checkpoint A: don't spend a generation call on a
        // session that already went away.
        if !self.registry.is_connected(session) {
            debug!(session = %session, "session gone before generation, aborting turn");
            self.write_error_reply(&event.chat, Some(principal)).await;
            return Ok(TurnOutcome::Disconnected);
        }

        // Generate, bounded by a deadline. Expiry is a generation failure.
        let deadline = Duration::from_secs(self.config.generation_timeout_secs);
        let reply = match timeout(deadline, self.backend.generate(&turns)).await {
            Ok(result) => result?,
            Err(_) => return Err(MnemoError::Timeout { duration: deadline }),
        };

        // Liveness checkpoint B: the session may have dropped during the
        // call. The generated text is discarded, not delivered.
        if !self.registry.is_connected(session) {
            debug!(session = %session, "session gone after generation, discarding reply");
            self.write_error_reply(&event.chat, Some(principal)).await;
            return Ok(TurnOutcome::Disconnected);
        }

        // Deliver to the full room, originator included.
        let delivered = self.registry.broadcast(
            &event.chat,
            &OutboundEvent {
                content: reply.clone(),
                chat: event.chat.clone(),
            },
        );
        info!(
            chat = %event.chat,
            delivered,
            chars = reply.len(),
            "reply broadcast"
        );

        // Persist the reply and its embedding. The user already has the
        // content; failures here are logged and swallowed.
        self.persist_reply(&event.chat, principal, &reply).await;

        Ok(TurnOutcome::Completed)
    }

    /// Persists the model reply and upserts its memory record, concurrently
    /// where independent. Never fails the turn.
    async fn persist_reply(&self, chat: &ChatId, principal: &PrincipalId, reply: &str) {
        let persisted = tokio::try_join!(
            self.transcript
                .create(chat, Some(principal), reply, Role::Model),
            self.backend.embed(reply),
        );
        match persisted {
            Ok((reply_msg, reply_vec)) => {
                if let Err(error) = self
                    .memory
                    .upsert(memory_record(&reply_msg, reply_vec, principal))
                    .await
                {
                    warn!(chat = %chat, %error, "reply memory upsert failed");
                }
            }
            Err(error) => {
                warn!(chat = %chat, %error, "reply persistence failed");
            }
        }
    }

    /// Writes the synthetic error message. Best-effort: a failure here is
    /// only logged, there is nothing left to recover.
    async fn write_error_reply(&self, chat: &ChatId, principal: Option<&PrincipalId>) {
        if let Err(error) = self
            .transcript
            .create(chat, principal, ERROR_REPLY, Role::Model)
            .await
        {
            warn!(chat = %chat, %error, "failed to write synthetic error reply");
        }
    }
}

/// Builds the memory record for a stored message.
///
/// The metadata duplicates the message text verbatim so recall can
/// surface it without a transcript join.
fn memory_record(msg: &Message, embedding: Vec<f32>, principal: &PrincipalId) -> MemoryRecord {
    MemoryRecord {
        id: uuid::Uuid::new_v4().to_string(),
        message_id: msg.id.clone(),
        embedding,
        metadata: MemoryMetadata {
            chat_id: msg.chat_id.clone(),
            principal_id: principal.clone(),
            text: msg.content.clone(),
        },
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}
