// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session registry trait: the view of live connections exposed to the pipeline.

use crate::types::{ChatId, OutboundEvent, SessionId};

/// Live-connection registry consumed by the pipeline.
///
/// `join` is session-level (invoked by the gateway before message
/// submission) and deliberately absent here: the pipeline only reads
/// liveness and multicasts.
pub trait SessionRegistry: Send + Sync + 'static {
    /// Returns whether the session is still connected.
    ///
    /// Read without locking at liveness checkpoints; a race with an
    /// immediately-following disconnect is acceptable and bounded to at
    /// most one wasted broadcast attempt.
    fn is_connected(&self, session: &SessionId) -> bool;

    /// Delivers an event to every session currently joined to the room,
    /// the originator included. Returns the number of sessions the event
    /// was handed to. No ordering or exactly-once guarantee.
    fn broadcast(&self, room: &ChatId, event: &OutboundEvent) -> usize;
}
