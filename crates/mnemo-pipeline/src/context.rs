// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt context assembly: recalled memories plus chronological history.

use mnemo_core::types::{ContextTurn, Message, Role, ScoredMemory};

/// Fixed preamble for the synthetic leading turn carrying recalled memories.
pub const MEMORY_PREAMBLE: &str =
    "These are relevant messages from earlier conversations. Use them to inform your response.";

/// Builds the ordered prompt sequence for a generation call.
///
/// The first turn is always a synthetic `user` turn: the preamble
/// followed by the recalled memory texts, newline-joined in the order
/// the vector query returned them. The query's ranking is preserved
/// verbatim; ties were already broken by the index and are never
/// re-sorted here. The remaining turns are the chronological history
/// mapped role-for-role.
pub fn assemble(memories: &[ScoredMemory], history: &[Message]) -> Vec<ContextTurn> {
    let mut text = String::from(MEMORY_PREAMBLE);
    for scored in memories {
        text.push('\n');
        text.push_str(&scored.record.metadata.text);
    }

    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.push(ContextTurn {
        role: Role::User,
        text,
    });
    turns.extend(history.iter().map(|msg| ContextTurn {
        role: msg.role,
        text: msg.content.clone(),
    }));
    turns
}
