// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append and range-query operations.

use std::str::FromStr;

use mnemo_core::types::{ChatId, Message, MessageId, PrincipalId, Role};
use mnemo_core::MnemoError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Append a message to the transcript.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), MnemoError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, chat_id, principal_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    msg.id.0,
                    msg.chat_id.0,
                    msg.principal_id.map(|p| p.0),
                    msg.role.to_string(),
                    msg.content,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get up to `limit` most recent messages for a conversation, newest-first.
///
/// The rowid tiebreak keeps messages created within the same timestamp
/// granularity in a stable order.
pub async fn recent_messages(
    db: &Database,
    chat_id: &ChatId,
    limit: usize,
) -> Result<Vec<Message>, MnemoError> {
    let chat_id = chat_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, principal_id, role, content, created_at
                 FROM messages WHERE chat_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![chat_id, limit as i64], |row| {
                let role_str: String = row.get(3)?;
                Ok(Message {
                    id: MessageId(row.get(0)?),
                    chat_id: ChatId(row.get(1)?),
                    principal_id: row
                        .get::<_, Option<String>>(2)?
                        .map(PrincipalId),
                    role: Role::from_str(&role_str).unwrap_or(Role::Model),
                    content: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}
