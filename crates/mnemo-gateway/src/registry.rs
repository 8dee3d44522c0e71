// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session registry and room multicast.
//!
//! A room is a multicast group keyed by conversation id. Delivery is
//! at-most-once and carries no sequence numbers; consumers must tolerate
//! out-of-order arrival across distinct turns.

use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use mnemo_core::types::{ChatId, OutboundEvent, PrincipalId, SessionId};
use mnemo_core::SessionRegistry;

/// A registered live connection.
struct SessionEntry {
    principal: PrincipalId,
    sender: mpsc::Sender<String>,
}

/// Maps connection identities to principals and room memberships, and
/// delivers broadcasts to all members of a room.
///
/// All maps are lock-free concurrent maps; liveness reads at pipeline
/// checkpoints never block message handling.
#[derive(Default)]
pub struct RoomRegistry {
    sessions: DashMap<SessionId, SessionEntry>,
    rooms: DashMap<ChatId, HashSet<SessionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection bound to an authenticated principal.
    ///
    /// `sender` receives serialized outbound frames for this connection.
    pub fn register(
        &self,
        session: SessionId,
        principal: PrincipalId,
        sender: mpsc::Sender<String>,
    ) {
        debug!(session = %session, principal = %principal, "session registered");
        self.sessions
            .insert(session, SessionEntry { principal, sender });
    }

    /// Adds a session to a room. Idempotent: joining a room the session is
    /// already in has no effect beyond the first join.
    pub fn join(&self, session: &SessionId, room: &ChatId) {
        let newly_joined = self
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(session.clone());
        if newly_joined {
            debug!(session = %session, room = %room, "session joined room");
        }
    }

    /// Removes a session and all of its room memberships.
    pub fn remove_session(&self, session: &SessionId) {
        self.sessions.remove(session);
        for mut entry in self.rooms.iter_mut() {
            entry.value_mut().remove(session);
        }
        self.rooms.retain(|_, members| !members.is_empty());
        debug!(session = %session, "session removed");
    }

    /// Returns the principal bound to a session, if it is still connected.
    pub fn principal_of(&self, session: &SessionId) -> Option<PrincipalId> {
        self.sessions.get(session).map(|e| e.principal.clone())
    }

    /// Returns the current membership size of a room.
    pub fn member_count(&self, room: &ChatId) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}

impl SessionRegistry for RoomRegistry {
    fn is_connected(&self, session: &SessionId) -> bool {
        self.sessions.contains_key(session)
    }

    fn broadcast(&self, room: &ChatId, event: &OutboundEvent) -> usize {
        let Some(members) = self.rooms.get(room) else {
            return 0;
        };
        let frame = serde_json::json!({
            "type": "reply",
            "content": event.content,
            "chat": event.chat,
        })
        .to_string();

        let mut delivered = 0;
        for session in members.iter() {
            if let Some(entry) = self.sessions.get(session) {
                if entry.sender.try_send(frame.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }
        debug!(room = %room, delivered, "broadcast dispatched");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(
        registry: &RoomRegistry,
        session: &str,
        principal: &str,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(16);
        registry.register(
            SessionId(session.to_string()),
            PrincipalId(principal.to_string()),
            tx,
        );
        rx
    }

    fn event(content: &str, chat: &str) -> OutboundEvent {
        OutboundEvent {
            content: content.to_string(),
            chat: ChatId(chat.to_string()),
        }
    }

    #[tokio::test]
    async fn join_is_idempotent() {
        let registry = RoomRegistry::new();
        let _rx = connect(&registry, "s1", "u1");
        let session = SessionId("s1".into());
        let room = ChatId("c1".into());

        registry.join(&session, &room);
        registry.join(&session, &room);
        registry.join(&session, &room);

        assert_eq!(registry.member_count(&room), 1);
    }

    #[tokio::test]
    async fn broadcast_reaches_full_membership_including_originator() {
        let registry = RoomRegistry::new();
        let mut rx1 = connect(&registry, "s1", "u1");
        let mut rx2 = connect(&registry, "s2", "u2");
        let room = ChatId("c1".into());
        registry.join(&SessionId("s1".into()), &room);
        registry.join(&SessionId("s2".into()), &room);

        let delivered = registry.broadcast(&room, &event("hello room", "c1"));
        assert_eq!(delivered, 2);

        let f1 = rx1.recv().await.unwrap();
        let f2 = rx2.recv().await.unwrap();
        for frame in [f1, f2] {
            let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(json["type"], "reply");
            assert_eq!(json["content"], "hello room");
            assert_eq!(json["chat"], "c1");
        }
    }

    #[tokio::test]
    async fn broadcast_skips_other_rooms() {
        let registry = RoomRegistry::new();
        let mut rx1 = connect(&registry, "s1", "u1");
        let _rx2 = connect(&registry, "s2", "u2");
        registry.join(&SessionId("s1".into()), &ChatId("c1".into()));
        registry.join(&SessionId("s2".into()), &ChatId("c2".into()));

        let delivered = registry.broadcast(&ChatId("c1".into()), &event("only c1", "c1"));
        assert_eq!(delivered, 1);
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn broadcast_to_empty_room_delivers_nothing() {
        let registry = RoomRegistry::new();
        assert_eq!(
            registry.broadcast(&ChatId("nobody".into()), &event("x", "nobody")),
            0
        );
    }

    #[tokio::test]
    async fn disconnect_clears_liveness_and_membership() {
        let registry = RoomRegistry::new();
        let _rx = connect(&registry, "s1", "u1");
        let session = SessionId("s1".into());
        let room = ChatId("c1".into());
        registry.join(&session, &room);

        assert!(registry.is_connected(&session));
        assert_eq!(registry.member_count(&room), 1);

        registry.remove_session(&session);
        assert!(!registry.is_connected(&session));
        assert_eq!(registry.member_count(&room), 0);
        assert_eq!(registry.broadcast(&room, &event("x", "c1")), 0);
    }

    #[tokio::test]
    async fn stale_membership_without_session_is_not_delivered() {
        let registry = RoomRegistry::new();
        let _rx = connect(&registry, "s1", "u1");
        let session = SessionId("s1".into());
        let room = ChatId("c1".into());
        registry.join(&session, &room);

        // Remove only the session entry, leaving the room set untouched,
        // to simulate the race window between drop and cleanup.
        registry.sessions.remove(&session);
        assert_eq!(registry.broadcast(&room, &event("x", "c1")), 0);
    }

    #[tokio::test]
    async fn principal_lookup_follows_lifecycle() {
        let registry = RoomRegistry::new();
        let _rx = connect(&registry, "s1", "u1");
        let session = SessionId("s1".into());

        assert_eq!(
            registry.principal_of(&session),
            Some(PrincipalId("u1".into()))
        );
        registry.remove_session(&session);
        assert_eq!(registry.principal_of(&session), None);
    }
}
