// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket gateway for the Mnemo chat server.
//!
//! Owns the session registry (live connections, principals, room
//! membership), the `/ws` upgrade endpoint with handshake auth, and the
//! room broadcast path that delivers generated replies to every
//! conversation participant.

pub mod auth;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod ws;

pub use auth::AuthConfig;
pub use registry::RoomRegistry;
pub use server::{start_server, GatewayState};
