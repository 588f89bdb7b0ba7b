//! # canvas-relay
//!
//! Session and broadcast relay for a shared real-time drawing canvas.
//!
//! Participants connect over WebSocket, join with a display name, and send
//! stroke events. The relay forwards every stroke to all other connections
//! and keeps every client's roster of who is present in sync. Nothing is
//! stored: a client that joins late starts with a blank canvas.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BroadcastRelay (relay/)
//!     │
//!     └── SessionRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod relay;
pub mod server;
pub mod ws;
