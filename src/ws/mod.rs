//! WebSocket layer: upgrade handling, the per-connection loop, and the
//! wire format.
//!
//! The endpoint at `/ws` carries every drawing and roster event.

pub mod connection;
pub mod handler;
pub mod messages;
