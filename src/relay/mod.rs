//! Relay layer: connection ownership and fan-out policy.
//!
//! [`BroadcastRelay`] drives the [`crate::domain::SessionRegistry`] on
//! connect, join, and disconnect, and enforces who receives which event
//! through a single [`BroadcastScope`]-parameterized broadcast.

pub mod broadcast_relay;

pub use broadcast_relay::{BroadcastRelay, BroadcastScope, Outbound};
