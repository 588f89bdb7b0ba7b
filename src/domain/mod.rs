//! Domain layer: connection identity, sessions, registry, and events.
//!
//! Nothing in this module touches the network. The registry and event
//! types are driven by [`crate::relay::BroadcastRelay`] and can be tested
//! in isolation.

pub mod connection_id;
pub mod event;
pub mod session;
pub mod session_registry;

pub use connection_id::ConnectionId;
pub use event::{ClientEvent, DrawingEvent, ServerEvent, StrokePayload};
pub use session::{RegistrySnapshot, RosterEntry, Session};
pub use session_registry::SessionRegistry;
