//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::relay::BroadcastRelay;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The relay owning every live connection and the session registry.
    pub relay: Arc<BroadcastRelay>,
}

impl AppState {
    /// Wraps a relay for sharing across handlers.
    #[must_use]
    pub fn new(relay: BroadcastRelay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
