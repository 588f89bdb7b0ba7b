//! Broadcast relay: connection lifecycle and event fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, RwLock, mpsc};

use crate::domain::{
    ClientEvent, ConnectionId, RegistrySnapshot, RosterEntry, ServerEvent, SessionRegistry,
};
use crate::error::{DeliveryFailureReason, RelayError};

/// Receiving half of a connection's outbound queue.
///
/// The transport drains it and writes each event to the socket.
pub type Outbound = mpsc::Receiver<Arc<ServerEvent>>;

/// Fan-out target set for [`BroadcastRelay::broadcast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastScope {
    /// Every live connection, joined or not.
    All,
    /// Every live connection except the given origin.
    AllExcept(ConnectionId),
}

impl BroadcastScope {
    /// Returns `true` if `target` should receive the event.
    #[must_use]
    pub fn includes(self, target: ConnectionId) -> bool {
        match self {
            Self::All => true,
            Self::AllExcept(origin) => origin != target,
        }
    }
}

/// Owns every live connection handle and the [`SessionRegistry`].
///
/// Connections move through `Connected -> Joined -> Closed`:
///
/// - [`accept`](Self::accept) registers an unnamed session and hands back the
///   connection's outbound queue.
/// - [`handle`](Self::handle) processes one inbound event. A join names the
///   session and broadcasts the roster to all; drawing events go to every
///   other connection.
/// - [`disconnect`](Self::disconnect) drops the outbound handle, removes the
///   session, and broadcasts the roster to the remaining connections.
///
/// Fan-out never waits on a peer: each target has a bounded queue and a
/// delivery that does not fit is dropped for that target alone. Events from
/// one sender reach every recipient in the order the sender's inbound loop
/// handed them over. Registry mutations that change the roster are
/// serialized with their broadcast, so all recipients see roster updates in
/// the same order and the last one they get is current.
#[derive(Debug)]
pub struct BroadcastRelay {
    registry: SessionRegistry,
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<Arc<ServerEvent>>>>,
    roster_gate: Mutex<()>,
    queue_capacity: usize,
    max_name_len: usize,
}

impl BroadcastRelay {
    /// Creates a relay with no connections.
    ///
    /// `queue_capacity` bounds each connection's outbound queue (at least 1);
    /// display names longer than `max_name_len` characters are truncated.
    #[must_use]
    pub fn new(queue_capacity: usize, max_name_len: usize) -> Self {
        Self {
            registry: SessionRegistry::new(),
            connections: RwLock::new(HashMap::new()),
            roster_gate: Mutex::new(()),
            queue_capacity: queue_capacity.max(1),
            max_name_len,
        }
    }

    /// Accepts a new connection under a fresh identity.
    ///
    /// # Errors
    ///
    /// Propagates [`RelayError::DuplicateRegistration`] from
    /// [`accept`](Self::accept); unreachable with random identities.
    pub async fn connect(&self) -> Result<(ConnectionId, Outbound), RelayError> {
        let connection_id = ConnectionId::new();
        let outbound = self.accept(connection_id).await?;
        Ok((connection_id, outbound))
    }

    /// Accepts a new connection under the given identity.
    ///
    /// The connection is registered unnamed and becomes a broadcast target
    /// immediately, but does not appear in any roster until it joins.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DuplicateRegistration`] if the identity is
    /// already live. The connection must then be refused.
    pub async fn accept(&self, connection_id: ConnectionId) -> Result<Outbound, RelayError> {
        let _gate = self.roster_gate.lock().await;
        self.registry.register(connection_id).await?;

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.connections.write().await.insert(connection_id, tx);

        tracing::info!(%connection_id, "connection accepted");
        Ok(rx)
    }

    /// Processes one inbound event from `origin`.
    ///
    /// Callers must hand over a connection's events one at a time, in
    /// arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UnknownSession`] if `origin` is closed or was
    /// never accepted. The event is dropped; callers log and continue.
    pub async fn handle(&self, origin: ConnectionId, event: ClientEvent) -> Result<(), RelayError> {
        if !self.connections.read().await.contains_key(&origin) {
            return Err(RelayError::UnknownSession(origin));
        }

        match event {
            ClientEvent::Join { name } => self.join(origin, &name).await,
            ClientEvent::Drawing(drawing) => {
                let event_name = drawing.event_name();
                let delivered = self
                    .broadcast(BroadcastScope::AllExcept(origin), ServerEvent::Drawing(drawing))
                    .await;
                tracing::trace!(%origin, event = event_name, delivered, "drawing relayed");
                Ok(())
            }
        }
    }

    /// Closes a connection: it stops being a broadcast target, its session
    /// is removed, and the remaining connections receive the new roster.
    ///
    /// Idempotent; returns `false` if the connection was already closed.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        let _gate = self.roster_gate.lock().await;
        let had_handle = self
            .connections
            .write()
            .await
            .remove(&connection_id)
            .is_some();
        let had_session = self.registry.remove(connection_id).await;
        if !had_handle && !had_session {
            return false;
        }

        let participants = self.broadcast_roster().await;
        tracing::info!(%connection_id, participants, "connection closed");
        true
    }

    /// Fans `event` out to every live connection selected by `scope`.
    ///
    /// Fire-and-forget: a target whose queue is full or closed is skipped
    /// and logged. Returns the number of targets the event was queued for.
    pub async fn broadcast(&self, scope: BroadcastScope, event: ServerEvent) -> usize {
        let event = Arc::new(event);
        let connections = self.connections.read().await;
        let mut delivered = 0usize;

        for (target, tx) in connections.iter() {
            if !scope.includes(*target) {
                continue;
            }
            match tx.try_send(Arc::clone(&event)) {
                Ok(()) => delivered = delivered.saturating_add(1),
                Err(TrySendError::Full(_)) => {
                    let err = RelayError::DeliveryFailure {
                        target: *target,
                        reason: DeliveryFailureReason::QueueFull,
                    };
                    tracing::warn!(kind = err.kind(), event = event.event_name(), "{err}");
                }
                Err(TrySendError::Closed(_)) => {
                    let err = RelayError::DeliveryFailure {
                        target: *target,
                        reason: DeliveryFailureReason::Closed,
                    };
                    tracing::debug!(kind = err.kind(), event = event.event_name(), "{err}");
                }
            }
        }

        delivered
    }

    /// Returns a point-in-time copy of the registry.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot().await
    }

    /// Returns the current roster of joined participants.
    pub async fn roster(&self) -> Vec<RosterEntry> {
        self.registry.snapshot().await.roster()
    }

    /// Returns the number of live connections, joined or not.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    async fn join(&self, connection_id: ConnectionId, requested: &str) -> Result<(), RelayError> {
        let Some(name) = normalize_name(requested, self.max_name_len) else {
            tracing::debug!(%connection_id, "ignoring join with empty name");
            return Ok(());
        };

        let _gate = self.roster_gate.lock().await;
        self.registry.set_display_name(connection_id, &name).await?;
        let participants = self.broadcast_roster().await;
        tracing::info!(%connection_id, name = %name, participants, "participant joined");
        Ok(())
    }

    /// Broadcasts the current roster to all. Caller holds `roster_gate`.
    ///
    /// Returns the roster size.
    async fn broadcast_roster(&self) -> usize {
        let roster = self.registry.snapshot().await.roster();
        let participants = roster.len();
        self.broadcast(BroadcastScope::All, ServerEvent::RosterUpdate(roster)).await;
        participants
    }
}

/// Trims `requested` and caps it at `max_len` characters. `None` if empty.
fn normalize_name(requested: &str, max_len: usize) -> Option<String> {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_len.max(1)).collect())
}
