//! Session records and point-in-time registry snapshots.

use serde::Serialize;

use super::ConnectionId;

/// The relay's record of one connected participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identity of the underlying connection.
    pub connection_id: ConnectionId,
    /// Display name, `None` until the participant joins.
    pub display_name: Option<String>,
}

/// One roster line: `(connection id, display name)`.
///
/// Serializes as a two-element JSON array, e.g. `["<uuid>", "Alice"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry(pub ConnectionId, pub String);

impl RosterEntry {
    /// Connection id of the participant.
    #[must_use]
    pub const fn connection_id(&self) -> ConnectionId {
        self.0
    }

    /// Display name of the participant.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.1
    }
}

/// Immutable copy of every registered session, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    sessions: Vec<Session>,
}

impl RegistrySnapshot {
    pub(crate) fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    /// All sessions, joined or not.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no session is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The joined subset, in the same order, as broadcast in roster updates.
    #[must_use]
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.sessions
            .iter()
            .filter_map(|s| {
                s.display_name
                    .as_ref()
                    .map(|name| RosterEntry(s.connection_id, name.clone()))
            })
            .collect()
    }
}
