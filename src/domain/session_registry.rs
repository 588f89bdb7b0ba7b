//! Concurrent session storage.
//!
//! [`SessionRegistry`] is the single source of truth for who is connected.
//! It holds lightweight `(connection id, display name)` records only, never
//! connection handles, and performs no I/O.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::ConnectionId;
use super::session::{RegistrySnapshot, Session};
use crate::error::RelayError;

#[derive(Debug)]
struct Entry {
    display_name: Option<String>,
    /// Registration sequence number; defines roster order.
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    sessions: HashMap<ConnectionId, Entry>,
    next_seq: u64,
}

/// Registry of connected sessions.
///
/// # Concurrency
///
/// All state sits behind one [`tokio::sync::RwLock`]. Every operation takes
/// the lock once, so a [`snapshot`](Self::snapshot) racing a
/// [`remove`](Self::remove) either fully includes or fully excludes the
/// removed session. The tokio lock is fair: queued writers are not starved
/// by a stream of readers and vice versa.
///
/// # Ordering
///
/// Snapshots list sessions in registration order. Renaming keeps a
/// session's position; an identity registered again after removal goes to
/// the end.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<Inner>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unnamed session for a newly accepted connection.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::DuplicateRegistration`] if the identity is
    /// already registered. This is a programming error, not a runtime
    /// condition clients can trigger.
    pub async fn register(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        let mut inner = self.inner.write().await;
        if inner.sessions.contains_key(&connection_id) {
            return Err(RelayError::DuplicateRegistration(connection_id));
        }
        let seq = inner.next_seq;
        inner.next_seq = inner.next_seq.wrapping_add(1);
        inner.sessions.insert(
            connection_id,
            Entry {
                display_name: None,
                seq,
            },
        );
        Ok(())
    }

    /// Assigns or overwrites the display name of a registered session.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::UnknownSession`] if the identity is not
    /// registered, e.g. a join that raced the connection's teardown.
    pub async fn set_display_name(
        &self,
        connection_id: ConnectionId,
        name: impl Into<String>,
    ) -> Result<(), RelayError> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .sessions
            .get_mut(&connection_id)
            .ok_or(RelayError::UnknownSession(connection_id))?;
        entry.display_name = Some(name.into());
        Ok(())
    }

    /// Deletes a session. Idempotent.
    ///
    /// Returns `true` if a session was actually removed.
    pub async fn remove(&self, connection_id: ConnectionId) -> bool {
        self.inner
            .write()
            .await
            .sessions
            .remove(&connection_id)
            .is_some()
    }

    /// Returns a point-in-time copy of every session in registration order.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let inner = self.inner.read().await;
        let mut entries: Vec<(&ConnectionId, &Entry)> = inner.sessions.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        RegistrySnapshot::new(
            entries
                .into_iter()
                .map(|(id, entry)| Session {
                    connection_id: *id,
                    display_name: entry.display_name.clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::RosterEntry;

    #[tokio::test]
    async fn register_creates_unnamed_session() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(id).await);

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.roster().is_empty());
        assert_eq!(snapshot.sessions().first().map(|s| s.connection_id), Some(id));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(id).await);
        assert_eq!(
            registry.register(id).await,
            Err(RelayError::DuplicateRegistration(id))
        );
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn set_display_name_on_unknown_session_fails() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        assert_eq!(
            registry.set_display_name(id, "Ghost").await,
            Err(RelayError::UnknownSession(id))
        );
        assert!(registry.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn set_display_name_overwrites() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(id).await);
        tokio_test::assert_ok!(registry.set_display_name(id, "Alice").await);
        tokio_test::assert_ok!(registry.set_display_name(id, "Alicia").await);

        assert_eq!(
            registry.snapshot().await.roster(),
            vec![RosterEntry(id, "Alicia".to_string())]
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(id).await);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(!registry.remove(ConnectionId::new()).await);
        assert!(registry.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn removed_identity_can_register_again() {
        let registry = SessionRegistry::new();
        let id = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(id).await);
        registry.remove(id).await;
        tokio_test::assert_ok!(registry.register(id).await);
        assert_eq!(registry.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_follows_registration_order() {
        let registry = SessionRegistry::new();
        let ids: Vec<ConnectionId> = (0..8).map(|_| ConnectionId::new()).collect();
        for id in &ids {
            tokio_test::assert_ok!(registry.register(*id).await);
        }
        // Naming in reverse must not change the order.
        for (n, id) in ids.iter().enumerate().rev() {
            tokio_test::assert_ok!(registry.set_display_name(*id, format!("user-{n}")).await);
        }

        let roster = registry.snapshot().await.roster();
        let order: Vec<ConnectionId> = roster.iter().map(RosterEntry::connection_id).collect();
        assert_eq!(order, ids);
    }

    #[tokio::test]
    async fn reregistered_identity_moves_to_the_end() {
        let registry = SessionRegistry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        tokio_test::assert_ok!(registry.register(a).await);
        tokio_test::assert_ok!(registry.register(b).await);
        registry.remove(a).await;
        tokio_test::assert_ok!(registry.register(a).await);

        let order: Vec<ConnectionId> = registry
            .snapshot()
            .await
            .sessions()
            .iter()
            .map(|s| s.connection_id)
            .collect();
        assert_eq!(order, vec![b, a]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_snapshots_never_see_partial_state() {
        let registry = Arc::new(SessionRegistry::new());
        let ids: Vec<ConnectionId> = (0..64).map(|_| ConnectionId::new()).collect();
        for id in &ids {
            tokio_test::assert_ok!(registry.register(*id).await);
            tokio_test::assert_ok!(registry.set_display_name(*id, "x").await);
        }

        let remover = {
            let registry = Arc::clone(&registry);
            let ids = ids.clone();
            tokio::spawn(async move {
                for id in ids {
                    registry.remove(id).await;
                }
            })
        };

        let mut last = ids.len();
        while last > 0 {
            let snapshot = registry.snapshot().await;
            // Every listed session is complete, and removals only shrink it.
            assert_eq!(snapshot.roster().len(), snapshot.len());
            assert!(snapshot.len() <= last);
            last = snapshot.len();
            tokio::task::yield_now().await;
        }

        let Ok(()) = remover.await else {
            panic!("remover task failed");
        };
        assert!(registry.snapshot().await.is_empty());
    }
}
