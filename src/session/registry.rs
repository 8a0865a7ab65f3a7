//! Registry of live real-time sessions.
//!
//! Each entry holds the outbound channel of one session.  The set is the
//! only structure mutated across sessions, so every operation takes a single
//! short-lived lock.  The lock is never held across `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::ServerMessage;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session {0} is not registered")]
    UnknownSession(Uuid),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("transport for session {0} is closed")]
    Disconnected(Uuid),
}

struct Entry {
    outbound: mpsc::Sender<String>,
}

/// Cheap to clone; all clones share one session set.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `id` with the channel its frames are written to.
    pub fn register(&self, id: Uuid, outbound: mpsc::Sender<String>) {
        let count = {
            let mut sessions = self.lock();
            sessions.insert(id, Entry { outbound });
            sessions.len()
        };
        log::info!("registry: session {id} registered ({count} open)");
    }

    /// Remove `id`.  Returns `false` if it was not registered.
    pub fn deregister(&self, id: Uuid) -> bool {
        let (removed, count) = {
            let mut sessions = self.lock();
            let removed = sessions.remove(&id).is_some();
            (removed, sessions.len())
        };
        if removed {
            log::info!("registry: session {id} deregistered ({count} open)");
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.lock().contains_key(&id)
    }

    /// Serialize and send `message` to session `id`.
    ///
    /// A closed transport deregisters the session before the error is
    /// returned.
    pub async fn send(&self, id: Uuid, message: &ServerMessage) -> Result<(), RegistryError> {
        let payload = message.to_json()?;
        let outbound = self
            .lock()
            .get(&id)
            .map(|entry| entry.outbound.clone())
            .ok_or(RegistryError::UnknownSession(id))?;

        if outbound.send(payload).await.is_err() {
            log::warn!("registry: send to session {id} failed, deregistering");
            self.deregister(id);
            return Err(RegistryError::Disconnected(id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
