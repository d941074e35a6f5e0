use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use querylog_storage::Storage;

use crate::batch::BatchIdentity;
use crate::{BatchHandle, BatchId, LogSession, SessionError};

/// Session shared between the registry and whoever is driving the batch.
pub type SharedSession = Arc<Mutex<LogSession>>;

#[derive(Debug)]
struct Entry {
    batch: Weak<BatchIdentity>,
    session: SharedSession,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.batch.strong_count() > 0
    }
}

/// Associates each live batch with exactly one [`LogSession`].
///
/// The registry holds only a weak reference to each batch. Entries whose
/// batch has been dropped are pruned on every lookup, so the map never grows
/// past the number of batches currently alive. Owners that know when a batch
/// is torn down can also call [`release`](Self::release) directly.
#[derive(Debug)]
pub struct SessionRegistry {
    storage: Storage,
    sessions: Mutex<HashMap<BatchId, Entry>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage, sessions: Mutex::new(HashMap::new()) }
    }

    #[must_use]
    pub const fn storage(&self) -> &Storage {
        &self.storage
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<BatchId, Entry>>, SessionError> {
        self.sessions.lock().map_err(|_| SessionError::LockPoisoned("session registry"))
    }

    /// Session for `batch`, created on first contact.
    ///
    /// Lookup and insertion happen under one lock, so concurrent callers
    /// with the same handle always receive the same session.
    pub fn session_for(&self, batch: &BatchHandle) -> Result<SharedSession, SessionError> {
        let mut sessions = self.lock_sessions()?;
        sessions.retain(|_, entry| entry.is_live());

        if let Some(entry) = sessions.get(&batch.id()) {
            return Ok(Arc::clone(&entry.session));
        }

        let session = Arc::new(Mutex::new(LogSession::new(self.storage.clone())));
        sessions.insert(
            batch.id(),
            Entry { batch: batch.downgrade(), session: Arc::clone(&session) },
        );
        tracing::trace!(batch = %batch.id(), live = sessions.len(), "log session created");
        Ok(session)
    }

    /// Forget the session for `batch`. Returns whether one was registered.
    pub fn release(&self, batch: &BatchHandle) -> Result<bool, SessionError> {
        let mut sessions = self.lock_sessions()?;
        Ok(sessions.remove(&batch.id()).is_some())
    }

    /// Drop entries whose batch no longer exists. Returns how many went.
    pub fn prune(&self) -> Result<usize, SessionError> {
        let mut sessions = self.lock_sessions()?;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.is_live());
        Ok(before - sessions.len())
    }

    /// Number of registered sessions, including any not yet pruned.
    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.lock_sessions()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.lock_sessions()?.is_empty())
    }
}
