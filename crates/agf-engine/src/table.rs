use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use agf_core::Adventure;

use crate::error::{EngineError, EngineResult};
use crate::session::Session;

/// Live sessions keyed by a caller-supplied identifier (e.g. a chat id).
///
/// At most one session runs per key. The map lock is held only to look up or
/// modify entries; each session sits behind its own mutex, so operations on
/// distinct keys run fully in parallel while same-key operations serialize.
#[derive(Debug, Default)]
pub struct SessionTable {
    inner: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session under `key` playing `adventure`.
    ///
    /// Fails with [`EngineError::AlreadyRunning`] if the key already holds a
    /// live session; the existing session is unaffected.
    pub fn start(
        &self,
        key: &str,
        adventure: Arc<Adventure>,
    ) -> EngineResult<Arc<Mutex<Session>>> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(key) {
            return Err(EngineError::AlreadyRunning(key.to_string()));
        }
        let session = Arc::new(Mutex::new(Session::new(key, adventure)?));
        map.insert(key.to_string(), Arc::clone(&session));
        tracing::debug!(key = %key, "session started");
        Ok(session)
    }

    /// Look up the session under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<Mutex<Session>>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Remove the session under `key` unconditionally. Returns whether one
    /// was present. Used both on natural termination and on explicit quit.
    pub fn end(&self, key: &str) -> bool {
        let removed = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();
        if removed {
            tracing::debug!(key = %key, "session ended");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
