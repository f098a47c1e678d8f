//! Session storage.
//!
//! The gate only talks to [`SessionStore`], so the in-memory map can be
//! swapped for an external backend without touching login/logout logic.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Opaque session token held by the client (inside the signed cookie).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new random session token.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate session token")?;
        Ok(Self(Base64UrlUnpadded::encode_string(&bytes)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(***)")
    }
}

#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub authorized: bool,
    created_at: Instant,
}

impl SessionRecord {
    #[must_use]
    pub fn new() -> Self {
        Self {
            authorized: false,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn authorized() -> Self {
        Self {
            authorized: true,
            ..Self::new()
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability interface over server-side session state.
pub trait SessionStore: Send + Sync {
    /// Store a new record and return the token that addresses it.
    ///
    /// # Errors
    /// Returns an error if a token cannot be generated or the backend rejects the write.
    fn create(&self, record: SessionRecord) -> Result<SessionId>;

    /// Fetch a live record. Expired records read as `None`.
    fn read(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Apply `update` to a live record. Returns `false` when there is nothing to update.
    fn mutate(&self, id: &SessionId, update: &mut dyn FnMut(&mut SessionRecord)) -> bool;

    /// Remove a record. Returns `true` if one existed.
    fn destroy(&self, id: &SessionId) -> bool;

    /// Drop every expired record and return how many were removed.
    fn expire(&self) -> usize;
}

#[derive(Debug)]
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, record: SessionRecord) -> Result<SessionId> {
        let id = SessionId::generate()?;
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), record);
        Ok(id)
    }

    fn read(&self, id: &SessionId) -> Option<SessionRecord> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(id) {
            Some(record) if record.is_expired(self.ttl) => {
                sessions.remove(id);
                None
            }
            Some(record) => Some(record.clone()),
            None => None,
        }
    }

    fn mutate(&self, id: &SessionId, update: &mut dyn FnMut(&mut SessionRecord)) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(record) = sessions.get_mut(id) else {
            return false;
        };
        if record.is_expired(self.ttl) {
            sessions.remove(id);
            return false;
        }
        update(record);
        true
    }

    fn destroy(&self, id: &SessionId) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    fn expire(&self) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(self.ttl));
        before - sessions.len()
    }
}
