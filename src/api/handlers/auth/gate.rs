//! Admin gate: passcode verification and session authorization.
//!
//! Flow Overview:
//! 1) `initialize` hashes the admin passcode once (bcrypt, cost 12) on a blocking worker.
//! 2) `attempt` verifies a submitted passcode against that hash and marks the session authorized.
//! 3) `read` hands out the protected markup to authorized sessions only.
//! 4) `terminate` destroys the session unconditionally.
//!
//! Until the hash exists every login fails with [`GateError::NotReady`].

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::{sync::OnceCell, task};
use tracing::{debug, error, warn};

use super::store::{SessionId, SessionRecord, SessionStore};

pub const HASH_COST: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Missing passcode")]
    MissingPasscode,
    #[error("Server not ready")]
    NotReady,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Not authorized")]
    NotAuthorized,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub struct AdminGate {
    reference_hash: OnceCell<String>,
    cost: u32,
    store: Arc<dyn SessionStore>,
    content: String,
}

impl AdminGate {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, content: String) -> Self {
        Self {
            reference_hash: OnceCell::new(),
            cost: HASH_COST,
            store,
            content,
        }
    }

    /// Override the bcrypt work factor. Only meant for tests; production keeps [`HASH_COST`].
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.reference_hash.initialized()
    }

    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Hash the admin passcode and make it the reference for every later login.
    ///
    /// The reference hash is write-once; repeated calls keep the first value.
    ///
    /// # Errors
    /// Returns [`GateError::Internal`] if hashing fails.
    pub async fn initialize(&self, secret: SecretString) -> Result<(), GateError> {
        let cost = self.cost;
        let hash = task::spawn_blocking(move || bcrypt::hash(secret.expose_secret(), cost))
            .await
            .map_err(|err| GateError::Internal(format!("hash worker failed: {err}")))?
            .map_err(|err| GateError::Internal(format!("failed to hash admin passcode: {err}")))?;

        if self.reference_hash.set(hash).is_err() {
            warn!("Admin passcode hash already initialized, keeping the existing one");
        }
        Ok(())
    }

    /// Verify `passcode` and authorize the session.
    ///
    /// Reuses `session` when it still refers to a live record, restarting its
    /// lifetime, otherwise creates a new one. Returns the token the client must hold.
    ///
    /// # Errors
    /// - [`GateError::MissingPasscode`] for an absent or empty passcode.
    /// - [`GateError::NotReady`] before [`AdminGate::initialize`] completed.
    /// - [`GateError::IncorrectPassword`] when the passcode does not match.
    /// - [`GateError::Internal`] if verification or session creation fails.
    pub async fn attempt(
        &self,
        passcode: Option<&str>,
        session: Option<&SessionId>,
    ) -> Result<SessionId, GateError> {
        let passcode = match passcode {
            Some(passcode) if !passcode.is_empty() => passcode.to_string(),
            _ => return Err(GateError::MissingPasscode),
        };

        let Some(reference_hash) = self.reference_hash.get() else {
            return Err(GateError::NotReady);
        };
        let reference_hash = reference_hash.clone();

        // bcrypt::verify compares in constant time; keep it off the request threads.
        let matched = task::spawn_blocking(move || bcrypt::verify(passcode, &reference_hash))
            .await
            .map_err(|err| GateError::Internal(format!("verify worker failed: {err}")))?
            .map_err(|err| GateError::Internal(format!("failed to verify passcode: {err}")))?;

        if !matched {
            debug!("Admin login rejected");
            return Err(GateError::IncorrectPassword);
        }

        // Reauthorizing restarts the record's lifetime to match the fresh cookie.
        if let Some(id) = session
            && self
                .store
                .mutate(id, &mut |record| *record = SessionRecord::authorized())
        {
            return Ok(id.clone());
        }

        self.store.create(SessionRecord::authorized()).map_err(|err| {
            error!("Failed to create session: {err}");
            GateError::Internal(err.to_string())
        })
    }

    /// Destroy the session, if any. Always succeeds.
    pub fn terminate(&self, session: Option<&SessionId>) {
        if let Some(id) = session
            && !self.store.destroy(id)
        {
            debug!("Logout for unknown or expired session");
        }
    }

    /// Return the protected markup for an authorized session.
    ///
    /// # Errors
    /// Returns [`GateError::NotAuthorized`] when the session is absent, expired, or not authorized.
    pub fn read(&self, session: Option<&SessionId>) -> Result<&str, GateError> {
        match session.and_then(|id| self.store.read(id)) {
            Some(record) if record.authorized => Ok(&self.content),
            _ => Err(GateError::NotAuthorized),
        }
    }
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("ready", &self.is_ready())
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}
