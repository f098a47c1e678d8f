//! Auth state and configuration.

use secrecy::SecretString;
use std::{fmt, sync::Arc, time::Duration};

use super::{
    gate::AdminGate,
    store::{DEFAULT_SESSION_TTL, MemorySessionStore},
};

/// Markup returned by `GET /admin/content` unless a content file is configured.
pub const DEFAULT_CONTENT: &str = r#"
      <h2>Welcome 👋</h2>
      <p>This is the protected admin area.</p>
      <form id="logout-form"><button type="button" onclick="logout()">Log out</button></form>
      <script>
        async function logout(){
          await fetch('/logout', { method: 'POST' });
          location.reload();
        }
      </script>
    "#;

#[derive(Clone)]
pub struct AuthConfig {
    session_secret: SecretString,
    session_ttl: Duration,
    cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(session_secret: SecretString) -> Self {
        Self {
            session_secret,
            session_ttl: DEFAULT_SESSION_TTL,
            cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub(crate) fn session_secret(&self) -> &SecretString {
        &self.session_secret
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"***")
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    gate: AdminGate,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, gate: AdminGate) -> Self {
        Self { config, gate }
    }

    /// Build the state on an in-memory store that expires records after
    /// `config.session_ttl()`, the same lifetime the cookie advertises.
    #[must_use]
    pub fn in_memory(config: AuthConfig, content: String) -> Self {
        let store = Arc::new(MemorySessionStore::new(config.session_ttl()));
        Self::new(config, AdminGate::new(store, content))
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }
}
