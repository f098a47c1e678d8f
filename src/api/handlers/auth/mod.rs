//! Admin gate handlers and supporting modules.
//!
//! A single shared passcode guards `GET /admin/content`. Login verifies the
//! passcode against a bcrypt hash computed at startup and flags the session as
//! authorized; logout destroys the session. Session records live behind the
//! [`SessionStore`] capability so the backend can be swapped.
//!
//! ## Error Taxonomy
//!
//! - **Missing passcode:** `400`, session untouched.
//! - **Incorrect password:** `401`, session untouched, generic message.
//! - **Not authorized:** `403`, no valid authorized session.
//! - **Server not ready:** `500`, the reference hash is still being computed.

pub(crate) mod content;
mod gate;
pub(crate) mod login;
pub(crate) mod session;
mod state;
mod store;
pub(crate) mod types;

pub use gate::{AdminGate, GateError, HASH_COST};
pub use session::SESSION_COOKIE_NAME;
pub use state::{AuthConfig, AuthState, DEFAULT_CONTENT};
pub use store::{DEFAULT_SESSION_TTL, MemorySessionStore, SessionId, SessionRecord, SessionStore};
