//! # Passgate (Password-Gated Content Server)
//!
//! `passgate` protects a server-rendered HTML fragment behind a single shared
//! admin passcode. Everything else under the public directory is served as
//! static files.
//!
//! ## Admin Gate
//!
//! The passcode is discovered once at startup (environment, referenced file, or
//! a well-known secret path) and immediately reduced to a bcrypt hash (cost 12).
//! The plaintext is never compared directly and never logged.
//!
//! - **Login:** `POST /login` verifies the passcode and marks the session authorized.
//! - **Logout:** `POST /logout` destroys the session and clears the cookie; always succeeds.
//! - **Content:** `GET /admin/content` returns the protected markup for authorized sessions only.
//!
//! ## Sessions
//!
//! Sessions live in memory, keyed by an HMAC-signed `HttpOnly` cookie, and expire
//! a fixed time after creation (one hour by default). Nothing survives a restart.

pub mod api;
pub mod cli;
pub mod secret;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
