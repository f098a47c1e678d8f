//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the server action with its full configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{self, gate, session};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(3000);
    let public_dir = matches
        .get_one::<PathBuf>(commands::ARG_PUBLIC_DIR)
        .cloned()
        .context("missing required argument: --public-dir")?;

    let gate_opts = gate::Options::parse(matches);
    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        public_dir,
        admin_pass: gate_opts.admin_pass,
        admin_pass_file: gate_opts.admin_pass_file,
        content_file: gate_opts.content_file,
        session_secret: session_opts.secret,
        session_ttl_seconds: session_opts.ttl_seconds,
        cookie_secure: session_opts.cookie_secure,
    }))
}
