//! Session cookie options.

use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_SESSION_TTL: &str = "session-ttl";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Secret used to sign session cookies (default: random per process)")
                .env("SESSION_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long(ARG_SESSION_TTL)
                .help("Session lifetime in seconds")
                .env("PASSGATE_SESSION_TTL")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("PASSGATE_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug)]
pub struct Options {
    pub secret: Option<SecretString>,
    pub ttl_seconds: u64,
    pub cookie_secure: bool,
}

impl Options {
    /// Collect session options from validated matches.
    ///
    /// # Errors
    /// Returns an error if the TTL is zero.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let ttl_seconds = matches
            .get_one::<u64>(ARG_SESSION_TTL)
            .copied()
            .unwrap_or(3600);
        if ttl_seconds == 0 {
            bail!("--{ARG_SESSION_TTL} must be greater than zero");
        }

        Ok(Self {
            secret: matches
                .get_one::<String>(ARG_SESSION_SECRET)
                .filter(|secret| !secret.is_empty())
                .map(|secret| SecretString::from(secret.as_str())),
            ttl_seconds,
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}
