//! Admin passcode sourcing and protected content options.

use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const ARG_ADMIN_PASS: &str = "admin-pass";
pub const ARG_ADMIN_PASS_FILE: &str = "admin-pass-file";
pub const ARG_CONTENT_FILE: &str = "content-file";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ADMIN_PASS)
                .long(ARG_ADMIN_PASS)
                .help("Admin passcode")
                .env("ADMIN_PASS")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_ADMIN_PASS_FILE)
                .long(ARG_ADMIN_PASS_FILE)
                .help("File containing the admin passcode")
                .env("ADMIN_PASS_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_CONTENT_FILE)
                .long(ARG_CONTENT_FILE)
                .help("HTML file returned by /admin/content (default: built-in markup)")
                .env("PASSGATE_CONTENT_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub admin_pass: Option<SecretString>,
    pub admin_pass_file: Option<PathBuf>,
    pub content_file: Option<PathBuf>,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            admin_pass: matches
                .get_one::<String>(ARG_ADMIN_PASS)
                .map(|pass| SecretString::from(pass.as_str())),
            admin_pass_file: matches.get_one::<PathBuf>(ARG_ADMIN_PASS_FILE).cloned(),
            content_file: matches.get_one::<PathBuf>(ARG_CONTENT_FILE).cloned(),
        }
    }
}
