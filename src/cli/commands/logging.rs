//! Log verbosity: `-v` repeated on the command line, or a count or level name
//! in `PASSGATE_LOG_LEVEL`.

use clap::{Arg, ArgAction, ArgMatches, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accept a count (0-5) or a level name, stored as the equivalent `-v` count.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|value: &str| -> Result<u8, String> {
        let lowered = value.to_ascii_lowercase();
        if let Some(index) = LEVEL_NAMES.iter().position(|name| *name == lowered) {
            return u8::try_from(index).map_err(|err| err.to_string());
        }
        value
            .parse::<u8>()
            .ok()
            .filter(|count| *count <= 5)
            .ok_or_else(|| {
                format!(
                    "invalid log level '{value}', expected 0-5 or one of: {}",
                    LEVEL_NAMES.join(", ")
                )
            })
    })
}

/// Tracing level for a verbosity count. `None` leaves the subscriber at ERROR.
#[must_use]
pub const fn level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn verbosity(matches: &ArgMatches) -> Option<Level> {
    level(matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase log output; repeat for more (-vvv = debug)")
            .env("PASSGATE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
