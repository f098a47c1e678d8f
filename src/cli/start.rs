use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;

/// Parse the command line, set up logging, and resolve the action to run.
///
/// # Errors
/// Fails on invalid arguments, a telemetry setup error, or inconsistent options.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();
    telemetry::init(logging::verbosity(&matches))?;
    dispatch::handler(&matches)
}
