//! Tracing subscriber setup

use crate::error::{ConfigError, Result};
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `ELEVEN_LOG=eleven_actions=debug`
pub const LOG_ENV: &str = "ELEVEN_LOG";
pub const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Filter read from `ELEVEN_LOG`, falling back to `info`
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

/// Install a stderr `fmt` subscriber.
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}
