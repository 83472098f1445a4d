//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed to [`init`] (usually from [`crate::TaskerConfig`])
//! 2. the `TASKER_LOG` environment variable
//! 3. `info`

use crate::config::LOG_ENV;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level name is not recognised.
    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
    /// A global subscriber is already installed.
    #[error("logging already initialised: {0}")]
    AlreadyInitialised(String),
}

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::UnknownLevel`] for an unrecognised explicit level
/// and [`LoggingError::AlreadyInitialised`] when called more than once.
pub fn init(level: Option<&str>) -> Result<(), LoggingError> {
    let max_level = resolve_level(level, std::env::var(LOG_ENV).ok().as_deref())?;
    fmt()
        .with_max_level(max_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInitialised(err.to_string()))
}

/// Picks the level from the explicit value, then the environment value,
/// then `info`. An unparsable environment value falls back to `info`.
///
/// # Errors
///
/// Returns [`LoggingError::UnknownLevel`] when `explicit` is not a level
/// name.
pub fn resolve_level(explicit: Option<&str>, env: Option<&str>) -> Result<Level, LoggingError> {
    explicit.map_or_else(
        || Ok(env.and_then(parse_level).unwrap_or(Level::INFO)),
        |name| parse_level(name).ok_or_else(|| LoggingError::UnknownLevel(name.to_owned())),
    )
}

fn parse_level(value: &str) -> Option<Level> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
#[expect(
    clippy::panic_in_result_fn,
    reason = "Tests use assertions for verification while returning Result for error propagation"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::explicit_wins(Some("debug"), Some("error"), Level::DEBUG)]
    #[case::env_used_without_explicit(None, Some("trace"), Level::TRACE)]
    #[case::warning_alias(Some(" Warning "), None, Level::WARN)]
    #[case::default_info(None, None, Level::INFO)]
    #[case::bad_env_falls_back(None, Some("loud"), Level::INFO)]
    fn resolves_level_by_priority(
        #[case] explicit: Option<&str>,
        #[case] env: Option<&str>,
        #[case] expected: Level,
    ) -> eyre::Result<()> {
        let level = resolve_level(explicit, env)?;
        assert_eq!(level, expected);
        Ok(())
    }

    #[test]
    fn unknown_explicit_level_is_an_error() {
        let result = resolve_level(Some("loud"), Some("debug"));
        assert!(matches!(result, Err(LoggingError::UnknownLevel(name)) if name == "loud"));
    }
}
