//! Logging via tracing-subscriber.
//!
//! Installed once in `main`, after settings are resolved, so the configured
//! `LOG_LEVEL` is known. Settings resolution rejects a `LOG_LEVEL` that
//! [`parse_level`] does not accept. Everything goes to stderr; stdout carries the
//! settings summary.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber.
///
/// Normally `RUST_LOG` wins and `level` is the fallback. With `force_level`
/// the order flips: `level` wins and `RUST_LOG` is only consulted when
/// `level` is not a level name.
pub fn init(level: &str, force_level: bool) -> Result<(), AppError> {
    let from_level = || parse_level(level).map(|l| EnvFilter::new(l.to_string()));
    let filter = if force_level {
        from_level().or_else(|level_err| {
            EnvFilter::try_from_default_env().map_err(|env_err| {
                AppError::Logger(format!("{level_err}; RUST_LOG unusable: {env_err}"))
            })
        })?
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => from_level()?,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Validate a plain level name (`error` … `trace`, or `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.trim().is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
