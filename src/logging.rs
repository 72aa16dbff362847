//! Logging setup
//!
//! Logs go to stderr so a report written to stdout stays clean. Without a
//! configured level nothing is installed and all events are dropped. A bad
//! level never stops a command: [`init_or_disable`] reports it and carries on
//! without logs.

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Install a global `tracing` subscriber filtered by `level` (an
/// `EnvFilter` directive such as `debug` or `expctl=trace`).
///
/// Returns whether a subscriber was installed.
///
/// # Errors
///
/// Returns [`Error::Config`] if the directive is malformed or a global
/// subscriber is already set.
pub fn init(level: Option<&str>) -> Result<bool> {
    let Some(level) = level else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("invalid log level {level:?}: {e}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {e}")))?;
    Ok(true)
}

/// Like [`init`], but a setup failure only prints a warning on stderr and
/// leaves logging disabled.
pub fn init_or_disable(level: Option<&str>) -> bool {
    init(level).unwrap_or_else(|e| {
        eprintln!("warning: {e}; logging disabled");
        false
    })
}
