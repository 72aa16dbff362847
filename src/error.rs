//! Error types for expctl
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// expctl error types
#[derive(Error, Debug)]
pub enum Error {
    /// Input source missing, unreadable, or empty
    #[error("Error reading experiment input: {0}")]
    InputUnavailable(String),

    /// Input is not structured data, or does not fit the experiment schema
    #[error("Deserialization error: {0}\nThis could be due to invalid experiment YAML input")]
    Deserialization(String),

    /// Malformed quantity string (e.g. `12xz`)
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// No experiment matched the selector
    #[error("Experiment not found: {0}")]
    ExperimentNotFound(String),

    /// Several experiments present but no selector given
    #[error("Input contains {0} experiments\nSelect one with --experiment or --latest")]
    AmbiguousInput(usize),

    /// Invalid command-line or API argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// One or more asserted conditions do not hold
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    /// Configuration file could not be used
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report formatting error
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}
