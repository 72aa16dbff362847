//! Assertable experiment conditions
//!
//! Useful in CI/CD pipelines before promoting or rolling back a version:
//!
//! ```rust
//! use expctl::conditions::{assert_conditions, Condition};
//! use expctl::experiment::Experiment;
//!
//! let experiment = Experiment::from_yaml("status:\n  stage: Completed\n")?;
//! assert_conditions(&experiment, &[Condition::Completed])?;
//! assert!(assert_conditions(&experiment, &[Condition::WinnerFound]).is_err());
//! # Ok::<(), expctl::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::experiment::Experiment;
use crate::{Error, Result};

/// A fact about an experiment that can be asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// The experiment has completed.
    Completed,
    /// The experiment found a winning version.
    WinnerFound,
}

impl Condition {
    /// Get the condition name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::WinnerFound => "winnerFound",
        }
    }

    /// Check whether the condition holds for `experiment`.
    #[must_use]
    pub fn holds(self, experiment: &Experiment) -> bool {
        match self {
            Self::Completed => experiment.completed(),
            Self::WinnerFound => experiment.winner_found(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(Self::Completed),
            "winnerFound" => Ok(Self::WinnerFound),
            other => Err(Error::InvalidArgument(format!(
                "invalid condition {other:?} (expected completed | winnerFound)"
            ))),
        }
    }
}

/// Check that every condition holds.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `conditions` is empty, or
/// [`Error::AssertionFailed`] listing every condition that does not hold.
pub fn assert_conditions(experiment: &Experiment, conditions: &[Condition]) -> Result<()> {
    if conditions.is_empty() {
        return Err(Error::InvalidArgument(
            "one or more conditions must be specified".to_string(),
        ));
    }
    let failed: Vec<&str> = conditions
        .iter()
        .filter(|c| !c.holds(experiment))
        .map(|c| c.as_str())
        .collect();
    debug!(
        name = experiment.name(),
        checked = conditions.len(),
        failed = failed.len(),
        "asserted conditions"
    );
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::AssertionFailed(format!(
            "experiment {}/{} does not satisfy: {}",
            experiment.namespace(),
            experiment.name(),
            failed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conditions() {
        assert_eq!("completed".parse::<Condition>().ok(), Some(Condition::Completed));
        assert_eq!("winnerFound".parse::<Condition>().ok(), Some(Condition::WinnerFound));
        assert!(matches!(
            "done".parse::<Condition>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_completed_via_condition() {
        let experiment = Experiment::from_yaml(
            "status:\n  conditions:\n  - type: ExperimentCompleted\n    status: \"True\"\n",
        )
        .expect("valid");
        assert!(Condition::Completed.holds(&experiment));
    }

    #[test]
    fn test_all_failures_reported() {
        let experiment = Experiment::default();
        let err = assert_conditions(&experiment, &[Condition::Completed, Condition::WinnerFound])
            .expect_err("nothing holds");
        let message = err.to_string();
        assert!(message.contains("completed"));
        assert!(message.contains("winnerFound"));
    }

    #[test]
    fn test_empty_conditions_rejected() {
        assert!(matches!(
            assert_conditions(&Experiment::default(), &[]),
            Err(Error::InvalidArgument(_))
        ));
    }
}
