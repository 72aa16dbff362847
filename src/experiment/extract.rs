//! Extraction - derived facts over an experiment
//!
//! Every query here is total: absent sections, unknown versions, and
//! out-of-range objective indices all yield [`UNAVAILABLE`] rather than an
//! error, so a report can be built from any well-typed experiment however
//! sparse its status is.

use std::fmt;

use super::resource::Experiment;
use super::spec::{MetricInfo, Objective};
use super::status::{Analysis, Satisfaction};

/// Rendered in place of any value that cannot be looked up.
pub const UNAVAILABLE: &str = "unavailable";

/// Stage reported once the controller has finished the experiment.
pub const COMPLETED_STAGE: &str = "Completed";

/// Condition type set once the controller has finished the experiment.
pub const COMPLETED_CONDITION: &str = "ExperimentCompleted";

impl Experiment {
    /// Check whether at least one iteration has completed.
    #[must_use]
    pub fn started(&self) -> bool {
        self.status().completed_iterations().is_some_and(|c| c > 0)
    }

    /// Check whether the experiment has finished.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.status().stage() == Some(COMPLETED_STAGE)
            || self
                .status()
                .conditions()
                .iter()
                .any(|c| c.kind() == COMPLETED_CONDITION && c.is_true())
    }

    /// Check whether the winner assessment reports a winner.
    #[must_use]
    pub fn winner_found(&self) -> bool {
        self.analysis()
            .and_then(Analysis::winner_assessment)
            .is_some_and(|w| w.data().winner_found())
    }

    /// Get the version names: baseline first, then candidates in declared
    /// order. Empty when the spec declares no version info.
    #[must_use]
    pub fn versions(&self) -> Vec<String> {
        self.spec().version_info().map_or_else(Vec::new, |info| {
            std::iter::once(info.baseline())
                .chain(info.candidates())
                .map(|v| v.name().to_string())
                .collect()
        })
    }

    /// Get the metric rows: `spec.metrics`, or `status.metrics` when the spec
    /// declares none.
    #[must_use]
    pub fn metrics(&self) -> &[MetricInfo] {
        let declared = self.spec().metrics();
        if declared.is_empty() {
            self.status().metrics()
        } else {
            declared
        }
    }

    /// Get the aggregated value of `metric` for `version`, rounded for display.
    #[must_use]
    pub fn metric_value(&self, metric: &str, version: &str) -> String {
        self.analysis()
            .and_then(Analysis::aggregated_metrics)
            .and_then(|am| am.metric(metric))
            .and_then(|m| m.for_version(version))
            .and_then(|v| v.value())
            .map_or_else(|| UNAVAILABLE.to_string(), |q| q.rounded())
    }

    /// Get the values of `metric`, one per version in [`Experiment::versions`] order.
    #[must_use]
    pub fn metric_values(&self, metric: &str) -> Vec<String> {
        self.versions()
            .iter()
            .map(|version| self.metric_value(metric, version))
            .collect()
    }

    /// Get whether `version` satisfies the objective at `objective_index`:
    /// `"true"`, `"false"`, or `"unavailable"`.
    #[must_use]
    pub fn satisfies_objective(&self, objective_index: usize, version: &str) -> String {
        self.analysis()
            .and_then(Analysis::version_assessments)
            .and_then(|va| va.for_version(version))
            .and_then(|flags| flags.get(objective_index))
            .and_then(|flag| Satisfaction::get(*flag))
            .map_or_else(|| UNAVAILABLE.to_string(), |flag| flag.to_string())
    }

    /// Get the satisfaction of one objective, one entry per version.
    #[must_use]
    pub fn satisfies_objectives(&self, objective_index: usize) -> Vec<String> {
        self.versions()
            .iter()
            .map(|version| self.satisfies_objective(objective_index, version))
            .collect()
    }

    fn analysis(&self) -> Option<&Analysis> {
        self.status().analysis()
    }
}

/// Renders as `<lower> <= <metric> <= <upper>`, omitting absent bounds.
impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lower) = self.lower_limit() {
            write!(f, "{} <= ", lower.rounded())?;
        }
        f.write_str(self.metric())?;
        if let Some(upper) = self.upper_limit() {
            write!(f, " <= {}", upper.rounded())?;
        }
        Ok(())
    }
}

impl MetricInfo {
    /// Get `<name> (<units>)`, or the bare name without units.
    #[must_use]
    pub fn name_and_units(&self) -> String {
        match self.units() {
            Some(units) => format!("{} ({units})", self.name()),
            None => self.name().to_string(),
        }
    }
}
