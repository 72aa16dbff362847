//! Experiment Spec - the declared shape of an experiment

use std::fmt;

use serde::{Deserialize, Serialize};

use super::serde_util::null_as_default;
use crate::quantity::Quantity;

/// Comparison strategy governing which versions participate and how the
/// winner is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestingPattern {
    /// Candidate is compared against baseline.
    Canary,
    /// A single version is validated against the objectives.
    Conformance,
    /// Two versions compared on a reward.
    AB,
    /// Several versions compared on a reward.
    ABN,
    /// Any pattern this crate has no dedicated wording for.
    Other(String),
}

impl TestingPattern {
    /// Get the pattern name as written in the resource.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canary => "Canary",
            Self::Conformance => "Conformance",
            Self::AB => "A/B",
            Self::ABN => "A/B/n",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for TestingPattern {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Canary" => Self::Canary,
            "Conformance" => Self::Conformance,
            "A/B" => Self::AB,
            "A/B/n" => Self::ABN,
            _ => Self::Other(value),
        }
    }
}

impl From<TestingPattern> for String {
    fn from(value: TestingPattern) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TestingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested strategy block used by the published schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Strategy {
    testing_pattern: Option<TestingPattern>,
    deployment_pattern: Option<String>,
}

/// Reference to a version under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionDetail {
    name: String,
}

impl VersionDetail {
    /// Get the version name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Baseline plus candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    #[serde(deserialize_with = "null_as_default")]
    baseline: VersionDetail,
    #[serde(deserialize_with = "null_as_default")]
    candidates: Vec<VersionDetail>,
}

impl VersionInfo {
    /// Get the baseline version.
    #[must_use]
    pub const fn baseline(&self) -> &VersionDetail {
        &self.baseline
    }

    /// Get the candidate versions in declared order.
    #[must_use]
    pub fn candidates(&self) -> &[VersionDetail] {
        &self.candidates
    }
}

/// A bound on a named metric that a version must satisfy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Objective {
    metric: String,
    lower_limit: Option<Quantity>,
    upper_limit: Option<Quantity>,
}

impl Objective {
    /// Create an objective on `metric` with optional bounds.
    #[must_use]
    pub fn new(
        metric: impl Into<String>,
        lower_limit: Option<Quantity>,
        upper_limit: Option<Quantity>,
    ) -> Self {
        Self {
            metric: metric.into(),
            lower_limit,
            upper_limit,
        }
    }

    /// Get the metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Get the lower limit, if any.
    #[must_use]
    pub const fn lower_limit(&self) -> Option<Quantity> {
        self.lower_limit
    }

    /// Get the upper limit, if any.
    #[must_use]
    pub const fn upper_limit(&self) -> Option<Quantity> {
        self.upper_limit
    }
}

/// Experiment criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    #[serde(deserialize_with = "null_as_default")]
    objectives: Vec<Objective>,
}

impl Criteria {
    /// Get the objectives in declared order.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct MetricObjectSpec {
    units: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct MetricObject {
    #[serde(deserialize_with = "null_as_default")]
    spec: MetricObjectSpec,
}

/// A metric declared by the experiment.
///
/// Units may sit directly on the entry or inside the embedded metric object
/// (`metricObj.spec.units`); the direct form wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricInfo {
    name: String,
    units: Option<String>,
    metric_obj: Option<MetricObject>,
}

impl MetricInfo {
    /// Create a metric entry.
    #[must_use]
    pub fn new(name: impl Into<String>, units: Option<String>) -> Self {
        Self {
            name: name.into(),
            units,
            metric_obj: None,
        }
    }

    /// Get the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the metric units, if specified.
    #[must_use]
    pub fn units(&self) -> Option<&str> {
        self.units
            .as_deref()
            .or_else(|| self.metric_obj.as_ref()?.spec.units.as_deref())
    }
}

/// Declared part of an experiment resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperimentSpec {
    target: String,
    testing_pattern: Option<TestingPattern>,
    deployment_pattern: Option<String>,
    strategy: Option<Strategy>,
    version_info: Option<VersionInfo>,
    criteria: Option<Criteria>,
    #[serde(deserialize_with = "null_as_default")]
    metrics: Vec<MetricInfo>,
}

impl ExperimentSpec {
    /// Get the workload under test.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get the testing pattern, preferring `strategy.testingPattern`.
    #[must_use]
    pub fn testing_pattern(&self) -> Option<&TestingPattern> {
        self.strategy
            .as_ref()
            .and_then(|s| s.testing_pattern.as_ref())
            .or(self.testing_pattern.as_ref())
    }

    /// Get the deployment pattern, preferring `strategy.deploymentPattern`.
    #[must_use]
    pub fn deployment_pattern(&self) -> Option<&str> {
        self.strategy
            .as_ref()
            .and_then(|s| s.deployment_pattern.as_deref())
            .or(self.deployment_pattern.as_deref())
    }

    /// Get the version info, if declared.
    #[must_use]
    pub const fn version_info(&self) -> Option<&VersionInfo> {
        self.version_info.as_ref()
    }

    /// Get the objectives in declared order (empty without criteria).
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        self.criteria.as_ref().map_or(&[], Criteria::objectives)
    }

    /// Get the metrics declared in the spec.
    #[must_use]
    pub fn metrics(&self) -> &[MetricInfo] {
        &self.metrics
    }
}
