//! Experiment Status - observed progress and analysis written by the controller

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::serde_util::null_as_default;
use super::spec::MetricInfo;
use crate::quantity::Quantity;

/// Whether a version satisfies one objective.
///
/// Anything other than a boolean (null, a string such as `"unavailable"`)
/// deserializes to the unknown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Satisfaction(Option<bool>);

impl Satisfaction {
    /// Get the flag, if it is known.
    #[must_use]
    pub const fn get(self) -> Option<bool> {
        self.0
    }
}

impl From<bool> for Satisfaction {
    fn from(value: bool) -> Self {
        Self(Some(value))
    }
}

impl Serialize for Satisfaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Satisfaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Other(IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Self(Some(flag)),
            Raw::Other(_) => Self(None),
        })
    }
}

/// Provenance shared by every analysis section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMeta {
    provenance: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    message: Option<String>,
}

impl AnalysisMeta {
    /// Get the analytics service that produced the section.
    #[must_use]
    pub fn provenance(&self) -> Option<&str> {
        self.provenance.as_deref()
    }

    /// Get when the section was produced.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Get the human-readable note attached to the section.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Winner determination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WinnerAssessmentData {
    winner_found: bool,
    winner: Option<String>,
}

impl WinnerAssessmentData {
    /// Check whether a winner was found.
    #[must_use]
    pub const fn winner_found(&self) -> bool {
        self.winner_found
    }

    /// Get the winning version name, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }
}

/// `status.analysis.winnerAssessment`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinnerAssessment {
    #[serde(flatten)]
    meta: AnalysisMeta,
    #[serde(deserialize_with = "null_as_default")]
    data: WinnerAssessmentData,
}

impl WinnerAssessment {
    /// Get the analysis provenance.
    #[must_use]
    pub const fn meta(&self) -> &AnalysisMeta {
        &self.meta
    }

    /// Get the winner determination.
    #[must_use]
    pub const fn data(&self) -> &WinnerAssessmentData {
        &self.data
    }
}

/// `status.analysis.versionAssessments`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionAssessments {
    #[serde(flatten)]
    meta: AnalysisMeta,
    #[serde(deserialize_with = "null_as_default")]
    data: HashMap<String, Vec<Satisfaction>>,
}

impl VersionAssessments {
    /// Get the analysis provenance.
    #[must_use]
    pub const fn meta(&self) -> &AnalysisMeta {
        &self.meta
    }

    /// Get the objective flags of a version, index-aligned with the objectives.
    #[must_use]
    pub fn for_version(&self, version: &str) -> Option<&[Satisfaction]> {
        self.data.get(version).map(Vec::as_slice)
    }
}

/// Aggregated value of one metric for one version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregatedMetricValue {
    value: Option<Quantity>,
}

impl AggregatedMetricValue {
    /// Get the most recent aggregated value.
    #[must_use]
    pub const fn value(&self) -> Option<Quantity> {
        self.value
    }
}

/// Per-version values of one metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatedMetric {
    #[serde(deserialize_with = "null_as_default")]
    data: HashMap<String, AggregatedMetricValue>,
}

impl AggregatedMetric {
    /// Get the value recorded for a version.
    #[must_use]
    pub fn for_version(&self, version: &str) -> Option<&AggregatedMetricValue> {
        self.data.get(version)
    }
}

/// `status.analysis.aggregatedMetrics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatedMetrics {
    #[serde(flatten)]
    meta: AnalysisMeta,
    #[serde(deserialize_with = "null_as_default")]
    data: HashMap<String, AggregatedMetric>,
}

impl AggregatedMetrics {
    /// Get the analysis provenance.
    #[must_use]
    pub const fn meta(&self) -> &AnalysisMeta {
        &self.meta
    }

    /// Get the per-version values of a metric.
    #[must_use]
    pub fn metric(&self, metric: &str) -> Option<&AggregatedMetric> {
        self.data.get(metric)
    }
}

/// `status.analysis`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analysis {
    winner_assessment: Option<WinnerAssessment>,
    version_assessments: Option<VersionAssessments>,
    aggregated_metrics: Option<AggregatedMetrics>,
}

impl Analysis {
    /// Get the winner assessment, if present.
    #[must_use]
    pub const fn winner_assessment(&self) -> Option<&WinnerAssessment> {
        self.winner_assessment.as_ref()
    }

    /// Get the version assessments, if present.
    #[must_use]
    pub const fn version_assessments(&self) -> Option<&VersionAssessments> {
        self.version_assessments.as_ref()
    }

    /// Get the aggregated metrics, if present.
    #[must_use]
    pub const fn aggregated_metrics(&self) -> Option<&AggregatedMetrics> {
        self.aggregated_metrics.as_ref()
    }
}

/// A status condition such as `ExperimentCompleted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperimentCondition {
    #[serde(rename = "type")]
    kind: String,
    status: String,
}

impl ExperimentCondition {
    /// Get the condition type.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Check whether the condition status is `True`.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.status.eq_ignore_ascii_case("true")
    }
}

/// Observed part of an experiment resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperimentStatus {
    completed_iterations: Option<u32>,
    stage: Option<String>,
    message: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    conditions: Vec<ExperimentCondition>,
    analysis: Option<Analysis>,
    #[serde(deserialize_with = "null_as_default")]
    metrics: Vec<MetricInfo>,
    version_recommended_for_promotion: Option<String>,
}

impl ExperimentStatus {
    /// Get the number of completed iterations, if reported.
    #[must_use]
    pub const fn completed_iterations(&self) -> Option<u32> {
        self.completed_iterations
    }

    /// Get the lifecycle stage, if reported.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// Get the status message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Get the status conditions.
    #[must_use]
    pub fn conditions(&self) -> &[ExperimentCondition] {
        &self.conditions
    }

    /// Get the analysis, if present.
    #[must_use]
    pub const fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Get the metrics recorded in status.
    #[must_use]
    pub fn metrics(&self) -> &[MetricInfo] {
        &self.metrics
    }

    /// Get the version recommended for promotion, if any.
    #[must_use]
    pub fn version_recommended_for_promotion(&self) -> Option<&str> {
        self.version_recommended_for_promotion.as_deref()
    }
}
