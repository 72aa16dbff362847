//! Experiment resource model and extraction
//!
//! Typed view of a progressive-delivery experiment resource and the derived
//! facts a report needs.
//!
//! ## Schema Overview
//!
//! ```text
//! Experiment
//!   ├── metadata (name, namespace, creationTimestamp)
//!   ├── spec
//!   │     ├── target, testingPattern, deploymentPattern
//!   │     ├── versionInfo (baseline, candidates[])
//!   │     ├── criteria.objectives[]
//!   │     └── metrics[]
//!   └── status
//!         ├── completedIterations, stage, conditions[]
//!         ├── versionRecommendedForPromotion
//!         └── analysis
//!               ├── winnerAssessment.data
//!               ├── versionAssessments.data   [version -> flags[]]
//!               └── aggregatedMetrics.data    [metric -> version -> value]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use expctl::experiment::Experiment;
//!
//! let experiment = Experiment::from_yaml(
//!     "spec:\n  versionInfo:\n    baseline: {name: default}\n    candidates: [{name: canary}]\n",
//! )?;
//!
//! assert!(!experiment.started());
//! assert_eq!(experiment.versions(), ["default", "canary"]);
//! assert_eq!(experiment.metric_value("error-rate", "canary"), "unavailable");
//! # Ok::<(), expctl::Error>(())
//! ```

mod extract;
mod resource;
mod serde_util;
mod spec;
mod status;
mod store;

pub use extract::{COMPLETED_CONDITION, COMPLETED_STAGE, UNAVAILABLE};
pub use resource::{Experiment, ObjectMeta};
pub use spec::{
    Criteria, ExperimentSpec, MetricInfo, Objective, Strategy, TestingPattern, VersionDetail,
    VersionInfo,
};
pub use status::{
    AggregatedMetric, AggregatedMetricValue, AggregatedMetrics, Analysis, AnalysisMeta,
    ExperimentCondition, ExperimentStatus, Satisfaction, VersionAssessments, WinnerAssessment,
    WinnerAssessmentData,
};
pub use store::{ExperimentStore, Selector};
