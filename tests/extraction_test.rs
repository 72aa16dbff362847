//! Extraction Layer Tests
//!
//! Lookups over sparse status data must stay total: absence renders as
//! `unavailable`, never as an error.

use expctl::experiment::{Experiment, MetricInfo, Objective, UNAVAILABLE};
use expctl::quantity::Quantity;
use expctl::Error;

const COMPLETED: &str = include_str!("data/experiment-completed.yaml");
const WAITING: &str = include_str!("data/experiment-waiting.yaml");

fn experiment(text: &str) -> Experiment {
    Experiment::from_yaml(text).expect("fixture should parse")
}

// =============================================================================
// Progress and versions
// =============================================================================

#[test]
fn test_started() {
    assert!(experiment(COMPLETED).started());
    assert!(!experiment(WAITING).started());
    assert!(!experiment("status: {}\n").started());
}

#[test]
fn test_versions_baseline_first() {
    assert_eq!(experiment(COMPLETED).versions(), ["default", "canary"]);
    assert_eq!(experiment(WAITING).versions(), ["default"]);
    assert!(experiment("spec: {target: svc}\n").versions().is_empty());
}

#[test]
fn test_versions_keep_declared_candidate_order() {
    let exp = experiment(
        "spec:\n  versionInfo:\n    baseline: {name: v0}\n    candidates: [{name: v3}, {name: v1}, {name: v2}]\n",
    );
    assert_eq!(exp.versions(), ["v0", "v3", "v1", "v2"]);
}

// =============================================================================
// Metric values
// =============================================================================

#[test]
fn test_metric_values() {
    let exp = experiment(COMPLETED);
    assert_eq!(exp.metric_values("error-rate"), ["0", "0"]);
    assert_eq!(exp.metric_values("mean-latency"), ["228.412", "212.334"]);
    assert_eq!(exp.metric_value("request-count", "default"), "1100");
}

#[test]
fn test_metric_value_unavailable_at_every_level() {
    let exp = experiment(COMPLETED);
    assert_eq!(exp.metric_values("fake-metric"), [UNAVAILABLE, UNAVAILABLE]);
    assert_eq!(exp.metric_value("error-rate", "fake-version"), UNAVAILABLE);

    let no_value = experiment(
        "status:\n  analysis:\n    aggregatedMetrics:\n      data:\n        error-rate:\n          data:\n            default: {sampleSize: 3}\n",
    );
    assert_eq!(no_value.metric_value("error-rate", "default"), UNAVAILABLE);

    let no_analysis = experiment("status: {completedIterations: 2}\n");
    assert_eq!(no_analysis.metric_value("error-rate", "default"), UNAVAILABLE);
}

#[test]
fn test_metric_value_ceiling_rounding() {
    let exp = experiment(
        "status:\n  analysis:\n    aggregatedMetrics:\n      data:\n        m:\n          data:\n            v: {value: 0.0105}\n",
    );
    assert_eq!(exp.metric_value("m", "v"), "0.011");
}

#[test]
fn test_metric_value_below_decimal_precision_rounds_up() {
    let exp = experiment(
        "status:\n  analysis:\n    aggregatedMetrics:\n      data:\n        p:\n          data:\n            v1: {value: 1.0e-30}\n            v2: {value: \"1e-30\"}\n            v3: {value: -1.0e-30}\n",
    );
    assert_eq!(exp.metric_value("p", "v1"), "0.001");
    assert_eq!(exp.metric_value("p", "v2"), "0.001");
    assert_eq!(exp.metric_value("p", "v3"), "0");
}

#[test]
fn test_limit_beyond_decimal_range_rejected() {
    let err = Experiment::from_yaml(
        "spec:\n  criteria:\n    objectives: [{metric: request-count, upperLimit: 1e30}]\n",
    )
    .expect_err("limit does not fit a decimal");
    assert!(matches!(err, Error::Deserialization(_)), "{err}");
}

// =============================================================================
// Objective satisfaction
// =============================================================================

#[test]
fn test_satisfies_objectives() {
    let exp = experiment(COMPLETED);
    assert_eq!(exp.satisfies_objectives(0), ["true", "true"]);
    assert_eq!(exp.satisfies_objectives(10), [UNAVAILABLE, UNAVAILABLE]);
}

#[test]
fn test_satisfies_objective_mixed_flags() {
    let exp = experiment(
        "spec:\n  versionInfo:\n    baseline: {name: a}\n    candidates: [{name: b}, {name: c}]\nstatus:\n  analysis:\n    versionAssessments:\n      data:\n        a: [false, null]\n        b: [true]\n",
    );
    assert_eq!(exp.satisfies_objectives(0), ["false", "true", UNAVAILABLE]);
    assert_eq!(exp.satisfies_objectives(1), [UNAVAILABLE, UNAVAILABLE, UNAVAILABLE]);
}

#[test]
fn test_waiting_lookups_unavailable() {
    let exp = experiment(WAITING);
    assert_eq!(exp.satisfies_objectives(0), [UNAVAILABLE]);
    assert_eq!(exp.metric_values("error-rate"), [UNAVAILABLE]);
}

// =============================================================================
// Formatting helpers
// =============================================================================

#[test]
fn test_stringify_objectives_from_fixture() {
    let exp = experiment(COMPLETED);
    let rendered: Vec<String> = exp
        .spec()
        .objectives()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, ["mean-latency <= 1000", "error-rate <= 0.010"]);
}

#[test]
fn test_stringify_objective_upper_only() {
    let upper: Quantity = "0.01".parse().expect("quantity");
    let objective = Objective::new("error-rate", None, Some(upper));
    assert_eq!(objective.to_string(), "error-rate <= 0.010");
}

#[test]
fn test_metric_names_and_units_from_fixture() {
    let exp = experiment(COMPLETED);
    let rendered: Vec<String> = exp.metrics().iter().map(MetricInfo::name_and_units).collect();
    assert_eq!(
        rendered,
        [
            "95th-percentile-tail-latency (milliseconds)",
            "mean-latency (milliseconds)",
            "error-rate",
            "request-count",
        ]
    );
}

// =============================================================================
// Thread safety
// =============================================================================

#[test]
fn test_experiment_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Experiment>();
    assert_send_sync::<Quantity>();
}

// =============================================================================
// Lifecycle facts
// =============================================================================

#[test]
fn test_completed_and_winner_found() {
    let exp = experiment(COMPLETED);
    assert!(exp.completed());
    assert!(exp.winner_found());

    let waiting = experiment(WAITING);
    assert!(!waiting.completed());
    assert!(!waiting.winner_found());
}
