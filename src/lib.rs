//! # expctl: Experiment Description Engine
//!
//! **Version**: 0.1.0
//!
//! expctl turns a declarative progressive-delivery experiment resource (a
//! canary, conformance, or A/B test run descriptor) into a human-readable
//! summary: progress, winner determination, per-version objective
//! satisfaction, and per-version metric values.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke safety**: Report generation is total; missing status data
//!   renders as `unavailable`, never as an error
//! - **Genchi Genbutsu**: Exact decimal quantities, no float rounding drift
//! - **Jidoka**: Loading errors stop at the boundary and never reach the report
//!
//! ## Example Usage
//!
//! ```rust
//! use expctl::experiment::Experiment;
//! use expctl::report;
//!
//! let experiment = Experiment::from_yaml(
//!     r#"
//! metadata: {name: exp1, namespace: ns1}
//! spec:
//!   target: svc
//!   versionInfo:
//!     baseline: {name: default}
//!     candidates: [{name: canary}]
//!   criteria:
//!     objectives: [{metric: error-rate, upperLimit: 0.01}]
//!   metrics: [{name: error-rate}]
//! status:
//!   completedIterations: 5
//!   analysis:
//!     versionAssessments:
//!       data: {default: [true], canary: [true]}
//!     aggregatedMetrics:
//!       data:
//!         error-rate:
//!           data: {default: {value: 0}, canary: {value: 0}}
//! "#,
//! )?;
//!
//! let text = report::describe(&experiment)?;
//! assert!(text.contains("| error-rate <= 0.010 | true    | true   |"));
//! # Ok::<(), expctl::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cli;
pub mod conditions;
pub mod config;
pub mod error;
pub mod experiment;
pub mod logging;
pub mod quantity;
pub mod report;
pub mod source;

pub use error::{Error, Result};
