//! Report Builder - human-readable description of an experiment
//!
//! Sections are emitted in a fixed order, each as a step returning a
//! `Result`; the first failure aborts the report.
//!
//! ```text
//! Overview ─> Progress Summary ─┬─ (not started) ─> done
//!                               └─> Winner Assessment ─> Objective Assessment ─> Metrics Assessment
//! ```
//!
//! ## Example
//!
//! ```rust
//! use expctl::experiment::Experiment;
//! use expctl::report;
//!
//! let experiment = Experiment::from_yaml("metadata:\n  name: exp1\n  namespace: ns1\n")?;
//! let text = report::describe(&experiment)?;
//!
//! assert!(text.contains("Experiment name: exp1"));
//! assert!(text.contains("Number of completed iterations: 0"));
//! # Ok::<(), expctl::Error>(())
//! ```

mod table;

pub use table::Table;

use std::fmt::Write as _;
use std::io;

use tracing::debug;

use crate::experiment::{Experiment, TestingPattern, WinnerAssessment};
use crate::Result;

const CANARY_EXPLANATION: &str = "\
> If the candidate version satisfies the experiment objectives, then it is the winner.
> Otherwise, if the baseline version satisfies the experiment objectives, it is the winner.
> Otherwise, there is no winner.
";

const CONFORMANCE_EXPLANATION: &str = "\
> If the version being validated; i.e., the baseline version, satisfies the experiment objectives, it is the winner.
> Otherwise, there is no winner.
";

/// Accumulates the report text for one experiment.
#[derive(Debug)]
pub struct ReportBuilder<'a> {
    experiment: &'a Experiment,
    buf: String,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder over `experiment`.
    #[must_use]
    pub const fn new(experiment: &'a Experiment) -> Self {
        Self {
            experiment,
            buf: String::new(),
        }
    }

    /// Emit every applicable section and return the report.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Format`] if writing to the buffer fails.
    pub fn build(mut self) -> Result<String> {
        self.overview()?;
        self.progress()?;
        if !self.experiment.started() {
            debug!(name = self.experiment.name(), "experiment not started");
            return Ok(self.buf);
        }
        self.winner_assessment()?;
        self.objective_assessment()?;
        self.metrics_assessment()?;
        Ok(self.buf)
    }

    fn section(&mut self, title: &str) -> Result<()> {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        writeln!(self.buf, "****** {title} ******")?;
        debug!(section = title, "emitting section");
        Ok(())
    }

    fn overview(&mut self) -> Result<()> {
        let experiment = self.experiment;
        let spec = experiment.spec();
        self.section("Overview")?;
        writeln!(self.buf, "Experiment name: {}", experiment.name())?;
        writeln!(self.buf, "Experiment namespace: {}", experiment.namespace())?;
        writeln!(self.buf, "Target: {}", spec.target())?;
        writeln!(
            self.buf,
            "Testing pattern: {}",
            spec.testing_pattern().map_or("unspecified", TestingPattern::as_str)
        )?;
        if let Some(pattern) = spec.deployment_pattern() {
            writeln!(self.buf, "Deployment pattern: {pattern}")?;
        }
        Ok(())
    }

    fn progress(&mut self) -> Result<()> {
        let status = self.experiment.status();
        self.section("Progress Summary")?;
        if let Some(stage) = status.stage() {
            writeln!(self.buf, "Experiment stage: {stage}")?;
        }
        if let Some(message) = status.message() {
            writeln!(self.buf, "Experiment message: {message}")?;
        }
        writeln!(
            self.buf,
            "Number of completed iterations: {}",
            status.completed_iterations().unwrap_or(0)
        )?;
        Ok(())
    }

    fn winner_assessment(&mut self) -> Result<()> {
        let experiment = self.experiment;
        let Some(assessment) = experiment
            .status()
            .analysis()
            .and_then(|a| a.winner_assessment())
        else {
            return Ok(());
        };
        self.section("Winner Assessment")?;

        let pattern = experiment.spec().testing_pattern();
        match pattern {
            Some(TestingPattern::Canary) => self.buf.push_str(CANARY_EXPLANATION),
            Some(TestingPattern::Conformance) => self.buf.push_str(CONFORMANCE_EXPLANATION),
            _ => {}
        }
        if pattern != Some(&TestingPattern::Conformance) {
            writeln!(
                self.buf,
                "Versions in this experiment: {}",
                experiment.versions().join(", ")
            )?;
        }
        self.winner_lines(assessment)?;
        if let Some(version) = experiment.status().version_recommended_for_promotion() {
            writeln!(self.buf, "Version recommended for promotion: {version}")?;
        }
        Ok(())
    }

    fn winner_lines(&mut self, assessment: &WinnerAssessment) -> Result<()> {
        let data = assessment.data();
        match data.winner().filter(|_| data.winner_found()) {
            Some(winner) => writeln!(self.buf, "Winning version: {winner}")?,
            None => writeln!(self.buf, "Winning version: not found")?,
        }
        Ok(())
    }

    fn objective_assessment(&mut self) -> Result<()> {
        let experiment = self.experiment;
        let objectives = experiment.spec().objectives();
        if objectives.is_empty() {
            return Ok(());
        }
        self.section("Objective Assessment")?;
        self.buf.push_str(
            "> Identifies whether or not the experiment objectives are satisfied by the most recently observed metrics values for each version.\n",
        );

        let versions = experiment.versions();
        let mut table = Table::new(std::iter::once("Objective".to_string()).chain(versions));
        for (i, objective) in objectives.iter().enumerate() {
            table.push_row(
                std::iter::once(objective.to_string()).chain(experiment.satisfies_objectives(i)),
            );
        }
        write!(self.buf, "{table}")?;
        Ok(())
    }

    fn metrics_assessment(&mut self) -> Result<()> {
        let experiment = self.experiment;
        let metrics = experiment.metrics();
        if metrics.is_empty() {
            return Ok(());
        }
        self.section("Metrics Assessment")?;
        self.buf
            .push_str("> Most recently read values of experiment metrics for each version.\n");

        let versions = experiment.versions();
        let mut table = Table::new(std::iter::once("Metric".to_string()).chain(versions));
        for metric in metrics {
            table.push_row(
                std::iter::once(metric.name_and_units())
                    .chain(experiment.metric_values(metric.name())),
            );
        }
        write!(self.buf, "{table}")?;
        Ok(())
    }
}

/// Build the report for `experiment`.
///
/// # Errors
///
/// Returns [`crate::Error::Format`] if the report cannot be formatted.
pub fn describe(experiment: &Experiment) -> Result<String> {
    ReportBuilder::new(experiment).build()
}

/// Build the report for `experiment` and write it to `sink` verbatim.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the sink rejects the write.
pub fn write_report<W: io::Write + ?Sized>(experiment: &Experiment, sink: &mut W) -> Result<()> {
    let report = describe(experiment)?;
    sink.write_all(report.as_bytes())?;
    sink.flush()?;
    Ok(())
}
