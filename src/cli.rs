//! Command-line interface
//!
//! `expctl describe` prints the report for one experiment; `expctl assert`
//! checks conditions on it. Standard streams are passed into [`run`] so the
//! whole command can be driven from tests.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::debug;

use crate::conditions::{self, Condition};
use crate::config::Config;
use crate::experiment::{Experiment, ExperimentStore, Selector};
use crate::report;
use crate::source::{self, Source};
use crate::Result;

/// Parsed command line.
#[derive(Parser, Debug)]
#[command(
    name = "expctl",
    version,
    about = "Describe progressive-delivery experiments and assert their conditions",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (default: $HOME/.expctl.yaml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize an experiment: progress, winner, objectives, and metrics.
    Describe(DescribeArgs),
    /// Assert conditions for an experiment; fails unless all hold.
    Assert(AssertArgs),
}

/// Options selecting one experiment from the input.
#[derive(ClapArgs, Debug)]
pub struct SelectArgs {
    /// Experiment YAML or JSON file, or - for standard input.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: String,

    /// Name of the experiment; ignored when --latest is used.
    #[arg(short = 'e', long = "experiment", value_name = "NAME")]
    pub experiment: Option<String>,

    /// Namespace of the experiment (default from configuration).
    #[arg(short = 'n', long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Use the experiment with the latest creation timestamp.
    #[arg(short = 'l', long)]
    pub latest: bool,
}

impl SelectArgs {
    fn selector(&self, config: &Config) -> Selector {
        match (&self.experiment, self.latest) {
            (_, true) => Selector::Latest,
            (Some(name), false) => Selector::Named {
                name: name.clone(),
                namespace: config.namespace().to_string(),
            },
            (None, false) => Selector::Only,
        }
    }
}

/// `describe` options.
#[derive(ClapArgs, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub select: SelectArgs,
}

/// `assert` options.
#[derive(ClapArgs, Debug)]
pub struct AssertArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub select: SelectArgs,

    /// Condition to assert: completed | winnerFound. Repeatable or comma-separated.
    #[arg(short = 'c', long = "condition", value_delimiter = ',', required = true)]
    pub conditions: Vec<Condition>,
}

impl Cli {
    fn select_args(&self) -> &SelectArgs {
        match &self.command {
            Command::Describe(args) => &args.select,
            Command::Assert(args) => &args.select,
        }
    }

    /// Resolve configuration for this invocation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if a configuration file cannot be loaded.
    pub fn load_config<I>(&self, env: I, home_dir: Option<PathBuf>) -> Result<Config>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut builder = Config::builder()
            .env(env)
            .namespace(self.select_args().namespace.clone());
        if let Some(file) = &self.config {
            builder = builder.file(file);
        }
        if let Some(home) = home_dir {
            builder = builder.home_dir(home);
        }
        builder.build()
    }
}

fn load_store(args: &SelectArgs, stdin: &mut dyn Read) -> Result<ExperimentStore> {
    let text = Source::from(args.file.as_str()).read(stdin)?;
    let store = ExperimentStore::from_experiments(source::load_experiments(&text)?);
    debug!(experiments = store.len(), "loaded input");
    Ok(store)
}

fn with_experiment<T>(
    args: &SelectArgs,
    config: &Config,
    stdin: &mut dyn Read,
    f: impl FnOnce(&Experiment) -> Result<T>,
) -> Result<T> {
    let store = load_store(args, stdin)?;
    let experiment = store.select(&args.selector(config))?;
    f(experiment)
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns any loading, selection, assertion, or output error.
pub fn run(
    cli: &Cli,
    config: &Config,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Command::Describe(args) => with_experiment(&args.select, config, stdin, |experiment| {
            report::write_report(experiment, stdout)
        }),
        Command::Assert(args) => with_experiment(&args.select, config, stdin, |experiment| {
            conditions::assert_conditions(experiment, &args.conditions)?;
            writeln!(stdout, "All conditions satisfied.")?;
            Ok(())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_flags() {
        let config = Config::default();
        let cli = Cli::try_parse_from(["expctl", "describe", "-f", "-"]).expect("valid");
        assert_eq!(cli.select_args().selector(&config), Selector::Only);

        let cli = Cli::try_parse_from(["expctl", "describe", "-f", "-", "-e", "exp", "-l"])
            .expect("valid");
        assert_eq!(cli.select_args().selector(&config), Selector::Latest);

        let cli = Cli::try_parse_from(["expctl", "describe", "-f", "-", "-e", "exp"]).expect("valid");
        assert_eq!(
            cli.select_args().selector(&config),
            Selector::Named {
                name: "exp".to_string(),
                namespace: "default".to_string()
            }
        );
    }

    #[test]
    fn test_namespace_flag_overrides_env() {
        let cli = Cli::try_parse_from(["expctl", "describe", "-f", "-", "-n", "ns1"]).expect("valid");
        let config = cli
            .load_config([("EXPCTL_NAMESPACE".to_string(), "ns2".to_string())], None)
            .expect("config");
        assert_eq!(config.namespace(), "ns1");
    }

    #[test]
    fn test_assert_parses_conditions() {
        let cli = Cli::try_parse_from([
            "expctl",
            "assert",
            "-f",
            "-",
            "-c",
            "completed,winnerFound",
        ])
        .expect("valid");
        match cli.command {
            Command::Assert(args) => assert_eq!(
                args.conditions,
                [Condition::Completed, Condition::WinnerFound]
            ),
            Command::Describe(_) => panic!("expected assert"),
        }
    }

    #[test]
    fn test_invalid_arguments() {
        for args in [
            vec!["expctl"],
            vec!["expctl", "invalid"],
            vec!["expctl", "describe"],
            vec!["expctl", "describe", "-f"],
            vec!["expctl", "assert", "-f", "-"],
            vec!["expctl", "assert", "-f", "-", "-c", "done"],
        ] {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "{args:?} should not parse");
        }
    }
}
