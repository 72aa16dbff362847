//! expctl binary: describe experiments and assert their conditions.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use expctl::cli::{self, Cli};
use expctl::logging;

fn execute(cli: &Cli) -> anyhow::Result<()> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let env = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
    let config = cli
        .load_config(env, home)
        .context("failed to load configuration")?;
    logging::init_or_disable(config.log_level());

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    cli::run(cli, &config, &mut stdin, &mut stdout)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
