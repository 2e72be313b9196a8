//! `scenarios` command line.
//!
//! Argument parsing and command logic live in `scenarios::cli`; this binary
//! only wires up logging, the process environment and the exit code.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use mockable::DefaultEnv;
use tracing_subscriber::{EnvFilter, fmt};

use scenarios::cli::{Cli, execute};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        if let Err(write_err) = writeln!(io::stderr().lock(), "tracing init failed: {err}") {
            drop(write_err);
        }
    }

    let env = DefaultEnv::new();
    let mut stdout = io::stdout().lock();
    match execute(cli.command, &env, &mut stdout).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::from(2)
        }
    }
}
