//! Command-line interface for the scenario catalogue.
//!
//! The binary parses arguments and delegates here so every command can be
//! exercised in tests against an in-memory writer.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mockable::Env;

use crate::catalogue::{catalogue, find};
use crate::error::{CliError, ScenarioError};
use crate::runner::{StepStatus, build_client, run_iteration};
use crate::settings::RunSettings;
use crate::summary::{MetricSummary, check_thresholds};

/// Scenario catalogue, option export and smoke checks.
#[derive(Debug, Parser)]
#[command(name = "scenarios", version, about)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List scenario names and descriptions.
    List,
    /// Print engine options as JSON, with VUS/DURATION/ENVIRONMENT applied.
    Export {
        /// Scenario name.
        name: String,
        /// Write to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Run one iteration of the scenario journey against BASE_URL.
    Smoke {
        /// Scenario name.
        name: String,
        /// Multiplier applied to think times; 0 disables pauses.
        #[arg(long, default_value_t = 1.0, value_name = "FACTOR")]
        think_scale: f64,
    },
    /// Re-check scenario thresholds against an exported summary.
    Check {
        /// Scenario name.
        name: String,
        /// Path to the engine's `--summary-export` JSON.
        #[arg(long, value_name = "PATH")]
        summary: PathBuf,
    },
}

/// Run `command`, writing human-readable output to `out`.
///
/// Returns `false` when a smoke iteration or threshold check fails.
///
/// # Errors
///
/// Returns [`CliError`] for unknown scenarios, invalid settings, unreadable
/// files and output failures.
pub async fn execute<E: Env, W: Write>(
    command: Command,
    env: &E,
    out: &mut W,
) -> Result<bool, CliError> {
    match command {
        Command::List => {
            for scenario in catalogue() {
                writeln!(out, "{:<16}{}", scenario.name, scenario.description)?;
            }
            Ok(true)
        }
        Command::Export { name, out: path } => {
            let settings = load_settings(env)?;
            let options = find(&name)?.options_for(&settings);
            let json = serde_json::to_string_pretty(&options).map_err(ScenarioError::from)?;
            match path {
                Some(path) => write_file(&path, &json)?,
                None => writeln!(out, "{json}")?,
            }
            Ok(true)
        }
        Command::Smoke { name, think_scale } => {
            let settings = load_settings(env)?;
            let scenario = find(&name)?;
            let client = build_client(&settings)?;
            let mut rng = rand::rng();
            let report =
                run_iteration(&client, &settings, &scenario.journey, think_scale, &mut rng).await?;
            for step in &report.steps {
                let label = match step.outcome {
                    StepStatus::Passed => "PASS",
                    StepStatus::Failed => "FAIL",
                    StepStatus::Skipped => "SKIP",
                };
                let status = step
                    .status
                    .map_or_else(|| "---".to_owned(), |code| code.to_string());
                writeln!(
                    out,
                    "{label} {status} {:>6}ms {} {} ({})",
                    step.elapsed_ms, step.method, step.path, step.name
                )?;
                if let Some(reason) = &step.reason {
                    writeln!(out, "     {reason}")?;
                }
            }
            Ok(report.completed)
        }
        Command::Check { name, summary } => {
            let settings = load_settings(env)?;
            let options = find(&name)?.options_for(&settings);
            let raw = read_file(&summary)?;
            let parsed = MetricSummary::from_json(&raw).map_err(ScenarioError::from)?;
            let verdicts = check_thresholds(&parsed, &options.thresholds);
            for verdict in &verdicts {
                let label = if verdict.passed { "PASS" } else { "FAIL" };
                let observed = verdict
                    .observed
                    .map_or_else(|| "missing".to_owned(), |value| value.to_string());
                writeln!(
                    out,
                    "{label} {} {} (observed {observed})",
                    verdict.metric, verdict.expression
                )?;
            }
            Ok(verdicts.iter().all(|verdict| verdict.passed))
        }
    }
}

fn load_settings<E: Env>(env: &E) -> Result<RunSettings, ScenarioError> {
    Ok(RunSettings::from_env(env)?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ScenarioError> {
    std::fs::write(path, contents).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String, ScenarioError> {
    std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })
}
