//! Load-test scenarios for the mock API.
//!
//! The load engine does the heavy lifting: it schedules virtual users,
//! issues requests and aggregates metrics. This crate describes what it
//! should do. Each [`Scenario`] pairs engine [`LoadOptions`] (virtual users,
//! ramp stages, executors and [`Threshold`]s) with a short [`Journey`] of
//! requests and pauses executed once per iteration.
//!
//! # Overview
//!
//! - [`catalogue`] and [`find`] expose the built-in scenarios
//! - [`RunSettings`] reads `BASE_URL`, `VUS`, `DURATION`, `ENVIRONMENT` and
//!   `TIMEOUT`
//! - [`run_iteration`] executes one journey pass for smoke checks
//! - [`check_thresholds`] re-verifies thresholds against an exported summary
//!
//! # Example
//!
//! ```
//! use scenarios::find;
//!
//! let smoke = find("smoke").expect("built-in scenario");
//! let json = serde_json::to_value(&smoke.options).expect("serialisable");
//! assert_eq!(json["vus"], 1);
//! assert_eq!(json["thresholds"]["http_req_failed"][0], "rate<0.01");
//! ```

pub mod catalogue;
pub mod cli;
mod duration;
pub mod error;
pub mod journey;
pub mod options;
pub mod runner;
pub mod settings;
pub mod summary;
pub mod threshold;

pub use catalogue::{Scenario, catalogue, find};
pub use duration::EngineDuration;
pub use error::{
    CliError, DurationParseError, RunError, ScenarioError, SettingsError, SummaryError,
    TemplateError, ThresholdParseError,
};
pub use journey::{HttpMethod, Journey, RequestStep, Step, ThinkTime, Variables, render};
pub use options::{Executor, LoadOptions, ScenarioExecutor, Stage};
pub use runner::{IterationReport, StepOutcome, StepStatus, build_client, run_iteration};
pub use settings::{Environment, RunSettings};
pub use summary::{MetricSummary, ThresholdVerdict, check_thresholds};
pub use threshold::{Aggregate, Comparison, Threshold, ThresholdExpr};
