//! Error types for scenario configuration and execution.

use thiserror::Error;

/// Failures parsing engine duration strings such as `1h30m`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// The input was blank.
    #[error("duration must not be empty")]
    Empty,
    /// A number was not followed by a unit.
    #[error("duration '{input}' has a number without a unit")]
    MissingUnit {
        /// Offending input.
        input: String,
    },
    /// A unit was not preceded by a number.
    #[error("duration '{input}' has a unit without a number")]
    MissingNumber {
        /// Offending input.
        input: String,
    },
    /// The unit is not one of `ms`, `s`, `m`, `h` or `d`.
    #[error("duration '{input}' uses unknown unit '{unit}'")]
    UnknownUnit {
        /// Offending input.
        input: String,
        /// Unrecognised unit.
        unit: String,
    },
    /// The total does not fit in a `u64` of milliseconds.
    #[error("duration '{input}' is too large")]
    Overflow {
        /// Offending input.
        input: String,
    },
}

/// Failures parsing threshold expressions such as `p(95)<500`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdParseError {
    /// The expression was blank.
    #[error("threshold expression must not be empty")]
    Empty,
    /// The aggregate is not recognised.
    #[error("unknown aggregate '{aggregate}'")]
    UnknownAggregate {
        /// Offending aggregate.
        aggregate: String,
    },
    /// A `p(N)` aggregate had an invalid percentile.
    #[error("percentile '{value}' must be a number within [0, 100]")]
    InvalidPercentile {
        /// Offending percentile text.
        value: String,
    },
    /// No comparison operator followed the aggregate.
    #[error("expected one of <, <=, >, >=, ==, != in '{expression}'")]
    MissingOperator {
        /// Offending expression.
        expression: String,
    },
    /// The right-hand side is not a finite number.
    #[error("invalid threshold bound '{value}'")]
    InvalidBound {
        /// Offending bound text.
        value: String,
    },
}

/// Failures reading run settings from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Description of accepted values.
        expected: &'static str,
    },
}

/// Failures reading an exported summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The file is not valid JSON.
    #[error("summary is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON lacks a `metrics` object.
    #[error("summary has no 'metrics' object")]
    MissingMetrics,
}

/// Failures resolving or rendering scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// No scenario has the requested name.
    #[error("unknown scenario '{name}'")]
    Unknown {
        /// Requested name.
        name: String,
    },
    /// Run settings were invalid.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The summary could not be read.
    #[error(transparent)]
    Summary(#[from] SummaryError),
    /// Options could not be serialised.
    #[error("failed to serialise options: {0}")]
    Serialise(#[from] serde_json::Error),
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File involved.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Failures that abort a smoke iteration before any request is sent.
#[derive(Debug, Error)]
pub enum RunError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The think-time scale was negative or not finite.
    #[error("think scale must be a finite, non-negative number, got {0}")]
    InvalidThinkScale(f64),
}

/// Failures rendering `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The placeholder names a variable no earlier step extracted.
    #[error("variable '{name}' has not been extracted")]
    MissingVariable {
        /// Placeholder name.
        name: String,
    },
    /// A `{{` has no closing `}}`.
    #[error("unterminated placeholder in '{template}'")]
    Unterminated {
        /// Offending template.
        template: String,
    },
}

/// Failures surfaced by the `scenarios` command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// Scenario lookup, settings or summary handling failed.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// The smoke runner could not start.
    #[error(transparent)]
    Run(#[from] RunError),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
