//! Engine options: virtual users, stages, executors and thresholds.
//!
//! These types serialise to the JSON options object the engine accepts via
//! `--config`, so a scenario declared here runs unchanged under the engine.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::duration::EngineDuration;
use crate::threshold::{Aggregate, Threshold};

/// Trend statistics the engine exports when `summaryTrendStats` is unset.
pub const DEFAULT_TREND_STATS: [&str; 6] = ["avg", "min", "med", "max", "p(90)", "p(95)"];

/// Ramp to `target` VUs (or iterations per time unit) over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// Length of the stage.
    pub duration: EngineDuration,
    /// Target reached at the end of the stage.
    pub target: u32,
}

impl Stage {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(duration: EngineDuration, target: u32) -> Self {
        Self { duration, target }
    }
}

/// How the engine schedules iterations for a named scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "executor",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Executor {
    /// Fixed number of VUs looping for a duration.
    ConstantVus {
        /// VUs.
        vus: u32,
        /// Run time.
        duration: EngineDuration,
    },
    /// VU count following stages.
    RampingVus {
        /// Initial VUs.
        #[serde(rename = "startVUs")]
        start_vus: u32,
        /// Ramp profile.
        stages: Vec<Stage>,
    },
    /// Fixed iteration rate.
    ConstantArrivalRate {
        /// Iterations per `time_unit`.
        rate: u32,
        /// Rate denominator.
        time_unit: EngineDuration,
        /// Run time.
        duration: EngineDuration,
        /// VUs allocated up front.
        #[serde(rename = "preAllocatedVUs")]
        pre_allocated_vus: u32,
        /// Upper bound on VUs.
        #[serde(rename = "maxVUs")]
        max_vus: u32,
    },
    /// Iteration rate following stages.
    RampingArrivalRate {
        /// Initial rate.
        start_rate: u32,
        /// Rate denominator.
        time_unit: EngineDuration,
        /// VUs allocated up front.
        #[serde(rename = "preAllocatedVUs")]
        pre_allocated_vus: u32,
        /// Upper bound on VUs.
        #[serde(rename = "maxVUs")]
        max_vus: u32,
        /// Rate profile.
        stages: Vec<Stage>,
    },
    /// Each VU runs a fixed number of iterations.
    PerVuIterations {
        /// VUs.
        vus: u32,
        /// Iterations per VU.
        iterations: u32,
    },
    /// VUs share a fixed pool of iterations.
    SharedIterations {
        /// VUs.
        vus: u32,
        /// Total iterations.
        iterations: u32,
    },
}

/// A named entry under `scenarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioExecutor {
    /// Scheduling strategy.
    #[serde(flatten)]
    pub executor: Executor,
    /// Offset from the start of the test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<EngineDuration>,
    /// Tags attached to this scenario's metrics.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl From<Executor> for ScenarioExecutor {
    fn from(executor: Executor) -> Self {
        Self {
            executor,
            start_time: None,
            tags: BTreeMap::new(),
        }
    }
}

/// Top-level engine options.
///
/// # Examples
/// ```
/// use scenarios::{EngineDuration, LoadOptions, Stage};
///
/// let options = LoadOptions::default()
///     .with_stages(vec![Stage::new(EngineDuration::from_secs(30), 20)]);
/// let json = serde_json::to_value(&options).unwrap();
/// assert_eq!(json, serde_json::json!({"stages": [{"duration": "30s", "target": 20}]}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    /// Constant VU count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vus: Option<u32>,
    /// Run time for constant VUs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<EngineDuration>,
    /// Ramp profile.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<Stage>,
    /// Named executors.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub scenarios: BTreeMap<String, ScenarioExecutor>,
    /// Metric name to thresholds.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub thresholds: BTreeMap<String, Vec<Threshold>>,
    /// Trend statistics written to the end-of-test summary. Kept in step
    /// with the percentiles the thresholds reference so exported summaries
    /// can be re-checked.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary_trend_stats: Vec<String>,
    /// Tags attached to every metric.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl LoadOptions {
    /// Constant `vus` for `duration`.
    #[must_use]
    pub fn constant(vus: u32, duration: EngineDuration) -> Self {
        Self {
            vus: Some(vus),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Replace the ramp profile.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = stages;
        self
    }

    /// Add a named executor.
    #[must_use]
    pub fn with_scenario(mut self, name: &str, executor: impl Into<ScenarioExecutor>) -> Self {
        self.scenarios.insert(name.to_owned(), executor.into());
        self
    }

    /// Append thresholds for `metric`.
    #[must_use]
    pub fn with_thresholds<I, T>(mut self, metric: &str, thresholds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Threshold>,
    {
        self.thresholds
            .entry(metric.to_owned())
            .or_default()
            .extend(thresholds.into_iter().map(Into::into));
        self.summary_trend_stats = trend_stats_for(&self.thresholds);
        self
    }

    /// Add a global tag.
    #[must_use]
    pub fn with_tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tags.insert(key.to_owned(), value.into());
        self
    }

    /// Whether the options use plain `vus`/`duration` rather than stages or
    /// executors.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.vus.is_some() || self.duration.is_some()
    }

    /// Longest planned run time across `duration`, stages and executors,
    /// ignoring executors bounded by iteration count.
    #[must_use]
    pub fn planned_duration(&self) -> EngineDuration {
        let staged = sum_stages(&self.stages);
        let executors = self
            .scenarios
            .values()
            .map(|s| {
                let own = match &s.executor {
                    Executor::ConstantVus { duration, .. }
                    | Executor::ConstantArrivalRate { duration, .. } => *duration,
                    Executor::RampingVus { stages, .. }
                    | Executor::RampingArrivalRate { stages, .. } => sum_stages(stages),
                    Executor::PerVuIterations { .. } | Executor::SharedIterations { .. } => {
                        EngineDuration::default()
                    }
                };
                s.start_time.unwrap_or_default().saturating_add(own)
            })
            .max()
            .unwrap_or_default();
        [self.duration.unwrap_or_default(), staged, executors]
            .into_iter()
            .max()
            .unwrap_or_default()
    }
}

/// Engine defaults plus every percentile outside them, or nothing when the
/// defaults already cover the thresholds.
fn trend_stats_for(thresholds: &BTreeMap<String, Vec<Threshold>>) -> Vec<String> {
    let mut extra: Vec<f64> = thresholds
        .values()
        .flatten()
        .filter_map(|threshold| match threshold.expr().aggregate() {
            Aggregate::Percentile(percentile) => Some(percentile),
            _ => None,
        })
        .filter(|percentile| {
            let key = Aggregate::Percentile(*percentile).to_string();
            !DEFAULT_TREND_STATS.contains(&key.as_str())
        })
        .collect();
    if extra.is_empty() {
        return Vec::new();
    }
    extra.sort_by(f64::total_cmp);
    extra.dedup();
    DEFAULT_TREND_STATS
        .iter()
        .map(|stat| (*stat).to_owned())
        .chain(
            extra
                .into_iter()
                .map(|percentile| Aggregate::Percentile(percentile).to_string()),
        )
        .collect()
}

fn sum_stages(stages: &[Stage]) -> EngineDuration {
    stages
        .iter()
        .fold(EngineDuration::default(), |acc, stage| {
            acc.saturating_add(stage.duration)
        })
}
