//! Built-in scenarios.
//!
//! Stage targets and durations are fixed. Only scenarios declared with plain
//! `vus`/`duration` pick up the `VUS` and `DURATION` overrides.

use std::time::Duration;

use serde_json::json;

use crate::duration::EngineDuration;
use crate::error::ScenarioError;
use crate::journey::{Journey, RequestStep, ThinkTime};
use crate::options::{Executor, LoadOptions, ScenarioExecutor, Stage};
use crate::settings::{DEFAULT_DURATION, DEFAULT_VUS, RunSettings};
use crate::threshold::{Comparison, Threshold, p, rate_above, rate_below};

/// Request latency metric.
pub const HTTP_REQ_DURATION: &str = "http_req_duration";
/// Failed request ratio metric.
pub const HTTP_REQ_FAILED: &str = "http_req_failed";
/// Passed check ratio metric.
pub const CHECKS: &str = "checks";

/// A named scenario: engine options plus the per-iteration journey.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Lookup key.
    pub name: &'static str,
    /// One-line summary.
    pub description: &'static str,
    /// Options before environment overrides.
    pub options: LoadOptions,
    /// Per-iteration logic.
    pub journey: Journey,
}

impl Scenario {
    /// Options with `VUS`/`DURATION` overrides and run tags applied.
    #[must_use]
    pub fn options_for(&self, settings: &RunSettings) -> LoadOptions {
        let mut options = self.options.clone();
        if options.is_constant() {
            if let Some(vus) = settings.vus {
                options.vus = Some(vus);
            }
            if let Some(duration) = settings.duration {
                options.duration = Some(duration);
            }
        }
        options
            .with_tag("environment", settings.environment.as_str())
            .with_tag("scenario", self.name)
    }
}

/// Every built-in scenario, in presentation order.
#[must_use]
pub fn catalogue() -> Vec<Scenario> {
    vec![
        smoke(),
        load(),
        stress(),
        spike(),
        soak(),
        breakpoint(),
        api_crud(),
        auth_flow(),
        error_handling(),
    ]
}

/// Look up a scenario by name.
///
/// # Errors
///
/// [`ScenarioError::Unknown`] when no scenario has that name.
pub fn find(name: &str) -> Result<Scenario, ScenarioError> {
    catalogue()
        .into_iter()
        .find(|scenario| scenario.name == name)
        .ok_or_else(|| ScenarioError::Unknown {
            name: name.to_owned(),
        })
}

const fn secs(n: u64) -> EngineDuration {
    EngineDuration::from_secs(n)
}

const fn mins(n: u64) -> EngineDuration {
    EngineDuration::from_mins(n)
}

fn latency(p95: f64, p99: f64) -> [Threshold; 2] {
    [
        Threshold::from(p(95.0, Comparison::Lt, p95)),
        Threshold::from(p(99.0, Comparison::Lt, p99)),
    ]
}

/// Health check, list, fetch one, then a small payload.
fn browse_journey() -> Journey {
    Journey::new()
        .request(RequestStep::get("health", "/health").expect_status(200))
        .request(
            RequestStep::get("list users", "/api/users")
                .expect_status(200)
                .extract("firstUserId", "/data/0/id"),
        )
        .think(ThinkTime::Uniform {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        })
        .request(RequestStep::get("get user", "/api/users/{{firstUserId}}").expect_status(200))
        .think(ThinkTime::Fixed(Duration::from_secs(1)))
        .request(RequestStep::get("large payload", "/api/large-payload?size=20").expect_status(200))
}

fn smoke() -> Scenario {
    Scenario {
        name: "smoke",
        description: "One virtual user verifying the system works under minimal load",
        options: LoadOptions::constant(1, DEFAULT_DURATION)
            .with_thresholds(HTTP_REQ_DURATION, [p(95.0, Comparison::Lt, 500.0)])
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.01)]),
        journey: browse_journey(),
    }
}

fn load() -> Scenario {
    Scenario {
        name: "load",
        description: "Ramp to typical traffic, hold, then ramp down",
        options: LoadOptions::default()
            .with_stages(vec![
                Stage::new(mins(2), 20),
                Stage::new(mins(5), 20),
                Stage::new(mins(2), 0),
            ])
            .with_thresholds(HTTP_REQ_DURATION, latency(500.0, 1000.0))
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.01)]),
        journey: browse_journey(),
    }
}

fn stress() -> Scenario {
    Scenario {
        name: "stress",
        description: "Step load well beyond normal traffic to find degradation",
        options: LoadOptions::default()
            .with_stages(vec![
                Stage::new(mins(2), 50),
                Stage::new(mins(5), 50),
                Stage::new(mins(2), 100),
                Stage::new(mins(5), 100),
                Stage::new(mins(2), 200),
                Stage::new(mins(5), 200),
                Stage::new(mins(5), 0),
            ])
            .with_thresholds(HTTP_REQ_DURATION, latency(1500.0, 3000.0))
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.05)]),
        journey: browse_journey(),
    }
}

fn spike() -> Scenario {
    Scenario {
        name: "spike",
        description: "Sudden surge of users followed by recovery",
        options: LoadOptions::default()
            .with_stages(vec![
                Stage::new(secs(10), 10),
                Stage::new(mins(1), 10),
                Stage::new(secs(10), 500),
                Stage::new(mins(3), 500),
                Stage::new(secs(10), 10),
                Stage::new(mins(3), 10),
                Stage::new(secs(10), 0),
            ])
            .with_thresholds(HTTP_REQ_DURATION, [p(95.0, Comparison::Lt, 2000.0)])
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.1)]),
        journey: browse_journey(),
    }
}

fn soak() -> Scenario {
    Scenario {
        name: "soak",
        description: "Moderate load held for hours to surface leaks and drift",
        options: LoadOptions::default()
            .with_stages(vec![
                Stage::new(mins(5), 50),
                Stage::new(EngineDuration::from_hours(3).saturating_add(mins(56)), 50),
                Stage::new(mins(5), 0),
            ])
            .with_thresholds(HTTP_REQ_DURATION, latency(500.0, 1000.0))
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.01)]),
        journey: browse_journey(),
    }
}

fn breakpoint() -> Scenario {
    let abort_after = Some(secs(10));
    Scenario {
        name: "breakpoint",
        description: "Keep raising the arrival rate until thresholds abort the run",
        options: LoadOptions::default()
            .with_scenario(
                "breakpoint",
                ScenarioExecutor::from(Executor::RampingArrivalRate {
                    start_rate: 10,
                    time_unit: secs(1),
                    pre_allocated_vus: 50,
                    max_vus: 1000,
                    stages: vec![Stage::new(EngineDuration::from_hours(2), 1000)],
                }),
            )
            .with_thresholds(
                HTTP_REQ_DURATION,
                [Threshold::from(p(95.0, Comparison::Lt, 2000.0)).aborting(abort_after)],
            )
            .with_thresholds(
                HTTP_REQ_FAILED,
                [Threshold::from(rate_below(0.05)).aborting(abort_after)],
            ),
        journey: browse_journey(),
    }
}

fn api_crud() -> Scenario {
    Scenario {
        name: "api-crud",
        description: "Create, read, update and delete a user on every iteration",
        options: LoadOptions::constant(DEFAULT_VUS, DEFAULT_DURATION)
            .with_thresholds(HTTP_REQ_DURATION, [p(95.0, Comparison::Lt, 500.0)])
            .with_thresholds(HTTP_REQ_FAILED, [rate_below(0.01)])
            .with_thresholds(CHECKS, [rate_above(0.99)]),
        journey: Journey::new()
            .request(
                RequestStep::post(
                    "create user",
                    "/api/users",
                    json!({"name": "{{user.name}}", "email": "{{user.email}}"}),
                )
                .expect_status(201)
                .extract("createdId", "/data/id"),
            )
            .think(ThinkTime::Fixed(Duration::from_secs(1)))
            .request(RequestStep::get("read user", "/api/users/{{createdId}}").expect_status(200))
            .think(ThinkTime::Fixed(Duration::from_secs(1)))
            .request(
                RequestStep::put(
                    "update user",
                    "/api/users/{{createdId}}",
                    json!({"name": "{{user.name}} (updated)"}),
                )
                .expect_status(200),
            )
            .think(ThinkTime::Fixed(Duration::from_secs(1)))
            .request(RequestStep::delete("delete user", "/api/users/{{createdId}}").expect_status(200)),
    }
}

fn auth_flow() -> Scenario {
    Scenario {
        name: "auth-flow",
        description: "Log in, call an authenticated endpoint and confirm bad passwords fail",
        options: LoadOptions::constant(DEFAULT_VUS, DEFAULT_DURATION)
            .with_thresholds(HTTP_REQ_DURATION, [p(95.0, Comparison::Lt, 500.0)])
            .with_thresholds(CHECKS, [rate_above(0.99)]),
        journey: Journey::new()
            .request(
                RequestStep::post(
                    "login",
                    "/api/auth/login",
                    json!({"username": "{{user.username}}", "password": "{{user.password}}"}),
                )
                .expect_status(200)
                .extract("token", "/data/token"),
            )
            .think(ThinkTime::Fixed(Duration::from_secs(1)))
            .request(
                RequestStep::get("current user", "/api/auth/me")
                    .bearer("{{token}}")
                    .expect_status(200)
                    .extract("currentUser", "/data/username"),
            )
            .think(ThinkTime::Fixed(Duration::from_secs(1)))
            .request(
                RequestStep::post(
                    "rejected login",
                    "/api/auth/login",
                    json!({"username": "{{user.username}}", "password": "wrong"}),
                )
                .expect_status(401),
            ),
    }
}

fn error_handling() -> Scenario {
    Scenario {
        name: "error-handling",
        description: "Exercise status echoes, injected failures and delays",
        options: LoadOptions::constant(DEFAULT_VUS, DEFAULT_DURATION)
            .with_thresholds(HTTP_REQ_DURATION, [p(95.0, Comparison::Lt, 1000.0)])
            .with_thresholds(CHECKS, [rate_above(0.95)]),
        journey: Journey::new()
            .request(RequestStep::get("not found", "/api/status/404").expect_status(404))
            .request(RequestStep::get("server error", "/api/status/500").expect_status(500))
            .think(ThinkTime::Fixed(Duration::from_millis(500)))
            .request(
                RequestStep::get("random error", "/api/random-error")
                    .expect_status(200)
                    .expect_status(500),
            )
            .think(ThinkTime::Fixed(Duration::from_millis(500)))
            .request(RequestStep::get("fixed delay", "/api/delay/100").expect_status(200))
            .request(
                RequestStep::get("unknown route", "/api/does-not-exist").expect_status(404),
            ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::settings::Environment;
    use crate::summary::{MetricSummary, check_thresholds};
    use rstest::rstest;
    use serde_json::Value;

    fn settings(vus: Option<u32>, duration: Option<EngineDuration>) -> RunSettings {
        let mut env = mockable::MockEnv::new();
        env.expect_string().times(0..).returning(|_| None);
        let mut settings = RunSettings::from_env(&env).expect("defaults");
        settings.vus = vus;
        settings.duration = duration;
        settings
    }

    #[test]
    fn names_are_unique_and_complete() {
        let names: BTreeSet<&str> = catalogue().iter().map(|s| s.name).collect();
        let expected: BTreeSet<&str> = [
            "smoke",
            "load",
            "stress",
            "spike",
            "soak",
            "breakpoint",
            "api-crud",
            "auth-flow",
            "error-handling",
        ]
        .into_iter()
        .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn unknown_names_are_reported() {
        let err = find("chaos").expect_err("unknown");
        assert_eq!(err.to_string(), "unknown scenario 'chaos'");
    }

    #[rstest]
    #[case("smoke", true)]
    #[case("api-crud", true)]
    #[case("auth-flow", true)]
    #[case("error-handling", true)]
    #[case("load", false)]
    #[case("stress", false)]
    #[case("spike", false)]
    #[case("soak", false)]
    #[case("breakpoint", false)]
    fn overrides_apply_only_to_constant_scenarios(#[case] name: &str, #[case] constant: bool) {
        let scenario = find(name).expect("known scenario");
        let options = scenario.options_for(&settings(Some(42), Some(EngineDuration::from_mins(2))));
        if constant {
            assert_eq!(options.vus, Some(42));
            assert_eq!(options.duration, Some(EngineDuration::from_mins(2)));
            assert!(options.stages.is_empty());
        } else {
            assert_eq!(options.vus, None);
            assert_eq!(options.duration, None);
            assert_eq!(options.stages, scenario.options.stages);
        }
    }

    #[test]
    fn defaults_keep_declared_vus() {
        let smoke = find("smoke").expect("smoke");
        let options = smoke.options_for(&settings(None, None));
        assert_eq!(options.vus, Some(1));
        assert_eq!(options.duration, Some(DEFAULT_DURATION));
    }

    #[test]
    fn options_are_tagged_with_environment_and_name() {
        let mut run = settings(None, None);
        run.environment = Environment::Production;
        let options = find("load").expect("load").options_for(&run);
        assert_eq!(options.tags.get("environment").map(String::as_str), Some("production"));
        assert_eq!(options.tags.get("scenario").map(String::as_str), Some("load"));
    }

    #[rstest]
    #[case("load", 9)]
    #[case("stress", 26)]
    #[case("soak", 246)]
    #[case("breakpoint", 120)]
    fn planned_durations(#[case] name: &str, #[case] minutes: u64) {
        let options = find(name).expect("known").options;
        assert_eq!(options.planned_duration(), mins(minutes));
    }

    #[test]
    fn breakpoint_thresholds_abort() {
        let options = find("breakpoint").expect("breakpoint").options;
        let json = serde_json::to_value(&options).expect("serialise");
        assert_eq!(
            json.pointer("/thresholds/http_req_failed/0/abortOnFail"),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            json.pointer("/scenarios/breakpoint/executor"),
            Some(&Value::String("ramping-arrival-rate".to_owned()))
        );
    }

    #[rstest]
    #[case("load")]
    #[case("stress")]
    #[case("soak")]
    fn p99_scenarios_export_the_p99_trend(#[case] name: &str) {
        let options = find(name).expect("known").options_for(&settings(None, None));
        let json = serde_json::to_value(&options).expect("serialise");
        let stats: Vec<&str> = json
            .get("summaryTrendStats")
            .and_then(Value::as_array)
            .map(|stats| stats.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        assert!(stats.contains(&"p(99)"), "{name}: {stats:?}");
        assert!(stats.contains(&"p(95)"), "{name}: {stats:?}");
    }

    #[test]
    fn exported_load_summary_passes_its_thresholds() {
        let options = find("load").expect("load").options;
        let summary = MetricSummary::default()
            .with(HTTP_REQ_DURATION, "p(95)", 310.0)
            .with(HTTP_REQ_DURATION, "p(99)", 640.0)
            .with(HTTP_REQ_FAILED, "value", 0.0);
        let verdicts = check_thresholds(&summary, &options.thresholds);
        assert!(!verdicts.is_empty());
        assert!(verdicts.iter().all(|v| v.passed), "{verdicts:?}");
    }

    #[test]
    fn every_scenario_declares_thresholds_and_requests() {
        for scenario in catalogue() {
            assert!(!scenario.options.thresholds.is_empty(), "{}", scenario.name);
            assert!(scenario.journey.requests().next().is_some(), "{}", scenario.name);
        }
    }
}
