//! Single-iteration smoke runner.
//!
//! Executes one pass of a [`Journey`] against a live server so scenario
//! definitions can be checked before handing them to the engine. There is no
//! concurrency, retry or backoff: the first failing step ends the iteration
//! and the remaining requests are reported as skipped.

use std::time::{Duration, Instant};

use load_data::{RequestHeaders, auth_headers, json_headers, random_user};
use rand::Rng;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::journey::{HttpMethod, Journey, RequestStep, Step, Variables, render, render_value};
use crate::settings::RunSettings;

/// Result of one request step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Expected status and all extractions succeeded.
    Passed,
    /// The request failed or returned an unexpected response.
    Failed,
    /// Not attempted.
    Skipped,
}

/// Report line for one request step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    /// Step label.
    pub name: String,
    /// Verb.
    pub method: &'static str,
    /// Rendered path, or the template when rendering was not reached.
    pub path: String,
    /// Response status, when one was received.
    pub status: Option<u16>,
    /// Wall time for the request.
    pub elapsed_ms: u64,
    /// Outcome.
    pub outcome: StepStatus,
    /// Why the step failed or was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StepOutcome {
    fn skipped(step: &RequestStep, reason: Option<String>) -> Self {
        Self {
            name: step.name.clone(),
            method: step.method.as_str(),
            path: step.path.clone(),
            status: None,
            elapsed_ms: 0,
            outcome: StepStatus::Skipped,
            reason,
        }
    }
}

/// Outcome of a whole iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationReport {
    /// One entry per request step, in journey order.
    pub steps: Vec<StepOutcome>,
    /// Whether every request passed.
    pub completed: bool,
}

impl IterationReport {
    /// Steps with the given outcome.
    pub fn with_status(&self, status: StepStatus) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(move |step| step.outcome == status)
    }
}

/// Build a client using the configured timeout.
///
/// # Errors
///
/// [`RunError::Client`] when the TLS backend cannot be initialised.
pub fn build_client(settings: &RunSettings) -> Result<Client, RunError> {
    Ok(Client::builder()
        .timeout(settings.timeout.as_duration())
        .user_agent(concat!("scenarios/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Run `journey` once.
///
/// The iteration starts with `user.name`, `user.username`, `user.email` and
/// `user.password` set from a freshly generated test user. Think times are
/// multiplied by `think_scale`; pass `0.0` to skip pauses.
///
/// # Errors
///
/// [`RunError::InvalidThinkScale`] when `think_scale` is negative or not
/// finite. Request failures are reported in the [`IterationReport`].
pub async fn run_iteration<R: Rng + ?Sized>(
    client: &Client,
    settings: &RunSettings,
    journey: &Journey,
    think_scale: f64,
    rng: &mut R,
) -> Result<IterationReport, RunError> {
    if !think_scale.is_finite() || think_scale < 0.0 {
        return Err(RunError::InvalidThinkScale(think_scale));
    }
    let mut vars = seed_variables(rng);
    let mut steps = Vec::new();
    let mut halted: Option<String> = None;

    for step in journey.steps() {
        match step {
            Step::Request(request) => {
                if let Some(first) = &halted {
                    steps.push(StepOutcome::skipped(
                        request,
                        Some(format!("previous step '{first}' did not pass")),
                    ));
                    continue;
                }
                let outcome = execute(client, settings, request, &mut vars).await;
                if outcome.outcome != StepStatus::Passed {
                    warn!(
                        step = %outcome.name,
                        status = ?outcome.status,
                        reason = outcome.reason.as_deref().unwrap_or_default(),
                        "step did not pass; skipping the rest of the iteration"
                    );
                    halted = Some(outcome.name.clone());
                }
                steps.push(outcome);
            }
            Step::Think(think) if halted.is_none() => {
                let pause = scale(think.sample(rng), think_scale);
                if !pause.is_zero() {
                    debug!(pause_ms = millis(pause), "thinking");
                    tokio::time::sleep(pause).await;
                }
            }
            Step::Think(_) => {}
        }
    }

    let completed = halted.is_none();
    info!(steps = steps.len(), completed, "iteration finished");
    Ok(IterationReport { steps, completed })
}

fn seed_variables<R: Rng + ?Sized>(rng: &mut R) -> Variables {
    let user = random_user(rng);
    let mut vars = Variables::new();
    vars.insert("user.name".to_owned(), Value::String(user.name));
    vars.insert("user.username".to_owned(), Value::String(user.username));
    vars.insert("user.email".to_owned(), Value::String(user.email));
    vars.insert("user.password".to_owned(), Value::String(user.password));
    vars
}

async fn execute(
    client: &Client,
    settings: &RunSettings,
    step: &RequestStep,
    vars: &mut Variables,
) -> StepOutcome {
    let prepared = match prepare(step, vars) {
        Ok(prepared) => prepared,
        Err(outcome) => return *outcome,
    };
    let mut builder = client.request(method(step.method), settings.url_for(&prepared.path));
    for (name, value) in prepared.headers.iter() {
        builder = builder.header(name, value);
    }
    if let Some(body) = &prepared.body {
        builder = builder.json(body);
    }

    let started = Instant::now();
    let result = builder.send().await;
    let mut outcome = StepOutcome {
        name: step.name.clone(),
        method: step.method.as_str(),
        path: prepared.path,
        status: None,
        elapsed_ms: 0,
        outcome: StepStatus::Failed,
        reason: None,
    };
    let response = match result {
        Ok(response) => response,
        Err(error) => {
            outcome.elapsed_ms = millis(started.elapsed());
            outcome.reason = Some(format!("request failed: {error}"));
            return outcome;
        }
    };
    let status = response.status().as_u16();
    outcome.status = Some(status);
    let body = response.text().await;
    outcome.elapsed_ms = millis(started.elapsed());
    let text = match body {
        Ok(text) => text,
        Err(error) => {
            outcome.reason = Some(format!("failed to read response body: {error}"));
            return outcome;
        }
    };
    debug!(step = %step.name, status, elapsed_ms = outcome.elapsed_ms, "response received");

    if !step.accepts(status) {
        outcome.reason = Some(format!("unexpected status {status}"));
        return outcome;
    }
    if let Err(reason) = extract(step, &text, vars) {
        outcome.reason = Some(reason);
        return outcome;
    }
    outcome.outcome = StepStatus::Passed;
    outcome
}

struct Prepared {
    path: String,
    body: Option<Value>,
    headers: RequestHeaders,
}

fn prepare(step: &RequestStep, vars: &Variables) -> Result<Prepared, Box<StepOutcome>> {
    let skip = |reason: String| Box::new(StepOutcome::skipped(step, Some(reason)));
    let path = render(&step.path, vars).map_err(|e| skip(e.to_string()))?;
    let body = step
        .body
        .as_ref()
        .map(|template| render_value(template, vars))
        .transpose()
        .map_err(|e| skip(e.to_string()))?;
    let headers = match &step.bearer {
        Some(template) => {
            let token = render(template, vars).map_err(|e| skip(e.to_string()))?;
            auth_headers(&token).map_err(|e| {
                Box::new(StepOutcome {
                    outcome: StepStatus::Failed,
                    ..StepOutcome::skipped(step, Some(e.to_string()))
                })
            })?
        }
        None => json_headers(),
    };
    Ok(Prepared {
        path,
        body,
        headers,
    })
}

fn extract(step: &RequestStep, body: &str, vars: &mut Variables) -> Result<(), String> {
    if step.extract.is_empty() {
        return Ok(());
    }
    let json: Value =
        serde_json::from_str(body).map_err(|e| format!("response is not JSON: {e}"))?;
    for (variable, pointer) in &step.extract {
        let value = json
            .pointer(pointer)
            .ok_or_else(|| format!("response has no value at {pointer}"))?;
        vars.insert(variable.clone(), value.clone());
    }
    Ok(())
}

const fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "think times scale by a caller-supplied factor"
)]
fn scale(pause: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(pause.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
