//! Per-iteration journeys: a linear list of requests and pauses.
//!
//! Requests may reference values pulled from earlier responses with
//! `{{name}}` placeholders in their path, body or bearer token. A step whose
//! placeholders cannot be resolved ends the iteration.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde_json::Value;

use crate::error::TemplateError;

/// Values extracted so far in an iteration.
pub type Variables = BTreeMap<String, Value>;

/// HTTP verbs the journeys use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestStep {
    /// Label used in logs and reports.
    pub name: String,
    /// Verb.
    pub method: HttpMethod,
    /// Path template relative to the base URL.
    pub path: String,
    /// JSON body template.
    pub body: Option<Value>,
    /// Accepted statuses; empty accepts any 2xx.
    pub expect: Vec<u16>,
    /// `(variable, JSON pointer)` pairs read from the response body.
    pub extract: Vec<(String, String)>,
    /// Bearer token template.
    pub bearer: Option<String>,
}

impl RequestStep {
    /// Request with no body, accepting any 2xx.
    #[must_use]
    pub fn new(name: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            method,
            path: path.to_owned(),
            body: None,
            expect: Vec::new(),
            extract: Vec::new(),
            bearer: None,
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(name: &str, path: &str) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    /// `POST path` with a JSON body.
    #[must_use]
    pub fn post(name: &str, path: &str, body: Value) -> Self {
        Self::new(name, HttpMethod::Post, path).with_body(body)
    }

    /// `PUT path` with a JSON body.
    #[must_use]
    pub fn put(name: &str, path: &str, body: Value) -> Self {
        Self::new(name, HttpMethod::Put, path).with_body(body)
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(name: &str, path: &str) -> Self {
        Self::new(name, HttpMethod::Delete, path)
    }

    /// Set the body template.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Accept only `status`. May be repeated.
    #[must_use]
    pub fn expect_status(mut self, status: u16) -> Self {
        self.expect.push(status);
        self
    }

    /// Store the value at `pointer` as `variable`.
    #[must_use]
    pub fn extract(mut self, variable: &str, pointer: &str) -> Self {
        self.extract.push((variable.to_owned(), pointer.to_owned()));
        self
    }

    /// Send `Authorization: Bearer <rendered template>`.
    #[must_use]
    pub fn bearer(mut self, template: &str) -> Self {
        self.bearer = Some(template.to_owned());
        self
    }

    /// Whether `status` satisfies the expectation.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        if self.expect.is_empty() {
            (200..300).contains(&status)
        } else {
            self.expect.contains(&status)
        }
    }
}

/// Pause between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkTime {
    /// Always the same pause.
    Fixed(Duration),
    /// Uniformly drawn from `[min, max]`.
    Uniform {
        /// Shortest pause.
        min: Duration,
        /// Longest pause.
        max: Duration,
    },
}

impl ThinkTime {
    /// Draw a pause.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            Self::Fixed(pause) => pause,
            Self::Uniform { min, max } if max > min => {
                let low = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
                let high = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(rng.random_range(low..=high))
            }
            Self::Uniform { min, .. } => min,
        }
    }
}

/// A journey step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// HTTP call.
    Request(RequestStep),
    /// Pause.
    Think(ThinkTime),
}

/// Ordered steps executed once per iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journey {
    steps: Vec<Step>,
}

impl Journey {
    /// Empty journey.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a request.
    #[must_use]
    pub fn request(mut self, step: RequestStep) -> Self {
        self.steps.push(Step::Request(step));
        self
    }

    /// Append a pause.
    #[must_use]
    pub fn think(mut self, think: ThinkTime) -> Self {
        self.steps.push(Step::Think(think));
        self
    }

    /// Steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Requests only.
    pub fn requests(&self) -> impl Iterator<Item = &RequestStep> {
        self.steps.iter().filter_map(|step| match step {
            Step::Request(request) => Some(request),
            Step::Think(_) => None,
        })
    }
}

/// Substitute every `{{name}}` in `template`.
///
/// # Errors
///
/// [`TemplateError::MissingVariable`] for unknown names and
/// [`TemplateError::Unterminated`] for a `{{` without `}}`.
///
/// # Examples
/// ```
/// use scenarios::{Variables, render};
///
/// let mut vars = Variables::new();
/// vars.insert("id".to_owned(), serde_json::json!(42));
/// assert_eq!(render("/api/users/{{id}}", &vars).unwrap(), "/api/users/42");
/// ```
pub fn render(template: &str, vars: &Variables) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, after_open)) = rest.split_once("{{") {
        let (name, after_close) =
            after_open
                .split_once("}}")
                .ok_or_else(|| TemplateError::Unterminated {
                    template: template.to_owned(),
                })?;
        out.push_str(before);
        match lookup(name, vars)? {
            Value::String(text) => out.push_str(text),
            other => out.push_str(&other.to_string()),
        }
        rest = after_close;
    }
    out.push_str(rest);
    Ok(out)
}

/// Substitute placeholders throughout a JSON body. A string that is exactly
/// one placeholder takes the variable's JSON value, so numbers stay numbers.
///
/// # Errors
///
/// As for [`render`].
pub fn render_value(template: &Value, vars: &Variables) -> Result<Value, TemplateError> {
    match template {
        Value::String(text) => match whole_placeholder(text) {
            Some(name) => lookup(name, vars).cloned(),
            None => render(text, vars).map(Value::String),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| render_value(item, vars))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| render_value(value, vars).map(|v| (key.clone(), v)))
            .collect::<Result<serde_json::Map<_, _>, _>>()
            .map(Value::Object),
        other => Ok(other.clone()),
    }
}

fn whole_placeholder(text: &str) -> Option<&str> {
    let name = text.strip_prefix("{{")?.strip_suffix("}}")?;
    (!name.contains("{{") && !name.contains("}}")).then_some(name)
}

fn lookup<'a>(name: &str, vars: &'a Variables) -> Result<&'a Value, TemplateError> {
    let key = name.trim();
    vars.get(key).ok_or_else(|| TemplateError::MissingVariable {
        name: key.to_owned(),
    })
}
