//! Threshold expressions: `<aggregate> <op> <bound>`.
//!
//! The engine evaluates thresholds itself at the end of a run; this module
//! models them so scenarios can declare them with types, print them in the
//! engine's syntax and re-check them against an exported summary.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::duration::EngineDuration;
use crate::error::ThresholdParseError;
use crate::summary::MetricSummary;

/// Aggregated statistic a threshold compares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    /// Mean.
    Avg,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
    /// Median.
    Med,
    /// Number of samples.
    Count,
    /// Per-second rate for counters, or the pass ratio for rate metrics.
    Rate,
    /// Last value of a gauge, or the pass ratio for rate metrics.
    Value,
    /// Percentile within `[0, 100]`.
    Percentile(f64),
}

impl Aggregate {
    fn parse(raw: &str) -> Result<Self, ThresholdParseError> {
        let simple = match raw {
            "avg" => Some(Self::Avg),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "med" => Some(Self::Med),
            "count" => Some(Self::Count),
            "rate" => Some(Self::Rate),
            "value" => Some(Self::Value),
            _ => None,
        };
        if let Some(aggregate) = simple {
            return Ok(aggregate);
        }
        let inner = raw
            .strip_prefix("p(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ThresholdParseError::UnknownAggregate {
                aggregate: raw.to_owned(),
            })?;
        inner
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| (0.0..=100.0).contains(p))
            .map(Self::Percentile)
            .ok_or_else(|| ThresholdParseError::InvalidPercentile {
                value: inner.to_owned(),
            })
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avg => f.write_str("avg"),
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
            Self::Med => f.write_str("med"),
            Self::Count => f.write_str("count"),
            Self::Rate => f.write_str("rate"),
            Self::Value => f.write_str("value"),
            Self::Percentile(p) => write!(f, "p({p})"),
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl Comparison {
    // Two-character operators first so `<=` is not read as `<`.
    const ALL: [(&'static str, Self); 6] = [
        ("<=", Self::Le),
        (">=", Self::Ge),
        ("==", Self::Eq),
        ("!=", Self::Ne),
        ("<", Self::Lt),
        (">", Self::Gt),
    ];

    const fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    #[expect(clippy::float_cmp, reason = "engine thresholds compare exactly")]
    fn holds(self, observed: f64, bound: f64) -> bool {
        match self {
            Self::Lt => observed < bound,
            Self::Le => observed <= bound,
            Self::Gt => observed > bound,
            Self::Ge => observed >= bound,
            Self::Eq => observed == bound,
            Self::Ne => observed != bound,
        }
    }
}

/// A parsed threshold expression.
///
/// # Examples
/// ```
/// use scenarios::{Aggregate, Comparison, ThresholdExpr};
///
/// let expr: ThresholdExpr = "p(95) < 500".parse().unwrap();
/// assert_eq!(expr, ThresholdExpr::new(Aggregate::Percentile(95.0), Comparison::Lt, 500.0));
/// assert_eq!(expr.to_string(), "p(95)<500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdExpr {
    aggregate: Aggregate,
    comparison: Comparison,
    bound: f64,
}

impl ThresholdExpr {
    /// Build an expression from its parts.
    #[must_use]
    pub const fn new(aggregate: Aggregate, comparison: Comparison, bound: f64) -> Self {
        Self {
            aggregate,
            comparison,
            bound,
        }
    }

    /// Aggregate being compared.
    #[must_use]
    pub const fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// Compare an observed value.
    #[must_use]
    pub fn holds_for(&self, observed: f64) -> bool {
        self.comparison.holds(observed, self.bound)
    }

    /// Evaluate against `metric` in `summary`. `None` when the summary does
    /// not report the aggregate.
    #[must_use]
    pub fn evaluate(&self, summary: &MetricSummary, metric: &str) -> Option<(f64, bool)> {
        summary
            .aggregate(metric, self.aggregate)
            .map(|observed| (observed, self.holds_for(observed)))
    }
}

impl FromStr for ThresholdExpr {
    type Err = ThresholdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expression = s.trim();
        if expression.is_empty() {
            return Err(ThresholdParseError::Empty);
        }
        let (position, symbol, comparison) = Comparison::ALL
            .iter()
            .filter_map(|(symbol, comparison)| {
                expression
                    .find(symbol)
                    .map(|position| (position, *symbol, *comparison))
            })
            .min_by_key(|(position, symbol, _)| (*position, usize::MAX - symbol.len()))
            .ok_or_else(|| ThresholdParseError::MissingOperator {
                expression: expression.to_owned(),
            })?;
        let (lhs, rest) = expression.split_at(position);
        let rhs = rest.strip_prefix(symbol).unwrap_or(rest).trim();
        let aggregate = Aggregate::parse(lhs.trim())?;
        let bound = rhs
            .parse::<f64>()
            .ok()
            .filter(|b| b.is_finite())
            .ok_or_else(|| ThresholdParseError::InvalidBound {
                value: rhs.to_owned(),
            })?;
        Ok(Self::new(aggregate, comparison, bound))
    }
}

impl fmt::Display for ThresholdExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.aggregate,
            self.comparison.symbol(),
            self.bound
        )
    }
}

/// A threshold as declared in options: an expression, optionally aborting
/// the run as soon as it fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    expr: ThresholdExpr,
    abort_on_fail: bool,
    delay_abort_eval: Option<EngineDuration>,
}

impl Threshold {
    /// Non-aborting threshold.
    #[must_use]
    pub const fn new(expr: ThresholdExpr) -> Self {
        Self {
            expr,
            abort_on_fail: false,
            delay_abort_eval: None,
        }
    }

    /// Abort the run when the threshold fails, after an optional grace
    /// period.
    #[must_use]
    pub const fn aborting(mut self, delay: Option<EngineDuration>) -> Self {
        self.abort_on_fail = true;
        self.delay_abort_eval = delay;
        self
    }

    /// Underlying expression.
    #[must_use]
    pub const fn expr(&self) -> &ThresholdExpr {
        &self.expr
    }
}

impl From<ThresholdExpr> for Threshold {
    fn from(expr: ThresholdExpr) -> Self {
        Self::new(expr)
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.abort_on_fail {
            return serializer.collect_str(&self.expr);
        }
        let len = if self.delay_abort_eval.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("threshold", &self.expr.to_string())?;
        map.serialize_entry("abortOnFail", &true)?;
        if let Some(delay) = &self.delay_abort_eval {
            map.serialize_entry("delayAbortEval", delay)?;
        }
        map.end()
    }
}

/// `p(n) < bound`
#[must_use]
pub const fn p(percentile: f64, comparison: Comparison, bound: f64) -> ThresholdExpr {
    ThresholdExpr::new(Aggregate::Percentile(percentile), comparison, bound)
}

/// `rate < bound`
#[must_use]
pub const fn rate_below(bound: f64) -> ThresholdExpr {
    ThresholdExpr::new(Aggregate::Rate, Comparison::Lt, bound)
}

/// `rate > bound`
#[must_use]
pub const fn rate_above(bound: f64) -> ThresholdExpr {
    ThresholdExpr::new(Aggregate::Rate, Comparison::Gt, bound)
}
