//! Aggregated metrics read from the engine's `--summary-export` JSON.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::SummaryError;
use crate::threshold::{Aggregate, Threshold};

/// Metric name to aggregate key to value, e.g. `http_req_duration` →
/// `p(95)` → `412.3`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSummary {
    metrics: BTreeMap<String, BTreeMap<String, f64>>,
}

impl MetricSummary {
    /// Parse an exported summary. Non-numeric entries are ignored.
    ///
    /// # Errors
    ///
    /// [`SummaryError::Json`] for malformed JSON and
    /// [`SummaryError::MissingMetrics`] when the top-level `metrics` object is
    /// absent.
    pub fn from_json(raw: &str) -> Result<Self, SummaryError> {
        let root: Value = serde_json::from_str(raw)?;
        let metrics = root
            .get("metrics")
            .and_then(Value::as_object)
            .ok_or(SummaryError::MissingMetrics)?;
        let parsed = metrics
            .iter()
            .filter_map(|(name, values)| {
                let numbers: BTreeMap<String, f64> = values
                    .as_object()?
                    .iter()
                    .filter_map(|(key, value)| value.as_f64().map(|v| (key.clone(), v)))
                    .collect();
                Some((name.clone(), numbers))
            })
            .collect();
        Ok(Self { metrics: parsed })
    }

    /// Record a single value.
    #[must_use]
    pub fn with(mut self, metric: &str, key: &str, value: f64) -> Self {
        self.metrics
            .entry(metric.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        self
    }

    /// Look up `aggregate` for `metric`.
    ///
    /// Rate metrics export their ratio as `value`, so `rate` falls back to
    /// it; percentiles match both `p(95)` and `p(95.0)` spellings.
    #[must_use]
    pub fn aggregate(&self, metric: &str, aggregate: Aggregate) -> Option<f64> {
        let values = self.metrics.get(metric)?;
        match aggregate {
            Aggregate::Rate => values.get("rate").or_else(|| values.get("value")).copied(),
            Aggregate::Percentile(p) => values
                .iter()
                .find(|(key, _)| percentile_key(key).is_some_and(|k| k.to_bits() == p.to_bits()))
                .map(|(_, v)| *v),
            other => values.get(&other.to_string()).copied(),
        }
    }
}

fn percentile_key(key: &str) -> Option<f64> {
    key.strip_prefix("p(")?
        .strip_suffix(')')?
        .trim()
        .parse()
        .ok()
}

/// Outcome of one threshold against a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdVerdict {
    /// Metric the threshold applies to.
    pub metric: String,
    /// Canonical expression.
    pub expression: String,
    /// Observed value, `None` when the summary lacks the aggregate.
    pub observed: Option<f64>,
    /// Whether the threshold held. Missing aggregates fail.
    pub passed: bool,
}

/// Evaluate every threshold in `thresholds` against `summary`.
#[must_use]
pub fn check_thresholds<'a, I>(summary: &MetricSummary, thresholds: I) -> Vec<ThresholdVerdict>
where
    I: IntoIterator<Item = (&'a String, &'a Vec<Threshold>)>,
{
    thresholds
        .into_iter()
        .flat_map(|(metric, list)| {
            list.iter().map(move |threshold| {
                let expr = threshold.expr();
                let outcome = expr.evaluate(summary, metric);
                ThresholdVerdict {
                    metric: metric.clone(),
                    expression: expr.to_string(),
                    observed: outcome.map(|(observed, _)| observed),
                    passed: outcome.is_some_and(|(_, passed)| passed),
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::threshold::{Comparison, p, rate_below};
    use rstest::{fixture, rstest};

    const EXPORT: &str = r#"{
        "root_group": {"name": ""},
        "metrics": {
            "http_req_duration": {"avg": 120.5, "med": 100.0, "p(90)": 250.0, "p(95)": 410.0, "max": 900.0, "thresholds": {"p(95)<500": false}},
            "http_req_failed": {"passes": 3, "fails": 997, "value": 0.003},
            "http_reqs": {"count": 1000, "rate": 33.3}
        }
    }"#;

    #[fixture]
    fn summary() -> MetricSummary {
        MetricSummary::from_json(EXPORT).expect("valid export")
    }

    #[rstest]
    #[case("http_req_duration", Aggregate::Avg, Some(120.5))]
    #[case("http_req_duration", Aggregate::Percentile(95.0), Some(410.0))]
    #[case("http_req_duration", Aggregate::Percentile(99.0), None)]
    #[case("http_req_failed", Aggregate::Rate, Some(0.003))]
    #[case("http_reqs", Aggregate::Rate, Some(33.3))]
    #[case("http_reqs", Aggregate::Count, Some(1000.0))]
    #[case("missing", Aggregate::Avg, None)]
    fn looks_up_aggregates(
        summary: MetricSummary,
        #[case] metric: &str,
        #[case] aggregate: Aggregate,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(summary.aggregate(metric, aggregate), expected);
    }

    #[rstest]
    #[case("{", true)]
    #[case(r#"{"root_group": {}}"#, false)]
    fn rejects_bad_exports(#[case] raw: &str, #[case] is_json_error: bool) {
        let err = MetricSummary::from_json(raw).expect_err("invalid export");
        assert_eq!(matches!(err, SummaryError::Json(_)), is_json_error);
    }

    #[rstest]
    fn checks_thresholds(summary: MetricSummary) {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(
            "http_req_duration".to_owned(),
            vec![
                Threshold::from(p(95.0, Comparison::Lt, 500.0)),
                Threshold::from(p(99.0, Comparison::Lt, 1500.0)),
            ],
        );
        thresholds.insert(
            "http_req_failed".to_owned(),
            vec![Threshold::from(rate_below(0.001))],
        );

        let verdicts = check_thresholds(&summary, &thresholds);
        let outcomes: Vec<(&str, bool)> = verdicts
            .iter()
            .map(|v| (v.expression.as_str(), v.passed))
            .collect();
        assert_eq!(
            outcomes,
            vec![("p(95)<500", true), ("p(99)<1500", false), ("rate<0.001", false)]
        );
        assert_eq!(verdicts.get(1).and_then(|v| v.observed), None);
    }

    #[test]
    fn with_builds_summaries() {
        let summary = MetricSummary::default().with("checks", "value", 1.0);
        assert_eq!(summary.aggregate("checks", Aggregate::Value), Some(1.0));
    }
}
