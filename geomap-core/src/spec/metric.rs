use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A metric selection. The host sends either a saved metric name or an ad-hoc metric
/// object; either way the result column is named by the metric's label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricSpec {
    Named(String),
    Adhoc(AdhocMetricSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhocMetricSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "expressionType", skip_serializing_if = "Option::is_none")]
    pub expression_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl MetricSpec {
    /// Name of the result column that holds this metric
    pub fn label(&self) -> Option<&str> {
        let label = match self {
            MetricSpec::Named(name) => Some(name.as_str()),
            MetricSpec::Adhoc(adhoc) => adhoc.label.as_deref(),
        };
        label.filter(|l| !l.is_empty())
    }

    pub fn is_set(&self) -> bool {
        self.label().is_some()
    }
}

impl From<&str> for MetricSpec {
    fn from(name: &str) -> Self {
        MetricSpec::Named(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_metric() {
        let metric: MetricSpec = serde_json::from_value(json!("sales")).unwrap();
        assert_eq!(metric.label(), Some("sales"));
    }

    #[test]
    fn test_adhoc_metric_uses_label() {
        let metric: MetricSpec = serde_json::from_value(json!({
            "expressionType": "SIMPLE",
            "aggregate": "SUM",
            "column": {"column_name": "sales"},
            "label": "SUM(sales)"
        }))
        .unwrap();
        assert_eq!(metric.label(), Some("SUM(sales)"));
        assert!(metric.is_set());
    }

    #[test]
    fn test_empty_metric_is_unset() {
        assert!(!MetricSpec::from("").is_set());
        let metric: MetricSpec = serde_json::from_value(json!({"aggregate": "SUM"})).unwrap();
        assert!(!metric.is_set());
    }
}
