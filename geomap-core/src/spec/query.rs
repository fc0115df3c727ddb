use crate::spec::form_data::{non_empty, ChartFormData, DEFAULT_ROW_LIMIT};
use crate::spec::metric::MetricSpec;
use serde::{Deserialize, Serialize};

/// The columns and field selections of one chart query.
///
/// Created per render from [`ChartFormData`], completed once by
/// [`augment_query`](crate::map_type::augment_query) and dropped after the query runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Raw columns to fetch. Never holds duplicates.
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groupby: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_columns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_bounds_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_label_field: Option<String>,

    pub row_limit: u32,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            metrics: Vec::new(),
            groupby: Vec::new(),
            latitude: None,
            longitude: None,
            metric: None,
            region: None,
            label_columns: Vec::new(),
            geo_bounds_url: None,
            geo_label_field: None,
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl QuerySpec {
    pub fn from_form_data(form_data: &ChartFormData) -> Self {
        let mut spec = Self {
            latitude: form_data.latitude.clone(),
            longitude: form_data.longitude.clone(),
            metric: form_data.metric.clone(),
            region: form_data.region.clone(),
            label_columns: form_data.leaflet_labels.clone(),
            groupby: form_data.groupby.clone(),
            geo_bounds_url: form_data.geo_bounds_url.clone(),
            geo_label_field: Some(form_data.geo_label_field.clone()),
            row_limit: form_data.row_limit,
            ..Default::default()
        };
        spec.add_columns(form_data.columns.iter().map(String::as_str));
        spec
    }

    /// Append columns, skipping empty names and names already present
    pub fn add_columns<'a, I>(&mut self, columns: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for column in columns {
            if !column.is_empty() && !self.columns.iter().any(|c| c == column) {
                self.columns.push(column.to_string());
            }
        }
    }

    pub fn latitude(&self) -> Option<&str> {
        non_empty(self.latitude.as_deref())
    }

    pub fn longitude(&self) -> Option<&str> {
        non_empty(self.longitude.as_deref())
    }

    pub fn metric_label(&self) -> Option<&str> {
        self.metric.as_ref().and_then(|m| m.label())
    }

    pub fn region(&self) -> Option<&str> {
        non_empty(self.region.as_deref())
    }

    pub fn geo_bounds_url(&self) -> Option<&str> {
        non_empty(self.geo_bounds_url.as_deref())
    }

    pub fn geo_label_field(&self) -> Option<&str> {
        non_empty(self.geo_label_field.as_deref())
    }
}
