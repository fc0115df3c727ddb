use crate::map_type::MapType;
use crate::spec::metric::MetricSpec;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_ROW_LIMIT: u32 = 10000;
pub const ROW_LIMIT_CHOICES: [u32; 5] = [10, 1000, 10000, 50000, 100000];

/// Chart options chosen by the user in the host's settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFormData {
    #[serde(default = "default_map_type_key", alias = "leafletType")]
    pub leaflet_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,

    #[serde(default, alias = "leafletLabels", skip_serializing_if = "Vec::is_empty")]
    pub leaflet_labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groupby: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, alias = "geoBoundsUrl", skip_serializing_if = "Option::is_none")]
    pub geo_bounds_url: Option<String>,

    #[serde(default, alias = "geoLabelField")]
    pub geo_label_field: String,

    #[serde(default, alias = "showGeoBounds")]
    pub show_geo_bounds: bool,

    #[serde(
        default,
        alias = "viewportLatitude",
        deserialize_with = "deserialize_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub viewport_latitude: Option<f64>,

    #[serde(
        default,
        alias = "viewportLongitude",
        deserialize_with = "deserialize_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub viewport_longitude: Option<f64>,

    #[serde(
        default,
        alias = "viewportZoom",
        deserialize_with = "deserialize_lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub viewport_zoom: Option<f64>,

    #[serde(default = "default_row_limit", alias = "rowLimit")]
    pub row_limit: u32,

    #[serde(default, alias = "linearColorScheme", skip_serializing_if = "Option::is_none")]
    pub linear_color_scheme: Option<String>,

    /// Columns the host already plans to fetch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for ChartFormData {
    fn default() -> Self {
        Self {
            leaflet_type: default_map_type_key(),
            metric: None,
            latitude: None,
            longitude: None,
            leaflet_labels: Vec::new(),
            groupby: Vec::new(),
            region: None,
            geo_bounds_url: None,
            geo_label_field: String::new(),
            show_geo_bounds: false,
            viewport_latitude: None,
            viewport_longitude: None,
            viewport_zoom: None,
            row_limit: DEFAULT_ROW_LIMIT,
            linear_color_scheme: None,
            columns: Vec::new(),
            extra: Default::default(),
        }
    }
}

impl ChartFormData {
    pub fn metric_label(&self) -> Option<&str> {
        self.metric.as_ref().and_then(|m| m.label())
    }

    /// Boundary URL, if one was entered
    pub fn boundary_url(&self) -> Option<&str> {
        non_empty(self.geo_bounds_url.as_deref())
    }

    /// Whether this chart needs the boundary document. Choropleth maps always do because
    /// the document is their geometry; the others only draw it as an optional overlay.
    pub fn wants_boundary(&self) -> bool {
        if self.boundary_url().is_none() {
            return false;
        }
        match self.leaflet_type.parse::<MapType>() {
            Ok(MapType::ChoroplethMap) => true,
            _ => self.show_geo_bounds,
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_map_type_key() -> String {
    MapType::default().key().to_string()
}

fn default_row_limit() -> u32 {
    DEFAULT_ROW_LIMIT
}

/// Viewport settings come from free-text controls, so accept numbers, numeric strings,
/// null and empty strings.
fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a number, found {other}"
        ))),
    }
}
