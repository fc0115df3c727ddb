//! Declarative description of one rendered map.
//!
//! A [`MapScene`] is everything a tile-map front end needs to draw a chart: where to
//! look, which tiles to use, the optional boundary overlay, the data layer and the
//! legend. It serializes to JSON so it can cross into the host unchanged.

use crate::color::LegendEntry;
use crate::error::Result;
use crate::map_type::MapType;
use crate::render::options::IconConfig;
use crate::viewport::{LatLng, Viewport};
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub map_type: MapType,
    pub viewport: Viewport,
    pub tile_layer: TileLayer,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryOverlay>,

    pub layer: Layer,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,

    /// Messages shown inline next to the map, e.g. a failed boundary fetch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl MapScene {
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn open_street_map() -> Self {
        Self {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }

    pub fn carto_dark() -> Self {
        Self {
            url: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.carto.com/attributions\">CARTO</a>"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub lines: Vec<PopupLine>,
}

impl Popup {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupLine {
    pub label: String,
    pub value: String,
}

impl PopupLine {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePopup {
    pub feature_index: usize,
    pub popup: Popup,
}

/// The boundary document drawn on top of the tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryOverlay {
    pub data: GeoJson,
    pub style: PathStyle,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub popups: Vec<FeaturePopup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    ClusterGroup { markers: Vec<Marker> },
    CircleMarkers { markers: Vec<CircleMarker> },
    Heat(HeatLayer),
    Choropleth { features: Vec<ChoroplethFeature> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: LatLng,
    pub icon: IconConfig,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub center: LatLng,
    pub radius: f64,
    pub color: String,
    pub fill_opacity: f64,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub position: LatLng,
    pub intensity: f64,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLayerOptions {
    pub radius: f64,
    pub blur: f64,
    pub max_zoom: u32,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLayer {
    pub points: Vec<HeatPoint>,
    pub options: HeatLayerOptions,
    /// Clicks further than this many degrees from every point open no popup
    pub click_threshold: f64,
}

impl HeatLayer {
    /// Point closest to a click, if it lies within the click threshold
    pub fn nearest_point(&self, click: LatLng) -> Option<&HeatPoint> {
        self.points
            .iter()
            .map(|p| (p, p.position.distance(&click)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .filter(|(_, distance)| *distance < self.click_threshold)
            .map(|(p, _)| p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethFeature {
    pub feature: Feature,
    pub style: PathStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<Popup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}
