//! Scene builders for each map type.
//!
//! Renderers are pure: they read the form data, the result rows and whatever the
//! boundary fetch produced, and return a [`MapScene`]. The renderer for a map type is
//! chosen with an exhaustive match in [`render_map`].

mod bubble;
mod choropleth;
mod clustering;
mod heat;
pub mod options;

use crate::color::{BinnedColorScale, LegendEntry};
use crate::data::table::{Row, RowTable};
use crate::data::value::ValueHelpers;
use crate::error::ErrorKind;
use crate::map_type::{build_query, lookup, MapType};
use crate::scene::{
    BoundaryOverlay, FeaturePopup, Layer, Legend, MapScene, Notice, PathStyle, Popup, PopupLine,
    TileLayer,
};
use crate::spec::form_data::ChartFormData;
use crate::viewport::{LatLng, Surface, Viewport};
use geojson::{Feature, GeoJson};
use options::RenderOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const LEGEND_TITLE: &str = "Legend";
pub const BOUNDARY_ERROR_PREFIX: &str = "Error loading GeoJSON data";
pub const UNKNOWN_MAP_TYPE_MESSAGE: &str = "Unknown map type";

/// What is known about the boundary document when a render runs
#[derive(Debug, Clone, Default)]
pub enum BoundaryState {
    #[default]
    NotRequested,
    Pending {
        url: String,
    },
    Loaded {
        url: String,
        document: Arc<GeoJson>,
    },
    Failed {
        url: String,
        message: String,
    },
}

impl BoundaryState {
    pub fn url(&self) -> Option<&str> {
        match self {
            BoundaryState::NotRequested => None,
            BoundaryState::Pending { url }
            | BoundaryState::Loaded { url, .. }
            | BoundaryState::Failed { url, .. } => Some(url),
        }
    }

    /// The loaded document, but only if it was fetched from `url`
    pub fn document_for(&self, url: &str) -> Option<&GeoJson> {
        match self {
            BoundaryState::Loaded { url: loaded, document } if loaded == url => Some(document),
            _ => None,
        }
    }

    /// The fetch error, but only if it came from `url`
    pub fn error_for(&self, url: &str) -> Option<&str> {
        match self {
            BoundaryState::Failed { url: failed, message } if failed == url => Some(message),
            _ => None,
        }
    }
}

pub struct RenderContext<'a> {
    pub form_data: &'a ChartFormData,
    pub rows: &'a RowTable,
    pub boundary: &'a BoundaryState,
    pub surface: Surface,
    pub options: &'a RenderOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    UnknownMapType,
    InvalidConfiguration,
    Internal,
}

/// Shown instead of a map when the chart cannot be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub reason: PlaceholderReason,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenderOutcome {
    Scene(MapScene),
    Placeholder(Placeholder),
}

impl RenderOutcome {
    pub fn scene(&self) -> Option<&MapScene> {
        match self {
            RenderOutcome::Scene(scene) => Some(scene),
            RenderOutcome::Placeholder(_) => None,
        }
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            RenderOutcome::Scene(_) => None,
            RenderOutcome::Placeholder(placeholder) => Some(placeholder),
        }
    }
}

/// Render a chart, or explain why it cannot be rendered
pub fn render_chart(ctx: &RenderContext) -> RenderOutcome {
    let Some(descriptor) = lookup(&ctx.form_data.leaflet_type) else {
        log::warn!("Unknown map type {:?}", ctx.form_data.leaflet_type);
        return RenderOutcome::Placeholder(Placeholder {
            reason: PlaceholderReason::UnknownMapType,
            message: UNKNOWN_MAP_TYPE_MESSAGE.to_string(),
        });
    };

    if let Err(err) = build_query(ctx.form_data) {
        let reason = match err.kind() {
            ErrorKind::UnknownVariant => PlaceholderReason::UnknownMapType,
            ErrorKind::Configuration => PlaceholderReason::InvalidConfiguration,
            _ => PlaceholderReason::Internal,
        };
        return RenderOutcome::Placeholder(Placeholder {
            reason,
            message: err.message(),
        });
    }

    RenderOutcome::Scene(render_map(descriptor.map_type, ctx))
}

/// Build the scene for a known map type
pub fn render_map(map_type: MapType, ctx: &RenderContext) -> MapScene {
    match map_type {
        MapType::ClusteringMap => clustering::render(ctx),
        MapType::HeatMap => heat::render(ctx),
        MapType::ChoroplethMap => choropleth::render(ctx),
        MapType::BubbleMap => bubble::render(ctx),
    }
}

/// Scene parts every map type shares: viewport, boundary overlay and fetch notices
fn base_scene(
    map_type: MapType,
    ctx: &RenderContext,
    tile_layer: TileLayer,
    layer: Layer,
) -> MapScene {
    let mut notices = Vec::new();
    let mut boundary = None;

    if let Some(url) = ctx.form_data.boundary_url().filter(|_| ctx.form_data.wants_boundary()) {
        if let Some(message) = ctx.boundary.error_for(url) {
            notices.push(Notice::error(format!("{BOUNDARY_ERROR_PREFIX}: {message}")));
        }
        // Choropleth maps draw the document as their own layer
        if map_type != MapType::ChoroplethMap {
            boundary = ctx
                .boundary
                .document_for(url)
                .map(|doc| boundary_overlay(doc, &ctx.form_data.geo_label_field));
        }
    }

    MapScene {
        map_type,
        viewport: Viewport::from_form_data(ctx.form_data, ctx.surface),
        tile_layer,
        boundary,
        layer,
        legend: None,
        notices,
    }
}

fn boundary_overlay(document: &GeoJson, label_field: &str) -> BoundaryOverlay {
    let popups = boundary_features(document)
        .iter()
        .enumerate()
        .filter_map(|(feature_index, feature)| {
            let label = feature_label(feature, label_field)?;
            Some(FeaturePopup {
                feature_index,
                popup: Popup {
                    title: Some(label.to_display_string()),
                    lines: Vec::new(),
                },
            })
        })
        .collect();

    BoundaryOverlay {
        data: document.clone(),
        style: PathStyle {
            color: "blue".to_string(),
            weight: 2.0,
            fill_opacity: 0.1,
            fill_color: None,
        },
        popups,
    }
}

/// Features of a boundary document. A bare geometry becomes one property-less feature.
pub fn boundary_features(document: &GeoJson) -> Vec<Feature> {
    match document {
        GeoJson::FeatureCollection(collection) => collection.features.clone(),
        GeoJson::Feature(feature) => vec![feature.clone()],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry.clone()),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    }
}

/// Value of the label property of a feature, ignoring null and empty labels
fn feature_label<'a>(feature: &'a Feature, label_field: &str) -> Option<&'a Value> {
    if label_field.is_empty() {
        return None;
    }
    feature
        .property(label_field)
        .filter(|v| !v.is_null() && v.as_str() != Some(""))
}

/// Position of a row, or `None` (with a warning) when either coordinate is unusable
fn row_position(index: usize, row: &Row, latitude: &str, longitude: &str) -> Option<LatLng> {
    match (row.get(latitude).to_f64(), row.get(longitude).to_f64()) {
        (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
        _ => {
            log::warn!(
                "Invalid LatLng for item at index {index}: lat={:?}, lng={:?}",
                row.get(latitude),
                row.get(longitude)
            );
            None
        }
    }
}

fn popup_lines(row: &Row, columns: &[String]) -> Vec<PopupLine> {
    columns
        .iter()
        .map(|column| PopupLine::new(column.as_str(), row.get(column).to_display_string()))
        .collect()
}

fn legend(scale: &BinnedColorScale) -> Legend {
    Legend {
        title: LEGEND_TITLE.to_string(),
        entries: scale
            .legend()
            .into_iter()
            .map(|entry| LegendEntry {
                value: entry.value.round(),
                ..entry
            })
            .collect(),
    }
}
