use geomap_core::data::table::RowTable;
use geomap_core::geojson::GeoJson;
use geomap_core::render::options::RenderOptions;
use geomap_core::render::{render_chart, BoundaryState, PlaceholderReason, RenderContext};
use geomap_core::scene::{Layer, NoticeLevel, TileLayer};
use geomap_core::spec::form_data::ChartFormData;
use geomap_core::viewport::{LatLng, Surface};
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;

const URL: &str = "https://boundaries.example/wards.geojson";

fn form_data(value: Value) -> ChartFormData {
    serde_json::from_value(value).unwrap()
}

fn city_rows() -> RowTable {
    RowTable::from_json(&json!([
        {"lat": -33.92, "lon": 18.42, "name": "Cape Town", "sales": 120},
        {"lat": -29.85, "lon": 31.02, "name": "Durban", "sales": 80},
        {"lat": null, "lon": 28.04, "name": "Nowhere", "sales": 1}
    ]))
    .unwrap()
}

fn wards() -> GeoJson {
    serde_json::from_value(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"ward": "Ward 1"},
            "geometry": {"type": "Point", "coordinates": [18.4, -33.9]}
        }]
    }))
    .unwrap()
}

fn render(
    form_data: &ChartFormData,
    rows: &RowTable,
    boundary: &BoundaryState,
) -> geomap_core::render::RenderOutcome {
    let options = RenderOptions::default();
    let ctx = RenderContext {
        form_data,
        rows,
        boundary,
        surface: Surface::new(640, 480),
        options: &options,
    };
    render_chart(&ctx)
}

#[test]
fn test_clustering_scene() {
    let form_data = form_data(json!({
        "leaflet_type": "clustering_map",
        "latitude": "lat",
        "longitude": "lon",
        "leaflet_labels": ["name"],
        "viewport_latitude": "-30",
        "viewport_zoom": 5
    }));
    let outcome = render(&form_data, &city_rows(), &BoundaryState::NotRequested);
    let scene = outcome.scene().unwrap();

    assert_eq!(scene.tile_layer, TileLayer::open_street_map());
    assert_eq!(scene.viewport.center, LatLng::new(-30.0, 18.4241));
    assert_eq!(scene.viewport.zoom, 5.0);
    assert!(scene.boundary.is_none());
    assert!(scene.legend.is_none());

    let Layer::ClusterGroup { markers } = &scene.layer else {
        panic!("expected cluster group, got {:?}", scene.layer);
    };
    // The row without a latitude is skipped
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1].position, LatLng::new(-29.85, 31.02));
    assert_eq!(markers[1].popup.lines[0].label, "name");
    assert_eq!(markers[1].popup.lines[0].value, "Durban");
    assert_eq!(markers[0].icon, RenderOptions::default().icon);
}

#[test]
fn test_unknown_map_type_placeholder() {
    let form_data = form_data(json!({"leaflet_type": "hexbin_map"}));
    let outcome = render(&form_data, &city_rows(), &BoundaryState::NotRequested);
    let placeholder = outcome.placeholder().unwrap();
    assert_eq!(placeholder.reason, PlaceholderReason::UnknownMapType);
    assert_eq!(placeholder.message, "Unknown map type");
}

#[rstest]
#[case(
    json!({"leaflet_type": "bubble_map", "latitude": "lat", "longitude": "lon"}),
    "metric is required for Bubble Map"
)]
#[case(
    json!({"leaflet_type": "heat_map", "longitude": "lon", "metric": "sales"}),
    "latitude is required for Heat Map"
)]
#[case(
    json!({"leaflet_type": "choropleth_map", "metric": "sales", "region": "ward"}),
    "geo_bounds_url is required for Choropleth Map"
)]
fn test_configuration_placeholder(#[case] value: Value, #[case] message: &str) {
    let outcome = render(&form_data(value), &city_rows(), &BoundaryState::NotRequested);
    let placeholder = outcome.placeholder().unwrap();
    assert_eq!(placeholder.reason, PlaceholderReason::InvalidConfiguration);
    assert_eq!(placeholder.message, message);
}

#[rstest]
#[case(true, true)]
#[case(false, false)]
fn test_boundary_overlay_follows_show_geo_bounds(#[case] show: bool, #[case] expect_overlay: bool) {
    let form_data = form_data(json!({
        "leaflet_type": "bubble_map",
        "latitude": "lat",
        "longitude": "lon",
        "metric": "sales",
        "geo_bounds_url": URL,
        "geo_label_field": "ward",
        "show_geo_bounds": show
    }));
    let boundary = BoundaryState::Loaded {
        url: URL.to_string(),
        document: Arc::new(wards()),
    };
    let outcome = render(&form_data, &city_rows(), &boundary);
    let scene = outcome.scene().unwrap();

    assert_eq!(scene.boundary.is_some(), expect_overlay);
    if let Some(overlay) = &scene.boundary {
        assert_eq!(overlay.style.color, "blue");
        assert_eq!(overlay.style.weight, 2.0);
        assert_eq!(overlay.style.fill_opacity, 0.1);
        assert_eq!(overlay.popups[0].popup.title.as_deref(), Some("Ward 1"));
    }
    assert_eq!(scene.tile_layer, TileLayer::carto_dark());
}

#[test]
fn test_failed_boundary_keeps_markers() {
    let form_data = form_data(json!({
        "leaflet_type": "clustering_map",
        "latitude": "lat",
        "longitude": "lon",
        "geo_bounds_url": URL,
        "show_geo_bounds": true
    }));
    let boundary = BoundaryState::Failed {
        url: URL.to_string(),
        message: "HTTP error! status: 404".to_string(),
    };
    let outcome = render(&form_data, &city_rows(), &boundary);
    let scene = outcome.scene().unwrap();

    assert!(scene.boundary.is_none());
    assert_eq!(scene.notices.len(), 1);
    assert_eq!(scene.notices[0].level, NoticeLevel::Error);
    assert_eq!(
        scene.notices[0].message,
        "Error loading GeoJSON data: HTTP error! status: 404"
    );
    let Layer::ClusterGroup { markers } = &scene.layer else {
        panic!("expected cluster group");
    };
    assert_eq!(markers.len(), 2);
}

#[test]
fn test_stale_boundary_is_ignored() {
    let form_data = form_data(json!({
        "leaflet_type": "clustering_map",
        "latitude": "lat",
        "longitude": "lon",
        "geo_bounds_url": URL,
        "show_geo_bounds": true
    }));
    let boundary = BoundaryState::Loaded {
        url: "https://boundaries.example/old.geojson".to_string(),
        document: Arc::new(wards()),
    };
    let outcome = render(&form_data, &city_rows(), &boundary);
    assert!(outcome.scene().unwrap().boundary.is_none());
}

#[test]
fn test_scene_serializes_for_the_host() {
    let form_data = form_data(json!({
        "leaflet_type": "bubble_map",
        "latitude": "lat",
        "longitude": "lon",
        "metric": "sales"
    }));
    let outcome = render(&form_data, &city_rows(), &BoundaryState::NotRequested);
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["outcome"], "scene");
    assert_eq!(value["map_type"], "bubble_map");
    assert_eq!(value["layer"]["type"], "circle_markers");
    assert_eq!(value["legend"]["title"], "Legend");
    assert!(value.get("notices").is_none());
}
