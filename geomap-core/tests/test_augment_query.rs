use geomap_core::error::ErrorKind;
use geomap_core::map_type::{augment_query, build_query, MapType, MAP_TYPE_CATALOG};
use geomap_core::spec::form_data::ChartFormData;
use geomap_core::spec::metric::MetricSpec;
use geomap_core::spec::query::QuerySpec;
use rstest::rstest;
use serde_json::json;

fn full_spec() -> QuerySpec {
    QuerySpec {
        columns: vec!["existing".to_string()],
        latitude: Some("lat".to_string()),
        longitude: Some("lon".to_string()),
        metric: Some(MetricSpec::from("SUM(sales)")),
        region: Some("province".to_string()),
        label_columns: vec!["name".to_string(), "lat".to_string()],
        geo_bounds_url: Some("https://boundaries.example/za.geojson".to_string()),
        geo_label_field: Some("name".to_string()),
        ..Default::default()
    }
}

#[rstest]
#[case(MapType::ClusteringMap, vec!["existing", "lat", "lon", "name"])]
#[case(MapType::HeatMap, vec!["existing", "lat", "lon"])]
#[case(MapType::ChoroplethMap, vec!["existing", "province"])]
#[case(MapType::BubbleMap, vec!["existing", "lat", "lon"])]
fn test_columns_appended(#[case] map_type: MapType, #[case] expected: Vec<&str>) {
    let mut spec = full_spec();
    augment_query(&mut spec, map_type).unwrap();
    assert_eq!(spec.columns, expected);
}

#[rstest]
fn test_augment_is_idempotent(
    #[values(
        MapType::ClusteringMap,
        MapType::HeatMap,
        MapType::ChoroplethMap,
        MapType::BubbleMap
    )]
    map_type: MapType,
) {
    let mut once = full_spec();
    augment_query(&mut once, map_type).unwrap();

    let mut twice = once.clone();
    augment_query(&mut twice, map_type).unwrap();
    assert_eq!(once, twice);
}

#[rstest]
fn test_metric_is_never_a_raw_column(
    #[values(MapType::HeatMap, MapType::ChoroplethMap, MapType::BubbleMap)] map_type: MapType,
) {
    let mut spec = full_spec();
    augment_query(&mut spec, map_type).unwrap();
    assert!(!spec.columns.iter().any(|c| c == "SUM(sales)"));
}

#[rstest]
#[case(MapType::ClusteringMap, "latitude")]
#[case(MapType::HeatMap, "latitude")]
#[case(MapType::BubbleMap, "latitude")]
fn test_missing_latitude(#[case] map_type: MapType, #[case] field: &str) {
    let mut spec = QuerySpec {
        latitude: None,
        ..full_spec()
    };
    let err = augment_query(&mut spec, map_type).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.message(),
        format!("{field} is required for {}", map_type.label())
    );
    assert_eq!(spec.columns, vec!["existing"]);
}

#[rstest]
#[case(QuerySpec { geo_bounds_url: None, ..full_spec() }, "geo_bounds_url")]
#[case(QuerySpec { geo_label_field: Some(String::new()), ..full_spec() }, "geo_label_field")]
#[case(QuerySpec { metric: None, ..full_spec() }, "metric")]
#[case(QuerySpec { region: None, ..full_spec() }, "region")]
fn test_choropleth_missing_fields(#[case] mut spec: QuerySpec, #[case] field: &str) {
    let err = augment_query(&mut spec, MapType::ChoroplethMap).unwrap_err();
    assert_eq!(
        err.message(),
        format!("{field} is required for Choropleth Map")
    );
    assert_eq!(spec.columns, vec!["existing"]);
}

#[test]
fn test_clustering_does_not_need_metric() {
    let mut spec = QuerySpec {
        metric: None,
        ..full_spec()
    };
    augment_query(&mut spec, MapType::ClusteringMap).unwrap();
}

#[test]
fn test_build_query_from_form_data() {
    let form_data: ChartFormData = serde_json::from_value(json!({
        "leafletType": "bubble_map",
        "latitude": "lat",
        "longitude": "lon",
        "metric": {"label": "COUNT(*)", "expressionType": "SIMPLE", "aggregate": "COUNT"},
        "rowLimit": 1000,
        "columns": ["city"]
    }))
    .unwrap();

    let spec = build_query(&form_data).unwrap();
    assert_eq!(spec.columns, vec!["city", "lat", "lon"]);
    assert_eq!(spec.metrics.len(), 1);
    assert_eq!(spec.metrics[0].label(), Some("COUNT(*)"));
    assert_eq!(spec.row_limit, 1000);
}

#[test]
fn test_build_query_unknown_type() {
    let form_data = ChartFormData {
        leaflet_type: "hexbin_map".to_string(),
        ..Default::default()
    };
    let err = build_query(&form_data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.message(), "Unknown map type: hexbin_map");
}

#[test]
fn test_catalog_keys_round_trip_through_lookup() {
    for descriptor in MAP_TYPE_CATALOG.iter() {
        let parsed: MapType = descriptor.key.parse().unwrap();
        assert_eq!(parsed, descriptor.map_type);
        assert_eq!(parsed.key(), descriptor.key);
    }
    assert_eq!(MapType::default(), MapType::ClusteringMap);
}
