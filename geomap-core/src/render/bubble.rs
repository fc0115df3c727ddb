use super::{base_scene, legend, popup_lines, row_position, RenderContext};
use crate::color::schemes::resolve_palette;
use crate::color::BinnedColorScale;
use crate::data::value::ValueHelpers;
use crate::map_type::MapType;
use crate::scene::{CircleMarker, Layer, MapScene, Popup, PopupLine, TileLayer};

/// Radius of bubbles whose metric is zero or negative
pub const DEFAULT_BUBBLE_RADIUS: f64 = 10.0;
pub const BUBBLE_FILL_OPACITY: f64 = 0.5;

pub(super) fn render(ctx: &RenderContext) -> MapScene {
    let form_data = ctx.form_data;
    let latitude = form_data.latitude.as_deref().unwrap_or_default();
    let longitude = form_data.longitude.as_deref().unwrap_or_default();
    let metric = form_data.metric_label().unwrap_or_default();

    let scale = BinnedColorScale::from_values(
        resolve_palette(form_data.linear_color_scheme.as_deref()),
        ctx.rows.metric_values(metric),
    );

    let markers: Vec<_> = ctx
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let center = row_position(i, row, latitude, longitude)?;
            let value = row.get(metric).to_f64_or_zero();
            let mut lines = vec![PopupLine::new(metric, value.to_string())];
            lines.extend(popup_lines(row, &form_data.groupby));
            Some(CircleMarker {
                center,
                radius: if value > 0.0 { value } else { DEFAULT_BUBBLE_RADIUS },
                color: scale.color_for(value).unwrap_or_default().to_string(),
                fill_opacity: BUBBLE_FILL_OPACITY,
                popup: Popup { title: None, lines },
            })
        })
        .collect();

    let mut scene = base_scene(
        MapType::BubbleMap,
        ctx,
        TileLayer::carto_dark(),
        Layer::CircleMarkers { markers },
    );
    scene.legend = Some(legend(&scale));
    scene
}

#[cfg(test)]
mod tests {
    use crate::data::table::RowTable;
    use crate::render::options::RenderOptions;
    use crate::render::{render_map, BoundaryState, RenderContext};
    use crate::map_type::MapType;
    use crate::scene::Layer;
    use crate::spec::form_data::ChartFormData;
    use crate::viewport::Surface;
    use serde_json::json;

    #[test]
    fn test_bubbles_size_and_color() {
        let form_data: ChartFormData = serde_json::from_value(json!({
            "leaflet_type": "bubble_map",
            "latitude": "lat",
            "longitude": "lon",
            "metric": "count",
            "groupby": ["city"]
        }))
        .unwrap();
        let rows = RowTable::from_json(&json!([
            {"lat": -33.9, "lon": 18.4, "count": 100, "city": "Cape Town"},
            {"lat": -26.2, "lon": 28.0, "count": 0, "city": "Johannesburg"},
            {"lat": "bad", "lon": 31.0, "count": 50, "city": "Durban"}
        ]))
        .unwrap();
        let options = RenderOptions::default();
        let ctx = RenderContext {
            form_data: &form_data,
            rows: &rows,
            boundary: &BoundaryState::NotRequested,
            surface: Surface::new(400, 300),
            options: &options,
        };

        let scene = render_map(MapType::BubbleMap, &ctx);
        let Layer::CircleMarkers { markers } = &scene.layer else {
            panic!("expected circle markers, got {:?}", scene.layer);
        };
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].radius, 100.0);
        assert_eq!(markers[0].color, "#C60076");
        assert_eq!(markers[1].radius, 10.0);
        assert_eq!(markers[1].color, "#F7BC07");
        assert_eq!(markers[0].popup.lines[0].label, "count");
        assert_eq!(markers[0].popup.lines[0].value, "100");
        assert_eq!(markers[0].popup.lines[1].value, "Cape Town");

        let legend = scene.legend.unwrap();
        assert_eq!(legend.title, "Legend");
        assert_eq!(legend.entries.len(), 10);
    }
}
