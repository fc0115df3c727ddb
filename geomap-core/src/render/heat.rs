use super::{base_scene, popup_lines, row_position, RenderContext};
use crate::data::value::ValueHelpers;
use crate::map_type::MapType;
use crate::scene::{
    HeatLayer, HeatLayerOptions, HeatPoint, Layer, MapScene, Popup, PopupLine, TileLayer,
};

pub(super) fn render(ctx: &RenderContext) -> MapScene {
    let form_data = ctx.form_data;
    let heat = &ctx.options.heat;
    let latitude = form_data.latitude.as_deref().unwrap_or_default();
    let longitude = form_data.longitude.as_deref().unwrap_or_default();
    let metric = form_data.metric_label().unwrap_or_default();
    let intensity_label = format!("Intensity - {metric}");

    let points: Vec<_> = ctx
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let position = row_position(i, row, latitude, longitude)?;
            let intensity = row.get(metric).to_f64_or_zero();
            let mut lines = vec![PopupLine::new(intensity_label.as_str(), intensity.to_string())];
            lines.extend(popup_lines(row, &form_data.groupby));
            Some(HeatPoint {
                position,
                intensity,
                popup: Popup { title: None, lines },
            })
        })
        .collect();

    let max = average_intensity(&points) * heat.intensity_scale;
    log::debug!("Heat map with {} points, max intensity {max}", points.len());

    let layer = HeatLayer {
        points,
        options: HeatLayerOptions {
            radius: heat.radius,
            blur: heat.blur,
            max_zoom: heat.max_zoom,
            max,
        },
        click_threshold: heat.click_threshold,
    };
    base_scene(MapType::HeatMap, ctx, TileLayer::open_street_map(), Layer::Heat(layer))
}

fn average_intensity(points: &[HeatPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.intensity).sum::<f64>() / points.len() as f64
}
