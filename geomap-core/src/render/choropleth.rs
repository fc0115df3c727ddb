use super::{base_scene, boundary_features, feature_label, legend, popup_lines, RenderContext};
use crate::color::schemes::resolve_palette;
use crate::color::BinnedColorScale;
use crate::data::value::ValueHelpers;
use crate::map_type::MapType;
use crate::scene::{ChoroplethFeature, Layer, MapScene, PathStyle, Popup, PopupLine, TileLayer};

/// Fill of regions without a matching row
pub const NO_DATA_COLOR: &str = "#ccc";

/// Regions of the boundary document filled by the metric of the row whose region
/// column equals the feature's label property
pub(super) fn render(ctx: &RenderContext) -> MapScene {
    let form_data = ctx.form_data;
    let metric = form_data.metric_label().unwrap_or_default();
    let region = form_data.region.as_deref().unwrap_or_default();
    let label_field = form_data.geo_label_field.as_str();

    let scale = BinnedColorScale::from_values(
        resolve_palette(form_data.linear_color_scheme.as_deref()),
        ctx.rows.metric_values(metric),
    );

    let document = form_data
        .boundary_url()
        .and_then(|url| ctx.boundary.document_for(url));

    let features: Vec<_> = document
        .map(boundary_features)
        .unwrap_or_default()
        .into_iter()
        .map(|feature| {
            let label = feature_label(&feature, label_field).cloned();
            let row = label
                .as_ref()
                .and_then(|label| ctx.rows.find_row(region, label));
            let metric_value = row.and_then(|row| row.get(metric));

            let fill_color = match metric_value {
                Some(value) => scale
                    .color_for(value.to_f64_or_zero())
                    .unwrap_or(NO_DATA_COLOR),
                None => NO_DATA_COLOR,
            };

            let popup = row.map(|row| {
                let mut lines = popup_lines(row, &form_data.groupby);
                lines.push(PopupLine::new(
                    format!("Value - {metric}"),
                    metric_value.to_display_string(),
                ));
                Popup {
                    title: label.as_ref().map(|l| l.to_display_string()),
                    lines,
                }
            });

            ChoroplethFeature {
                feature,
                style: PathStyle {
                    color: "black".to_string(),
                    weight: 1.0,
                    fill_opacity: 0.7,
                    fill_color: Some(fill_color.to_string()),
                },
                popup,
            }
        })
        .collect();

    if document.is_none() {
        log::debug!("Choropleth map has no boundary document yet");
    }

    let mut scene = base_scene(
        MapType::ChoroplethMap,
        ctx,
        TileLayer::open_street_map(),
        Layer::Choropleth { features },
    );
    scene.legend = Some(legend(&scale));
    scene
}
