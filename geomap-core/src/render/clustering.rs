use super::{base_scene, popup_lines, row_position, RenderContext};
use crate::map_type::MapType;
use crate::scene::{Layer, MapScene, Marker, Popup, TileLayer};

/// One marker per row with a valid position, grouped into clusters by the front end
pub(super) fn render(ctx: &RenderContext) -> MapScene {
    let form_data = ctx.form_data;
    let latitude = form_data.latitude.as_deref().unwrap_or_default();
    let longitude = form_data.longitude.as_deref().unwrap_or_default();

    let markers: Vec<_> = ctx
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let position = row_position(i, row, latitude, longitude)?;
            Some(Marker {
                position,
                icon: ctx.options.icon.clone(),
                popup: Popup {
                    title: None,
                    lines: popup_lines(row, &form_data.leaflet_labels),
                },
            })
        })
        .collect();

    log::debug!("Clustering map with {} markers", markers.len());
    base_scene(
        MapType::ClusteringMap,
        ctx,
        TileLayer::open_street_map(),
        Layer::ClusterGroup { markers },
    )
}
