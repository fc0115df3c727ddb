use crate::spec::form_data::ChartFormData;
use serde::{Deserialize, Serialize};

// Cape Town
pub const DEFAULT_LATITUDE: f64 = -33.9249;
pub const DEFAULT_LONGITUDE: f64 = 18.4241;
pub const DEFAULT_ZOOM: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar distance in degrees
    pub fn distance(&self, other: &LatLng) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)).sqrt()
    }
}

/// Pixel size of the surface the host draws into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn from_form_data(form_data: &ChartFormData, surface: Surface) -> Self {
        Self {
            center: LatLng::new(
                form_data.viewport_latitude.unwrap_or(DEFAULT_LATITUDE),
                form_data.viewport_longitude.unwrap_or(DEFAULT_LONGITUDE),
            ),
            zoom: form_data.viewport_zoom.unwrap_or(DEFAULT_ZOOM),
            width: surface.width,
            height: surface.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_cape_town() {
        let viewport = Viewport::from_form_data(&ChartFormData::default(), Surface::new(800, 600));
        assert_eq!(viewport.center, LatLng::new(-33.9249, 18.4241));
        assert_eq!(viewport.zoom, 11.0);
        assert_eq!((viewport.width, viewport.height), (800, 600));
    }

    #[test]
    fn test_only_missing_coordinate_is_defaulted() {
        let form_data = ChartFormData {
            viewport_latitude: Some(51.5),
            viewport_zoom: Some(4.0),
            ..Default::default()
        };
        let viewport = Viewport::from_form_data(&form_data, Surface::new(1, 1));
        assert_eq!(viewport.center, LatLng::new(51.5, 18.4241));
        assert_eq!(viewport.zoom, 4.0);
    }
}
