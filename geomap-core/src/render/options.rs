use serde::{Deserialize, Serialize};

/// Marker icon used by the clustering map. Passed into every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconConfig {
    pub icon_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_url: Option<String>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            icon_url: "leaflet/dist/images/marker-icon.png".to_string(),
            shadow_url: Some("leaflet/dist/images/marker-shadow.png".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub radius: f64,
    pub blur: f64,
    pub max_zoom: u32,
    /// The layer's maximum intensity is the average point intensity times this factor
    pub intensity_scale: f64,
    /// Degrees within which a click selects the nearest point
    pub click_threshold: f64,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            radius: 10.0,
            blur: 5.0,
            max_zoom: 17,
            intensity_scale: 1.25,
            click_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub icon: IconConfig,
    pub heat: HeatmapOptions,
}
