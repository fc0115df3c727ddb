//! Map type catalog
//!
//! The four supported map styles form a closed enum. Each variant has one entry in a
//! static behaviour table holding its capability flags and the rule used to complete a
//! [`QuerySpec`](crate::spec::query::QuerySpec) for it.
//!
//! # Example
//!
//! ```rust,ignore
//! use geomap_core::map_type::{lookup, MapType};
//!
//! let bubble = lookup("bubble_map").unwrap();
//! assert_eq!(bubble.map_type, MapType::BubbleMap);
//! assert!(bubble.capabilities.needs_metric);
//! ```

mod augment;

pub use augment::{augment_query, build_query};

use crate::error::{GeoMapError, Result};
use crate::spec::query::QuerySpec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Enum of all map types for pattern matching and serialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    #[default]
    ClusteringMap,
    HeatMap,
    ChoroplethMap,
    BubbleMap,
}

/// Which inputs a map type consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapTypeCapabilities {
    pub needs_lat_long: bool,
    pub needs_region: bool,
    pub needs_label_field: bool,
    pub needs_metric: bool,
}

/// Rule that validates a query against one map type and appends the columns it needs
pub type AugmentFn = fn(&mut QuerySpec, &MapTypeDescriptor) -> Result<()>;

#[derive(Debug, Clone, Copy)]
pub struct MapTypeDescriptor {
    pub map_type: MapType,
    pub key: &'static str,
    pub label: &'static str,
    pub capabilities: MapTypeCapabilities,
    pub augment: AugmentFn,
}

impl MapTypeDescriptor {
    pub fn augment_query(&self, spec: &mut QuerySpec) -> Result<()> {
        (self.augment)(spec, self)
    }
}

/// The catalog. Order matters: the first entry is the default selection in the
/// settings panel.
pub static MAP_TYPE_CATALOG: [MapTypeDescriptor; 4] = [
    MapTypeDescriptor {
        map_type: MapType::ClusteringMap,
        key: "clustering_map",
        label: "Clustering Map",
        capabilities: MapTypeCapabilities {
            needs_lat_long: true,
            needs_region: false,
            needs_label_field: true,
            needs_metric: false,
        },
        augment: augment::augment_point_query,
    },
    MapTypeDescriptor {
        map_type: MapType::HeatMap,
        key: "heat_map",
        label: "Heat Map",
        capabilities: MapTypeCapabilities {
            needs_lat_long: true,
            needs_region: false,
            needs_label_field: false,
            needs_metric: true,
        },
        augment: augment::augment_point_query,
    },
    MapTypeDescriptor {
        map_type: MapType::ChoroplethMap,
        key: "choropleth_map",
        label: "Choropleth Map",
        capabilities: MapTypeCapabilities {
            needs_lat_long: false,
            needs_region: true,
            needs_label_field: false,
            needs_metric: true,
        },
        augment: augment::augment_region_query,
    },
    MapTypeDescriptor {
        map_type: MapType::BubbleMap,
        key: "bubble_map",
        label: "Bubble Map",
        capabilities: MapTypeCapabilities {
            needs_lat_long: true,
            needs_region: false,
            needs_label_field: false,
            needs_metric: true,
        },
        augment: augment::augment_point_query,
    },
];

/// Find a map type by key. Unknown keys are `None`, never an error.
pub fn lookup(key: &str) -> Option<&'static MapTypeDescriptor> {
    MAP_TYPE_CATALOG.iter().find(|d| d.key == key)
}

impl MapType {
    pub fn descriptor(&self) -> &'static MapTypeDescriptor {
        let index = match self {
            MapType::ClusteringMap => 0,
            MapType::HeatMap => 1,
            MapType::ChoroplethMap => 2,
            MapType::BubbleMap => 3,
        };
        &MAP_TYPE_CATALOG[index]
    }

    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn label(&self) -> &'static str {
        self.descriptor().label
    }

    pub fn capabilities(&self) -> MapTypeCapabilities {
        self.descriptor().capabilities
    }

    /// `(key, label)` pairs in catalog order, for a map type selector
    pub fn choices() -> impl Iterator<Item = (&'static str, &'static str)> {
        MAP_TYPE_CATALOG.iter().map(|d| (d.key, d.label))
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for MapType {
    type Err = GeoMapError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s)
            .map(|d| d.map_type)
            .ok_or_else(|| GeoMapError::unknown_variant(format!("Unknown map type: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_matches_variant() {
        for descriptor in MAP_TYPE_CATALOG.iter() {
            assert_eq!(descriptor.map_type.descriptor().key, descriptor.key);
            assert_eq!(descriptor.map_type.to_string(), descriptor.key);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("heat_map").unwrap().label, "Heat Map");
        assert!(lookup("hexbin_map").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_default_is_first_choice() {
        let (key, label) = MapType::choices().next().unwrap();
        assert_eq!(key, MapType::default().key());
        assert_eq!(label, "Clustering Map");
        assert_eq!(MapType::choices().count(), 4);
    }

    #[test]
    fn test_serde_uses_keys() {
        let value = serde_json::to_value(MapType::ChoroplethMap).unwrap();
        assert_eq!(value, serde_json::json!("choropleth_map"));
        let back: MapType = serde_json::from_value(value).unwrap();
        assert_eq!(back, MapType::ChoroplethMap);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "pie_map".parse::<MapType>().unwrap_err();
        assert_eq!(err.message(), "Unknown map type: pie_map");
    }
}
