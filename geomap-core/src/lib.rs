#[macro_use]
extern crate lazy_static;

pub mod color;
pub mod map_type;
pub mod render;
pub mod scene;
pub mod spec;
pub mod viewport;

pub use geomap_common::{data, error};
pub use geojson;
