pub mod scale;
pub mod schemes;

pub use scale::{color_for, BinnedColorScale, LegendEntry};
