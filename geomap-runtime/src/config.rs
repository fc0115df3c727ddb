use geomap_common::error::{Result, ResultWithContext};
use geomap_core::render::options::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BOUNDARY_CACHE_CAPACITY: usize = 16;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Number of boundary documents kept in memory
    pub boundary_cache_capacity: usize,
    pub request_timeout_secs: u64,
    pub render: RenderOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            boundary_cache_capacity: DEFAULT_BOUNDARY_CACHE_CAPACITY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            render: Default::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read runtime config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to parse runtime config {}", path.display()))
    }
}
