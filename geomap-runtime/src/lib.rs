#[macro_use]
extern crate lazy_static;

pub mod boundary;
pub mod chart_state;
pub mod config;
#[cfg(feature = "multi-thread")]
pub mod tokio_runtime;
