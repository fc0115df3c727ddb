use tokio::runtime::Runtime;

/// Boundary fetches are shallow, so the default 2MB stack is enough
pub const TOKIO_WORKER_THREADS: usize = 2;

lazy_static! {
    /// Runtime for hosts that render from synchronous code
    pub static ref TOKIO_RUNTIME: Runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("geomap-runtime")
        .enable_all()
        .build()
        .expect("Failed to start the geomap tokio runtime");
}
