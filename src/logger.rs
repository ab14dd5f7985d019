use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber.
///
/// The level is read from `RUST_LOG`, defaulting to `info`:
/// - RUST_LOG=debug collrun run api.postman_collection.json
/// - RUST_LOG=collrun::script=trace collrun run ...
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    tracing::debug!("Logger initialized");
}
