/// Initializes structured logging for the engine.
///
/// Filtering is controlled through the `RUST_LOG` environment variable:
/// - `RUST_LOG=info` - store lifecycle and write operations
/// - `RUST_LOG=debug` - every store read and catalog round trip
/// - `RUST_LOG=order_engine=debug` - debug only for this crate
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
