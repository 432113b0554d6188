use tracing_subscriber::EnvFilter;

/// JSON logs to stdout for CloudWatch; level from `RUST_LOG`, default `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .with_current_span(false)
        .try_init();
}
