use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter when RUST_LOG is not set
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Initialize logging to stderr, keeping stdout for the report.
///
/// Behavior:
/// - If RUST_LOG is set, it is used as the filter.
/// - Otherwise fall back to [`default_filter`].
pub fn setup_logging() {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_filter()), false),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();

    if !from_env {
        tracing::debug!("RUST_LOG not set, using default: {}", default_filter());
    }
}
