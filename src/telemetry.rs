//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so stdout stays a clean
/// JSON document.
///
/// Filtering follows `RUST_LOG` and defaults to `warn`. Safe to call more than
/// once; later calls are no-ops.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
