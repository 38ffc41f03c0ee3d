//! Tracing subscriber setup
//!
//! Log output goes to stderr so lookup results on stdout stay parseable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a verbosity level when `RUST_LOG` is unset
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "info,lfhff=debug",
        (false, true) => "error",
        (false, false) => "warn,lfhff=info",
    }
}

/// Initialize the global subscriber.
///
/// Must be called once at startup; later calls are ignored.
pub fn init(verbose: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(false)
        .with_line_number(false);

    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
