//! Diagnostic tracing.
//!
//! Records, tasks and events are the product output; tracing is for
//! debugging only and always goes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (usually
/// `Config::logging.level`) is used. Output: stderr, compact format.
/// Calling this twice is a no-op.
///
/// # Example
/// ```bash
/// RUST_LOG=breath_core=debug breath-cli exercise run --fast
/// ```
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
