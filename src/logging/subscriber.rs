//! Tracing subscriber setup for binaries.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_directive`
/// when the variable is unset. Calling it again is a no-op.
///
/// Plugin loggers all share one tracing target, so directives apply to every
/// plugin at once; use logger levels to quiet or raise a single plugin.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
