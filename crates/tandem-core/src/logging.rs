//! Tracing subscriber setup for binaries and tests.
//!
//! The library itself only emits events; it never installs a global
//! subscriber on its own.

use tracing_subscriber::EnvFilter;

/// Initialize a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init_tracing_subscriber() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}
