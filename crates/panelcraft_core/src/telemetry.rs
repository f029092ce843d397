//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging on stderr.
///
/// Honors `RUST_LOG`; falls back to `info,panelcraft=debug`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_console_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,panelcraft=debug"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
