//! Tracing subscriber setup shared by both binaries

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "painel=info,tower_http=info";

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over `fallback`. Calling this twice is harmless; the
/// second install is ignored.
pub fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
