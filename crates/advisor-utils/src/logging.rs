//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber with default configuration
///
/// The filter is taken from `RUST_LOG` when set, otherwise `info`.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize tracing with an explicit fallback filter directive
pub fn init_tracing_with_default(default_directive: &str) {
    // try_init so a second call (tests, embedded use) is a no-op
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
