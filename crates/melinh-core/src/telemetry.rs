//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(default_filter: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!("MeLinh core v{} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
