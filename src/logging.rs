//! Log output for the browser process.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Directives used when `RUST_LOG` is unset. `js` carries page console output.
pub const DEFAULT_DIRECTIVES: &str = "clowbrowser=info,js=info";

/// Installs the global subscriber. Returns false if one was already set.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
