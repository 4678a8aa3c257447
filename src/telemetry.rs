//! Structured logging setup (ambient stack), grounded on the teacher's own
//! JSON `tracing` initialization.

use std::sync::OnceLock;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install a global JSON `tracing` subscriber, once per process. Level is
/// controlled by `RUST_LOG` (defaulting to `info`) via `EnvFilter`.
///
/// Safe to call more than once (from tests or repeated library entry
/// points); only the first call takes effect.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_env_filter(filter)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
