//! Common test utilities

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("ksz_tailtag=debug"));

        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
