//! Logging initialization

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::build_info;

static INIT: Once = Once::new();

/// Installs the global tracing subscriber. Filtering follows `RUST_LOG`,
/// defaulting to `info`. Safe to call more than once; only the first call
/// installs anything.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
        info!(build = %build_info::version_string(), "logging initialized");
    });
}
