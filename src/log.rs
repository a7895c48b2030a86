// src/log.rs
//
// Logging goes through `tracing`; the short macros below are what the rest of
// the crate calls. `init` installs a stderr subscriber once per process.

use tracing_subscriber::{EnvFilter, fmt};

#[doc(hidden)]
pub use tracing;

const DEFAULT_FILTER: &str = "vpn_scrape=info,warn";
const VERBOSE_FILTER: &str = "vpn_scrape=debug,info";

/// Install the global subscriber. `RUST_LOG` wins unless `verbose` is set.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::tracing::error!($($arg)*)
    };
}
