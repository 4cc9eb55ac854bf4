//! Tracing bootstrap for binaries and test harnesses.
//!
//! Library code only emits events; installing a subscriber is left to the
//! process entry point.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"info"` or `"workbench_application=debug"`).
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing("warn");
        assert!(!init_tracing("debug"));
    }
}
