//! Tracing subscriber setup.

use crate::config::EngineConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over [`EngineConfig::log_filter`]. Returns
/// `false` if a global subscriber was already installed.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing(&EngineConfig::default());
        assert!(!init_tracing(&EngineConfig::default()));
    }
}
