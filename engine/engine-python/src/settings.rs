//! Process-wide configuration and logging setup for the extension module.

use engine_config::{load_config, CentralConfig, CommonConfig};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static SETTINGS: OnceCell<CentralConfig> = OnceCell::new();

/// Configuration loaded on first use and kept for the life of the process
pub fn settings() -> &'static CentralConfig {
    SETTINGS.get_or_init(load_config)
}

/// Install a stderr subscriber filtered by `RUST_LOG` or `common.log_level`.
///
/// Leaves an already installed global subscriber in place.
pub fn init_tracing(common: &CommonConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&common.log_level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
