//! Logger setup. `RUST_LOG` wins over the configured level.

use std::sync::OnceLock;

use env_logger::Env;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Initialize the global logger once; later calls are ignored.
pub fn init(default_level: &str) {
    LOGGER_INIT.get_or_init(|| {
        let env = Env::default().default_filter_or(default_level);
        // A logger installed by someone else is fine.
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp_millis()
            .try_init();
    });
}
