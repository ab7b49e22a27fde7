//! Tracing setup and small helpers.

use tracing_subscriber::EnvFilter;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Default filter for a `-v` count: warn, info, debug, then trace.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber once. `RUST_LOG` wins over the verbosity default.
pub fn init_tracing_once(verbose: u8) {
    INIT_ONCE.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Last path segment of an object key, for compact log fields.
pub fn key_basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}
