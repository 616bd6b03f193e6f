//! `tracing` subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;

/// Builds the filter for `verbosity`. `RUST_LOG` wins when it is set.
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = verbosity.filter_directive();
        EnvFilter::new(format!(
            "selective_harvester={level},selective_harvest={level}"
        ))
    })
}

/// Installs a stderr fmt subscriber. Calling it twice is harmless.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
