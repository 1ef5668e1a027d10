//! stderr diagnostics via `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive (e.g. `rpngrid_engine=trace`).
pub const LOG_ENV: &str = "RPNGRID_LOG";

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RPNGRID_LOG` wins over `-v` flags.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
