//! Logging setup for the Duet binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter (checked before `RUST_LOG`)
pub const LOG_ENV: &str = "DUET_LOG";

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the given crates plus the binary itself. `DUET_LOG`,
/// then `RUST_LOG`, take precedence when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "duet-server", "duet-client")
/// * `crates` - Library crates whose logs should follow `default_log_level`
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use duet_shared::logger::setup_logger;
///
/// setup_logger("duet-server", &["duet_server"], "debug");
/// ```
pub fn setup_logger(binary_name: &str, crates: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| default_filter(binary_name, crates, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the `EnvFilter` directive string used when no filter variable is set.
pub fn default_filter(binary_name: &str, crates: &[&str], default_log_level: &str) -> String {
    std::iter::once(binary_name)
        .chain(crates.iter().copied())
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .chain(std::iter::once("tower_http=info".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}
