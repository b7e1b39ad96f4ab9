//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the binary's own target, the server
/// library and `tower_http` log at `default_level`.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    let mut targets = vec![bin_target.as_str(), "roomrelay_server", "tower_http"];
    targets.dedup();
    targets
        .iter()
        .map(|target| format!("{target}={default_level}"))
        .collect::<Vec<_>>()
        .join(",")
}
