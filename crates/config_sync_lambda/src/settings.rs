//! Process-level settings read once at cold start.

use std::time::Duration;

use config_sync_core::deployment::WatchPolicy;

pub const POLL_INTERVAL_VAR: &str = "DEPLOYMENT_POLL_INTERVAL_SECONDS";
pub const WAIT_TIMEOUT_VAR: &str = "DEPLOYMENT_WAIT_TIMEOUT_SECONDS";

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Watch policy with per-field overrides; unparsable or zero values keep the default.
pub fn watch_policy(lookup: &dyn Fn(&str) -> Option<String>) -> WatchPolicy {
    let defaults = WatchPolicy::default();
    WatchPolicy {
        interval: seconds(lookup, POLL_INTERVAL_VAR).unwrap_or(defaults.interval),
        ceiling: seconds(lookup, WAIT_TIMEOUT_VAR).unwrap_or(defaults.ceiling),
    }
}

fn seconds(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    lookup(name)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
}
