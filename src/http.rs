//! Shared HTTP agent construction
//!
//! All remote lookups go through one blocking `ureq` agent with a global
//! timeout. Non-2xx statuses are surfaced as responses rather than errors so
//! callers can inspect headers (the GitHub rate-limit protocol needs them).

use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .user_agent(concat!("snakecite/", env!("CARGO_PKG_VERSION")))
        .build()
        .into()
}
