//! Event identifiers for audit records.
//!
//! An id is `<microseconds>:<hostname>:<pid>`. Two ids requested within the
//! same microsecond by the same process collide.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static HOSTNAME: OnceLock<String> = OnceLock::new();

/// Host name of this machine, resolved once. Falls back to `localhost`.
pub fn hostname() -> &'static str {
    HOSTNAME.get_or_init(|| system_hostname().unwrap_or_else(|| "localhost".to_string()))
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
}

/// Current wall-clock time in microseconds since the Unix epoch.
pub fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

/// Build an event id, using the current time when `event_time` is `None`.
pub fn new_event_id(event_time: Option<u64>) -> String {
    let micros = event_time.unwrap_or_else(now_micros);
    format!("{}:{}:{}", micros, hostname(), std::process::id())
}
