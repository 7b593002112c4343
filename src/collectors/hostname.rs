use sysinfo::System;
use tracing::warn;

/// OS-reported hostname; `None` (stored as NULL) when unavailable.
pub fn collect() -> Option<String> {
    let hostname = System::host_name();
    if hostname.is_none() {
        warn!(collector = "hostname", "hostname unavailable");
    }
    hostname
}
