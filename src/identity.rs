use std::fmt;

use sysinfo::Networks;
use tracing::debug;

use crate::error::{AppError, Result};

/// Canonical hardware identifier: the machine's link-layer address as
/// lowercase colon-separated hex, e.g. `aa:bb:cc:dd:ee:ff`. This is the
/// primary key of the inventory table, so resolution failure is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareId(String);

impl HardwareId {
    pub fn from_octets(octets: [u8; 6]) -> Self {
        let formatted = octets
            .iter()
            .map(|octet| format!("{octet:02x}"))
            .collect::<Vec<_>>()
            .join(":");
        Self(formatted)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HardwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the hardware address of the first interface (by name, so the choice
/// is stable across runs) that carries a real link-layer address. Loopback
/// and other address-less interfaces report all zeroes and are skipped.
pub fn resolve() -> Result<HardwareId> {
    let networks = Networks::new_with_refreshed_list();

    let mut interfaces: Vec<_> = networks.iter().collect();
    interfaces.sort_by(|a, b| a.0.cmp(b.0));

    for (name, data) in interfaces {
        let mac = data.mac_address();
        if mac.is_unspecified() {
            continue;
        }
        debug!(interface = %name, "selected hardware address source");
        return Ok(HardwareId::from_octets(mac.0));
    }

    Err(AppError::IdentityUnavailable)
}
