use serde::Serialize;

use crate::collectors::HostFacts;
use crate::identity::HardwareId;

/// One logical inventory row. Field names mirror the datastore columns.
#[derive(Debug, Clone, Serialize)]
pub struct HostRecord {
    pub identifier: String,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub service_tag: String,
    pub cpu_info: String,
    pub gpu_info: String,
    pub ram_info: String,
    pub hdd_info: String,
}

impl HostRecord {
    /// Pure aggregation: collectors have already mapped their failures to
    /// sentinels, so nothing is validated or computed here.
    pub fn assemble(identity: HardwareId, facts: HostFacts) -> Self {
        Self {
            identifier: identity.into_string(),
            hostname: facts.hostname,
            username: facts.username,
            service_tag: facts.service_tag,
            cpu_info: facts.cpu_info,
            gpu_info: facts.gpu_info,
            ram_info: facts.ram_info,
            hdd_info: facts.hdd_info,
        }
    }
}
