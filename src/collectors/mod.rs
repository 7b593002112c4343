pub mod disk;
pub mod hostname;
pub mod platform;
pub mod probe;
pub mod username;

use tracing::warn;

use crate::units::format_gib;
use platform::HardwareProbe;
use probe::ProbeResult;

/// Sentinel for "probed but unavailable", as distinct from a NULL field.
pub const UNKNOWN: &str = "Unknown";

/// Everything the collectors produce for one run, already rendered to the
/// datastore's string shapes. Sentinel mapping happens here, at the
/// collector boundary, so assembly stays pure.
#[derive(Debug, Clone)]
pub struct HostFacts {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub cpu_info: String,
    pub gpu_info: String,
    pub ram_info: String,
    pub service_tag: String,
    pub hdd_info: String,
}

/// Run every collector. The four hardware probes run concurrently; each
/// carries its own error boundary, so one failing cannot affect the others.
pub async fn collect_all(probe: &dyn HardwareProbe) -> HostFacts {
    let (cpu, gpu, memory, service_tag) = tokio::join!(
        probe.cpu(),
        probe.gpu(),
        probe.total_memory_bytes(),
        probe.service_tag(),
    );

    HostFacts {
        hostname: hostname::collect(),
        username: username::collect(),
        cpu_info: cpu.describe(),
        gpu_info: or_unknown("gpu", gpu),
        ram_info: or_unknown("ram", memory.map(format_gib)),
        service_tag: or_unknown("service_tag", service_tag),
        hdd_info: disk::render(&disk::collect()),
    }
}

fn or_unknown(collector: &'static str, result: ProbeResult<String>) -> String {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(collector, error = %err, "probe degraded to Unknown");
            UNKNOWN.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::platform::CpuFacts;
    use super::probe::ProbeError;
    use async_trait::async_trait;

    /// Probe whose GPU query fails while everything else succeeds.
    struct GpuLessProbe;

    #[async_trait]
    impl HardwareProbe for GpuLessProbe {
        async fn cpu(&self) -> CpuFacts {
            CpuFacts {
                model: Some("Test CPU".into()),
                logical_cores: Some(4),
                frequency_mhz: Some(2400),
            }
        }

        async fn gpu(&self) -> ProbeResult<String> {
            Err(ProbeError::unmatched("lspci"))
        }

        async fn total_memory_bytes(&self) -> ProbeResult<u64> {
            Ok(17_179_869_184)
        }

        async fn service_tag(&self) -> ProbeResult<String> {
            Ok("SVC123".into())
        }
    }

    #[tokio::test]
    async fn one_failing_probe_degrades_only_its_own_field() {
        let facts = collect_all(&GpuLessProbe).await;

        assert_eq!(facts.gpu_info, UNKNOWN);
        assert_eq!(facts.cpu_info, "Test CPU (4 cores, 2400 MHz)");
        assert_eq!(facts.ram_info, "16.00 GB");
        assert_eq!(facts.service_tag, "SVC123");
    }

    #[test]
    fn or_unknown_keeps_successful_values() {
        assert_eq!(or_unknown("gpu", Ok("Radeon".into())), "Radeon");
        assert_eq!(
            or_unknown("gpu", Err(ProbeError::Unsupported)),
            UNKNOWN
        );
    }
}
