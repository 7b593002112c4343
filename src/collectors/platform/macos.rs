use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{CpuFacts, HardwareProbe};
use crate::collectors::probe::{run_command, ProbeError, ProbeResult};

static CHIPSET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Chipset Model:\s*(.+)").unwrap());
static SERIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Serial Number \(system\):\s*(.+)").unwrap());

pub(super) struct MacProbe;

#[async_trait]
impl HardwareProbe for MacProbe {
    async fn cpu(&self) -> CpuFacts {
        let model = sysctl_value("machdep.cpu.brand_string").await;
        let logical_cores = sysctl_value("hw.logicalcpu")
            .await
            .and_then(|raw| raw.parse::<u32>().ok());
        // hw.cpufrequency reports Hz and is absent on Apple Silicon
        let frequency_mhz = sysctl_value("hw.cpufrequency")
            .await
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(|hz| (hz / 1_000_000) as u32);

        CpuFacts {
            model,
            logical_cores,
            frequency_mhz,
        }
    }

    async fn gpu(&self) -> ProbeResult<String> {
        let output = run_command("system_profiler", &["SPDisplaysDataType"]).await?;
        parse_chipset_model(&output).ok_or_else(|| ProbeError::unmatched("system_profiler"))
    }

    async fn total_memory_bytes(&self) -> ProbeResult<u64> {
        let raw = run_command("sysctl", &["-n", "hw.memsize"]).await?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| ProbeError::unmatched("sysctl hw.memsize"))
    }

    async fn service_tag(&self) -> ProbeResult<String> {
        let output = run_command("system_profiler", &["SPHardwareDataType"]).await?;
        parse_system_serial(&output).ok_or_else(|| ProbeError::unmatched("system_profiler"))
    }
}

async fn sysctl_value(key: &str) -> Option<String> {
    match run_command("sysctl", &["-n", key]).await {
        Ok(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Err(err) => {
            warn!(collector = "cpu", key, error = %err, "sysctl query failed");
            None
        }
    }
}

fn parse_chipset_model(profiler: &str) -> Option<String> {
    CHIPSET_RE
        .captures(profiler)
        .map(|caps| caps[1].trim().to_string())
}

fn parse_system_serial(profiler: &str) -> Option<String> {
    SERIAL_RE
        .captures(profiler)
        .map(|caps| caps[1].trim().to_string())
}
