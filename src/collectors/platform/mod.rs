mod linux;
mod macos;
mod windows;

use async_trait::async_trait;
use tracing::warn;

use super::probe::{ProbeError, ProbeResult};
use super::UNKNOWN;

/// CPU sub-fields, each independently optional: a miss on one leaves the
/// other two intact.
#[derive(Debug, Clone, Default)]
pub struct CpuFacts {
    pub model: Option<String>,
    pub logical_cores: Option<u32>,
    pub frequency_mhz: Option<u32>,
}

impl CpuFacts {
    /// `<model> (<cores> cores, <freq>)`, with `Unknown` per missing part.
    pub fn describe(&self) -> String {
        let model = self.model.as_deref().unwrap_or(UNKNOWN);
        let cores = self
            .logical_cores
            .map(|c| c.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let frequency = self
            .frequency_mhz
            .map(|mhz| format!("{mhz} MHz"))
            .unwrap_or_else(|| UNKNOWN.to_string());
        format!("{model} ({cores} cores, {frequency})")
    }
}

/// OS-specific hardware queries. One implementation per platform family,
/// selected exactly once at startup.
#[async_trait]
pub trait HardwareProbe: Send + Sync {
    async fn cpu(&self) -> CpuFacts;
    async fn gpu(&self) -> ProbeResult<String>;
    async fn total_memory_bytes(&self) -> ProbeResult<u64>;
    async fn service_tag(&self) -> ProbeResult<String>;
}

pub fn detect() -> Box<dyn HardwareProbe> {
    match std::env::consts::OS {
        "linux" => Box::new(linux::LinuxProbe),
        "macos" => Box::new(macos::MacProbe),
        "windows" => Box::new(windows::WindowsProbe),
        other => {
            warn!(os = other, "unrecognized platform, hardware probes disabled");
            Box::new(UnknownProbe)
        }
    }
}

/// Fallback for platforms without a probe: every OS-dependent field
/// degrades to its sentinel instead of failing the collection.
pub struct UnknownProbe;

#[async_trait]
impl HardwareProbe for UnknownProbe {
    async fn cpu(&self) -> CpuFacts {
        CpuFacts::default()
    }

    async fn gpu(&self) -> ProbeResult<String> {
        Err(ProbeError::Unsupported)
    }

    async fn total_memory_bytes(&self) -> ProbeResult<u64> {
        Err(ProbeError::Unsupported)
    }

    async fn service_tag(&self) -> ProbeResult<String> {
        Err(ProbeError::Unsupported)
    }
}
