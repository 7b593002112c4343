use async_trait::async_trait;
use tracing::warn;

use super::{CpuFacts, HardwareProbe};
use crate::collectors::probe::{run_command, ProbeError, ProbeResult};

pub(super) struct WindowsProbe;

#[async_trait]
impl HardwareProbe for WindowsProbe {
    async fn cpu(&self) -> CpuFacts {
        let output = match run_command(
            "wmic",
            &[
                "cpu",
                "get",
                "Name,NumberOfLogicalProcessors,MaxClockSpeed",
                "/format:list",
            ],
        )
        .await
        {
            Ok(output) => output,
            Err(err) => {
                warn!(collector = "cpu", error = %err, "cpu probe failed");
                return CpuFacts::default();
            }
        };

        CpuFacts {
            model: parse_list_value(&output, "Name"),
            logical_cores: parse_list_value(&output, "NumberOfLogicalProcessors")
                .and_then(|raw| raw.parse().ok()),
            frequency_mhz: parse_list_value(&output, "MaxClockSpeed")
                .and_then(|raw| raw.parse().ok()),
        }
    }

    async fn gpu(&self) -> ProbeResult<String> {
        let output = run_command(
            "wmic",
            &["path", "Win32_VideoController", "get", "Name", "/format:list"],
        )
        .await?;
        parse_list_value(&output, "Name").ok_or_else(|| ProbeError::unmatched("wmic"))
    }

    async fn total_memory_bytes(&self) -> ProbeResult<u64> {
        let output = run_command("wmic", &["memorychip", "get", "Capacity", "/format:list"]).await?;
        let capacities = parse_list_values(&output, "Capacity");
        if capacities.is_empty() {
            return Err(ProbeError::unmatched("wmic memorychip"));
        }
        // Installed memory is the sum over all modules
        Ok(capacities
            .iter()
            .filter_map(|raw| raw.parse::<u64>().ok())
            .sum())
    }

    async fn service_tag(&self) -> ProbeResult<String> {
        let output = run_command("wmic", &["bios", "get", "SerialNumber", "/format:list"]).await?;
        parse_list_value(&output, "SerialNumber").ok_or_else(|| ProbeError::unmatched("wmic bios"))
    }
}

/// First value for `key` in `Key=Value` list output (wmic /format:list).
/// CRLF line endings and padding are trimmed away.
fn parse_list_value(output: &str, key: &str) -> Option<String> {
    parse_list_values(output, key).into_iter().next()
}

fn parse_list_values(output: &str, key: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (k, v) = line.split_once('=')?;
            if !k.trim().eq_ignore_ascii_case(key) {
                return None;
            }
            let value = v.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}
