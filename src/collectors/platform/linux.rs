use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::{CpuFacts, HardwareProbe};
use crate::collectors::probe::{read_source, run_command, ProbeError, ProbeResult};

const CPUINFO: &str = "/proc/cpuinfo";
const MEMINFO: &str = "/proc/meminfo";
// product_serial usually needs root; the virtual path is the fallback some
// kernels expose instead
const DMI_SERIAL_PATHS: [&str; 2] = [
    "/sys/class/dmi/id/product_serial",
    "/sys/devices/virtual/dmi/id/product_serial",
];

static CPU_MODEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"model name\s*:\s*(.+)").unwrap());
static CPU_MHZ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"cpu MHz\s*:\s*([\d.]+)").unwrap());
static VGA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"VGA compatible controller:\s*(.+)").unwrap());
static MEM_TOTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"MemTotal:\s*(\d+)\s*kB").unwrap());

pub(super) struct LinuxProbe;

#[async_trait]
impl HardwareProbe for LinuxProbe {
    async fn cpu(&self) -> CpuFacts {
        let cpuinfo = match read_source(CPUINFO).await {
            Ok(contents) => contents,
            Err(err) => {
                warn!(collector = "cpu", error = %err, "cpu probe failed");
                return CpuFacts::default();
            }
        };

        CpuFacts {
            model: parse_model(&cpuinfo),
            logical_cores: parse_logical_cores(&cpuinfo),
            frequency_mhz: parse_frequency_mhz(&cpuinfo),
        }
    }

    async fn gpu(&self) -> ProbeResult<String> {
        let output = run_command("lspci", &[]).await?;
        parse_vga_controller(&output).ok_or_else(|| ProbeError::unmatched("lspci"))
    }

    async fn total_memory_bytes(&self) -> ProbeResult<u64> {
        let meminfo = read_source(MEMINFO).await?;
        parse_mem_total_kb(&meminfo)
            .map(|kb| kb * 1024)
            .ok_or_else(|| ProbeError::unmatched(MEMINFO))
    }

    async fn service_tag(&self) -> ProbeResult<String> {
        let mut last_err = ProbeError::unmatched("dmi product_serial");
        for path in DMI_SERIAL_PATHS {
            match read_source(path).await {
                Ok(raw) => {
                    let trimmed = raw.trim();
                    if !trimmed.is_empty() {
                        return Ok(trimmed.to_string());
                    }
                }
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }
}

fn parse_model(cpuinfo: &str) -> Option<String> {
    CPU_MODEL_RE
        .captures(cpuinfo)
        .map(|caps| caps[1].trim().to_string())
}

fn parse_logical_cores(cpuinfo: &str) -> Option<u32> {
    let count = cpuinfo
        .lines()
        .filter(|line| line.starts_with("processor"))
        .count() as u32;
    (count > 0).then_some(count)
}

fn parse_frequency_mhz(cpuinfo: &str) -> Option<u32> {
    CPU_MHZ_RE
        .captures(cpuinfo)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|mhz| mhz.round() as u32)
}

fn parse_vga_controller(lspci: &str) -> Option<String> {
    VGA_RE
        .captures(lspci)
        .map(|caps| caps[1].trim().to_string())
}

fn parse_mem_total_kb(meminfo: &str) -> Option<u64> {
    MEM_TOTAL_RE
        .captures(meminfo)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz
cpu MHz\t\t: 2600.000
cache size\t: 12288 KB

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz
cpu MHz\t\t: 2208.004
";

    const SAMPLE_LSPCI: &str = "\
00:00.0 Host bridge: Intel Corporation Coffee Lake HOST and DRAM Controller (rev 0a)
00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 630 (Mobile)
01:00.0 3D controller: NVIDIA Corporation TU117M [GeForce GTX 1650 Mobile] (rev a1)
";

    const SAMPLE_MEMINFO: &str = "\
MemTotal:       16277564 kB
MemFree:         4522180 kB
MemAvailable:   10234844 kB
";

    #[test]
    fn parses_first_model_name() {
        assert_eq!(
            parse_model(SAMPLE_CPUINFO).as_deref(),
            Some("Intel(R) Core(TM) i7-9750H CPU @ 2.60GHz")
        );
    }

    #[test]
    fn counts_processor_entries_as_logical_cores() {
        assert_eq!(parse_logical_cores(SAMPLE_CPUINFO), Some(2));
    }

    #[test]
    fn takes_first_frequency_and_rounds() {
        assert_eq!(parse_frequency_mhz(SAMPLE_CPUINFO), Some(2600));
    }

    #[test]
    fn finds_vga_controller_not_3d_controller() {
        assert_eq!(
            parse_vga_controller(SAMPLE_LSPCI).as_deref(),
            Some("Intel Corporation UHD Graphics 630 (Mobile)")
        );
    }

    #[test]
    fn converts_mem_total_to_kb() {
        assert_eq!(parse_mem_total_kb(SAMPLE_MEMINFO), Some(16_277_564));
    }

    #[test]
    fn garbage_input_yields_none_everywhere() {
        let garbage = "not a proc file at all";
        assert_eq!(parse_model(garbage), None);
        assert_eq!(parse_logical_cores(garbage), None);
        assert_eq!(parse_frequency_mhz(garbage), None);
        assert_eq!(parse_vga_controller(garbage), None);
        assert_eq!(parse_mem_total_kb(garbage), None);
    }
}
