use sysinfo::Disks;

use crate::units::format_gib;

#[derive(Debug, Clone)]
pub struct PartitionUsage {
    pub device: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

/// Enumerate mounted partitions with their capacity figures. An empty
/// enumeration is a valid result, not an error.
pub fn collect() -> Vec<PartitionUsage> {
    let disks = Disks::new_with_refreshed_list();

    disks
        .iter()
        .map(|d| {
            let total = d.total_space();
            let available = d.available_space();

            PartitionUsage {
                device: d.name().to_string_lossy().to_string(),
                total_bytes: total,
                used_bytes: total.saturating_sub(available),
                available_bytes: available,
            }
        })
        .collect()
}

/// One line per partition, in enumeration order:
/// `<device>: <used> GB / <total> GB (<free> GB free)`
pub fn render(partitions: &[PartitionUsage]) -> String {
    partitions
        .iter()
        .map(|p| {
            format!(
                "{}: {} / {} ({} free)",
                p.device,
                format_gib(p.used_bytes),
                format_gib(p.total_bytes),
                format_gib(p.available_bytes),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
