const GIB: f64 = (1024u64 * 1024 * 1024) as f64;

/// Render a byte count as GiB with two decimal places, e.g. `16.00 GB`.
pub fn format_gib(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}
