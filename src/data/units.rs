//! Human-readable byte and count formatting.

/// Byte units, each 1024 times the previous.
const BYTE_UNITS: [&str; 6] = ["bytes", "kB", "MB", "GB", "TB", "PB"];

/// Format a byte count with one decimal (e.g. 1536 -> "1.5 kB").
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} {}", bytes, BYTE_UNITS[0]);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, BYTE_UNITS[unit])
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_stay_in_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
    }

    #[test]
    fn larger_values_scale_by_1024() {
        assert_eq!(format_bytes(1024), "1.0 kB");
        assert_eq!(format_bytes(1536), "1.5 kB");
        assert_eq!(format_bytes(438_272), "428.0 kB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn huge_values_stop_at_petabytes() {
        assert_eq!(format_bytes(u64::MAX), "16384.0 PB");
    }

    #[test]
    fn counts_use_metric_suffixes() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }
}
