use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
];

/// Calendar units used for uptime, largest first.
const UPTIME_UNITS: &[(&str, u64)] = &[
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Parse duration strings like "1s", "500ms", "2.5s"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Invalid duration: {}", s);
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format an uptime as a countdown, e.g. "2 days, 3 hours, 4 minutes and 5 seconds".
///
/// Zero-valued units are left out; sub-second precision is dropped.
pub fn format_uptime(d: Duration) -> String {
    let mut remaining = d.as_secs();
    let mut parts = Vec::new();

    for (name, secs) in UPTIME_UNITS {
        let count = remaining / secs;
        remaining %= secs;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", count, name, plural));
        }
    }

    match parts.len() {
        0 => "0 seconds".to_string(),
        1 => parts.remove(0),
        n => {
            let last = parts.remove(n - 1);
            format!("{} and {}", parts.join(", "), last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("2.5s").unwrap();
        assert_eq!(d, Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("1000ms").unwrap();
        assert_eq!(d, Duration::from_secs(1));
    }

    #[test]
    fn test_parse_microseconds() {
        let d = parse_duration("16.958µs").unwrap();
        assert_eq!(d.as_nanos(), 16958);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn test_uptime_single_unit() {
        assert_eq!(format_uptime(Duration::from_secs(1)), "1 second");
        assert_eq!(format_uptime(Duration::from_secs(120)), "2 minutes");
    }

    #[test]
    fn test_uptime_joins_units() {
        let d = Duration::from_secs(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(format_uptime(d), "2 days, 3 hours, 4 minutes and 5 seconds");
        assert_eq!(format_uptime(Duration::from_secs(3_601)), "1 hour and 1 second");
    }

    #[test]
    fn test_uptime_zero() {
        assert_eq!(format_uptime(Duration::from_millis(300)), "0 seconds");
    }
}
