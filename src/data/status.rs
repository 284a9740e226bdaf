//! Service status helpers: boot time and uptime.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::duration::format_uptime;
use crate::source::ServiceStatus;

impl ServiceStatus {
    /// Parsed boot time, if it is valid RFC 3339.
    pub fn boot_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.boot_time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Time elapsed between boot and `now`. `None` if the boot time is
    /// unparseable or in the future.
    pub fn uptime_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        (now - self.boot_time_utc()?).to_std().ok()
    }

    /// Uptime as of now, formatted for display.
    pub fn uptime_label(&self) -> Option<String> {
        self.uptime_at(Utc::now()).map(format_uptime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(boot_time: &str) -> ServiceStatus {
        ServiceStatus {
            boot_time: boot_time.to_string(),
            version: None,
            service: None,
            heap_usage: None,
            cpu_freq: None,
            current_time: None,
        }
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn uptime_is_measured_from_boot() {
        let s = status("2016-12-20T12:29:28Z");
        let uptime = s.uptime_at(utc("2016-12-21T13:30:29Z")).unwrap();
        assert_eq!(uptime, Duration::from_secs(86_400 + 3_600 + 61));
    }

    #[test]
    fn boot_time_with_offset_is_normalized() {
        let s = status("2016-12-20T14:29:28+02:00");
        assert_eq!(s.boot_time_utc(), Some(utc("2016-12-20T12:29:28Z")));
    }

    #[test]
    fn future_boot_time_has_no_uptime() {
        let s = status("2030-01-01T00:00:00Z");
        assert!(s.uptime_at(utc("2020-01-01T00:00:00Z")).is_none());
    }

    #[test]
    fn invalid_boot_time_has_no_uptime() {
        let s = status("yesterday");
        assert!(s.boot_time_utc().is_none());
        assert!(s.uptime_label().is_none());
    }
}
